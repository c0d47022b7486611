use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner shared by every identifier kind.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Counter behind `with_prefix`, shared by every id kind.
static COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_suffixed(prefix: &str) -> Spur {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    INTERNER.get_or_intern(format!("{prefix}_{n}"))
}

/// Declares an interned identifier type. Each kind is a distinct type so a
/// `LayerId` can never be passed where a `WidgetId` is expected.
macro_rules! interned_id {
    ($(#[$meta:meta])* $name:ident, $default_prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Spur);

        impl $name {
            /// Intern a string as an id, or return the existing one.
            pub fn intern(s: &str) -> Self {
                Self(INTERNER.get_or_intern(s))
            }

            /// Resolve back to a string slice.
            pub fn as_str(&self) -> &str {
                INTERNER.resolve(&self.0)
            }

            /// Generate a process-unique id such as `button_12`.
            pub fn with_prefix(prefix: &str) -> Self {
                Self(next_suffixed(prefix))
            }

            /// Generate a process-unique id with the default prefix for this kind.
            pub fn generate() -> Self {
                Self::with_prefix($default_prefix)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "#{}", self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::intern(&s))
            }
        }
    };
}

interned_id!(
    /// Identifies a screen (one navigable page).
    ScreenId,
    "screen"
);
interned_id!(
    /// Identifies a layer within a screen.
    LayerId,
    "layer"
);
interned_id!(
    /// Identifies a widget. Prefix is usually the widget type (`slider_4`).
    WidgetId,
    "widget"
);
interned_id!(
    /// Shared tag carried by every member of a widget group.
    GroupId,
    "group"
);
interned_id!(
    /// Identifies an event handler attached to a widget.
    EventId,
    "event"
);
interned_id!(
    /// Identifies a style preset.
    PresetId,
    "preset"
);
