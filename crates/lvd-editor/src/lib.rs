pub mod drag;
pub mod editor;
pub mod history;
pub mod input;
pub mod mutation;
pub mod selection;
pub mod session;
pub mod shortcuts;

pub use drag::{DragState, GRID_SIZE, snap};
pub use editor::{Editor, MOVE_LABEL};
pub use history::{History, HistoryItem, HistoryMenu, MenuEntry};
pub use input::{InputEvent, Modifiers};
pub use mutation::{Mutation, WidgetPatch};
pub use selection::{Selection, resolve_pointer_down};
pub use shortcuts::{ShortcutAction, ShortcutMap};
