//! Core document model for LV Designer projects.
//!
//! The document is a strict tree: `Project → Screen → (Layer, Widget)`.
//! Widgets point at their layer by id rather than being nested inside it,
//! so reordering layers never rewrites widget records. Every type here is
//! plain data; editing behavior lives in `layers`, `groups` and the editor
//! crate's mutation façade.

use crate::id::{EventId, GroupId, LayerId, PresetId, ScreenId, WidgetId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Hard cap on layers per screen.
pub const MAX_LAYERS: usize = 5;

// ─── Colors ──────────────────────────────────────────────────────────────

/// 24-bit RGB color, the native color depth of the target toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB` or `#RRGGBB`. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = hex_val(bytes[0])? << 4 | hex_val(bytes[1])?;
                let g = hex_val(bytes[2])? << 4 | hex_val(bytes[3])?;
                let b = hex_val(bytes[4])? << 4 | hex_val(bytes[5])?;
                Some(Self::rgb(r, g, b))
            }
            _ => None,
        }
    }

    /// Emit as `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::from_hex(&s).ok_or_else(|| format!("invalid color `{s}`"))
    }
}

// ─── Styling ─────────────────────────────────────────────────────────────

/// Visual style of a widget. Every field is optional: unset fields fall back
/// to the widget type's defaults, and partial updates only touch the fields
/// they carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    /// 0 = transparent, 255 = opaque.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<u8>,
}

impl Style {
    pub fn is_empty(&self) -> bool {
        *self == Style::default()
    }
}

/// Copy every field set in `src` onto `dst`, leaving the others alone.
pub fn merge_style(dst: &mut Style, src: &Style) {
    if src.bg_color.is_some() {
        dst.bg_color = src.bg_color;
    }
    if src.text_color.is_some() {
        dst.text_color = src.text_color;
    }
    if src.border_color.is_some() {
        dst.border_color = src.border_color;
    }
    if src.border_width.is_some() {
        dst.border_width = src.border_width;
    }
    if src.radius.is_some() {
        dst.radius = src.radius;
    }
    if src.font_size.is_some() {
        dst.font_size = src.font_size;
    }
    if src.opacity.is_some() {
        dst.opacity = src.opacity;
    }
}

// ─── Widget types ────────────────────────────────────────────────────────

/// The closed set of widget types the designer can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetType {
    Button,
    Label,
    Slider,
    Switch,
    Checkbox,
    Arc,
    Container,
    TextArea,
    Chart,
    Image,
    Icon,
    Bar,
    Roller,
    Dropdown,
    Spinner,
    Led,
}

impl WidgetType {
    pub const ALL: [WidgetType; 16] = [
        WidgetType::Button,
        WidgetType::Label,
        WidgetType::Slider,
        WidgetType::Switch,
        WidgetType::Checkbox,
        WidgetType::Arc,
        WidgetType::Container,
        WidgetType::TextArea,
        WidgetType::Chart,
        WidgetType::Image,
        WidgetType::Icon,
        WidgetType::Bar,
        WidgetType::Roller,
        WidgetType::Dropdown,
        WidgetType::Spinner,
        WidgetType::Led,
    ];

    /// Wire name, matching the serde representation.
    pub fn name(self) -> &'static str {
        match self {
            WidgetType::Button => "button",
            WidgetType::Label => "label",
            WidgetType::Slider => "slider",
            WidgetType::Switch => "switch",
            WidgetType::Checkbox => "checkbox",
            WidgetType::Arc => "arc",
            WidgetType::Container => "container",
            WidgetType::TextArea => "text-area",
            WidgetType::Chart => "chart",
            WidgetType::Image => "image",
            WidgetType::Icon => "icon",
            WidgetType::Bar => "bar",
            WidgetType::Roller => "roller",
            WidgetType::Dropdown => "dropdown",
            WidgetType::Spinner => "spinner",
            WidgetType::Led => "led",
        }
    }

    /// Lenient lookup: accepts kebab, snake and lowercase-joined spellings.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        WidgetType::ALL
            .into_iter()
            .find(|t| t.name().replace('-', "") == normalized)
    }

    /// Prefix for generated widget ids (`text_area_3`).
    pub fn id_prefix(self) -> &'static str {
        match self {
            WidgetType::TextArea => "text_area",
            other => other.name(),
        }
    }

    pub fn default_size(self) -> (u32, u32) {
        match self {
            WidgetType::Button => (100, 50),
            WidgetType::Label => (120, 30),
            WidgetType::Slider => (150, 20),
            WidgetType::Switch => (60, 30),
            WidgetType::Checkbox => (150, 30),
            WidgetType::Arc => (120, 120),
            WidgetType::Container => (200, 150),
            WidgetType::TextArea => (200, 80),
            WidgetType::Chart => (200, 150),
            WidgetType::Image => (100, 100),
            WidgetType::Icon => (40, 40),
            WidgetType::Bar => (150, 20),
            WidgetType::Roller => (120, 100),
            WidgetType::Dropdown => (150, 40),
            WidgetType::Spinner => (60, 60),
            WidgetType::Led => (30, 30),
        }
    }

    pub fn default_kind(self) -> WidgetKind {
        match self {
            WidgetType::Button => WidgetKind::Button {
                text: "Button".into(),
            },
            WidgetType::Label => WidgetKind::Label {
                text: "Label".into(),
            },
            WidgetType::Slider => WidgetKind::Slider {
                value: 50,
                min: 0,
                max: 100,
            },
            WidgetType::Switch => WidgetKind::Switch { checked: false },
            WidgetType::Checkbox => WidgetKind::Checkbox {
                text: "Checkbox".into(),
                checked: false,
            },
            WidgetType::Arc => WidgetKind::Arc {
                value: 70,
                min: 0,
                max: 100,
            },
            WidgetType::Container => WidgetKind::Container,
            WidgetType::TextArea => WidgetKind::TextArea {
                text: String::new(),
                placeholder: "Type here...".into(),
            },
            WidgetType::Chart => WidgetKind::Chart {
                chart_type: ChartType::Line,
                points: vec![10, 40, 25, 60, 45],
            },
            WidgetType::Image => WidgetKind::Image { source: None },
            WidgetType::Icon => WidgetKind::Icon {
                symbol: "LV_SYMBOL_HOME".into(),
            },
            WidgetType::Bar => WidgetKind::Bar {
                value: 40,
                min: 0,
                max: 100,
            },
            WidgetType::Roller => WidgetKind::Roller {
                options: vec!["Option 1".into(), "Option 2".into(), "Option 3".into()],
                selected: 0,
            },
            WidgetType::Dropdown => WidgetKind::Dropdown {
                options: vec!["Option 1".into(), "Option 2".into(), "Option 3".into()],
                selected: 0,
            },
            WidgetType::Spinner => WidgetKind::Spinner,
            WidgetType::Led => WidgetKind::Led { brightness: 255 },
        }
    }

    pub fn default_style(self) -> Style {
        match self {
            WidgetType::Button => Style {
                bg_color: Some(Color::rgb(0x21, 0x96, 0xF3)),
                text_color: Some(Color::WHITE),
                radius: Some(8),
                font_size: Some(16),
                ..Style::default()
            },
            WidgetType::Label | WidgetType::Checkbox => Style {
                text_color: Some(Color::rgb(0x21, 0x21, 0x21)),
                font_size: Some(14),
                ..Style::default()
            },
            WidgetType::Container => Style {
                bg_color: Some(Color::rgb(0xF5, 0xF5, 0xF5)),
                border_color: Some(Color::rgb(0xE0, 0xE0, 0xE0)),
                border_width: Some(1),
                radius: Some(4),
                ..Style::default()
            },
            WidgetType::TextArea | WidgetType::Dropdown | WidgetType::Roller => Style {
                bg_color: Some(Color::WHITE),
                border_color: Some(Color::rgb(0xBD, 0xBD, 0xBD)),
                border_width: Some(1),
                radius: Some(4),
                font_size: Some(14),
                ..Style::default()
            },
            WidgetType::Led => Style {
                bg_color: Some(Color::rgb(0xF4, 0x43, 0x36)),
                radius: Some(15),
                ..Style::default()
            },
            _ => Style {
                bg_color: Some(Color::rgb(0x21, 0x96, 0xF3)),
                ..Style::default()
            },
        }
    }
}

/// Sub-type of a chart widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Line,
    Bar,
    Scatter,
}

/// Where an image widget's pixels come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ImageSource {
    /// A file in the exported project's asset folder.
    Asset { path: String },
    /// Inline preview data (usually a `data:` URI). Heavy; stripped on export.
    Inline { data: String },
}

/// Type-specific payload of a widget. Each variant only carries the fields
/// its widget type understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WidgetKind {
    Button { text: String },
    Label { text: String },
    Slider { value: i32, min: i32, max: i32 },
    Switch { checked: bool },
    Checkbox { text: String, checked: bool },
    Arc { value: i32, min: i32, max: i32 },
    Container,
    TextArea { text: String, placeholder: String },
    Chart { chart_type: ChartType, points: Vec<i32> },
    Image { source: Option<ImageSource> },
    Icon { symbol: String },
    Bar { value: i32, min: i32, max: i32 },
    Roller { options: Vec<String>, selected: usize },
    Dropdown { options: Vec<String>, selected: usize },
    Spinner,
    Led { brightness: u8 },
}

impl WidgetKind {
    pub fn widget_type(&self) -> WidgetType {
        match self {
            WidgetKind::Button { .. } => WidgetType::Button,
            WidgetKind::Label { .. } => WidgetType::Label,
            WidgetKind::Slider { .. } => WidgetType::Slider,
            WidgetKind::Switch { .. } => WidgetType::Switch,
            WidgetKind::Checkbox { .. } => WidgetType::Checkbox,
            WidgetKind::Arc { .. } => WidgetType::Arc,
            WidgetKind::Container => WidgetType::Container,
            WidgetKind::TextArea { .. } => WidgetType::TextArea,
            WidgetKind::Chart { .. } => WidgetType::Chart,
            WidgetKind::Image { .. } => WidgetType::Image,
            WidgetKind::Icon { .. } => WidgetType::Icon,
            WidgetKind::Bar { .. } => WidgetType::Bar,
            WidgetKind::Roller { .. } => WidgetType::Roller,
            WidgetKind::Dropdown { .. } => WidgetType::Dropdown,
            WidgetKind::Spinner => WidgetType::Spinner,
            WidgetKind::Led { .. } => WidgetType::Led,
        }
    }

    /// The primary text content, for types that have one.
    pub fn text(&self) -> Option<&str> {
        match self {
            WidgetKind::Button { text }
            | WidgetKind::Label { text }
            | WidgetKind::Checkbox { text, .. }
            | WidgetKind::TextArea { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Replace the primary text. Returns false for types without text.
    pub fn set_text(&mut self, content: &str) -> bool {
        match self {
            WidgetKind::Button { text }
            | WidgetKind::Label { text }
            | WidgetKind::Checkbox { text, .. }
            | WidgetKind::TextArea { text, .. } => {
                *text = content.to_string();
                true
            }
            _ => false,
        }
    }
}

// ─── Events ──────────────────────────────────────────────────────────────

/// What the user does to a widget to fire an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventTrigger {
    Clicked,
    Pressed,
    Released,
    ValueChanged,
    Focused,
    Defocused,
}

/// What happens when the event fires.
///
/// `Navigate` targets are not validated: a deleted screen leaves a dangling
/// reference that readers must skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventAction {
    Navigate { target: ScreenId },
    CustomCode { code: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetEvent {
    pub id: EventId,
    pub trigger: EventTrigger,
    #[serde(flatten)]
    pub action: EventAction,
}

impl WidgetEvent {
    pub fn new(trigger: EventTrigger, action: EventAction) -> Self {
        Self {
            id: EventId::generate(),
            trigger,
            action,
        }
    }
}

// ─── Widgets ─────────────────────────────────────────────────────────────

/// A positioned, typed UI element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    pub id: WidgetId,
    pub layer_id: LayerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// Canvas position. Signed: widgets may sit partly or fully off-canvas.
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub style: Style,
    pub kind: WidgetKind,
    #[serde(default)]
    pub events: SmallVec<[WidgetEvent; 1]>,
}

impl Widget {
    /// A widget of `ty` with the type's default size, style and payload.
    pub fn new(id: WidgetId, layer_id: LayerId, ty: WidgetType, x: i32, y: i32) -> Self {
        let (width, height) = ty.default_size();
        Self {
            id,
            layer_id,
            group_id: None,
            x,
            y,
            width,
            height,
            style: ty.default_style(),
            kind: ty.default_kind(),
            events: SmallVec::new(),
        }
    }

    pub fn widget_type(&self) -> WidgetType {
        self.kind.widget_type()
    }
}

// ─── Layers & screens ────────────────────────────────────────────────────

/// A named partition of a screen's widgets with shared visibility and lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub locked: bool,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: LayerId::generate(),
            name: name.into(),
            visible: true,
            locked: false,
        }
    }
}

/// One navigable page of the design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    pub id: ScreenId,
    pub name: String,
    pub bg_color: Color,
    /// Bottom-to-top: later layers paint over earlier ones. Never empty.
    pub layers: Vec<Layer>,
    /// All widgets of the screen. Filtered by `layer_id`, this order is the
    /// within-layer paint order (later = on top).
    pub widgets: Vec<Widget>,
}

impl Screen {
    /// A new screen with a single layer named "Layer 1".
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ScreenId::generate(),
            name: name.into(),
            bg_color: Color::WHITE,
            layers: vec![Layer::new("Layer 1")],
            widgets: Vec::new(),
        }
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|w| w.id == id)
    }

    pub fn contains_widget(&self, id: WidgetId) -> bool {
        self.widgets.iter().any(|w| w.id == id)
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// The topmost layer. Screens always have at least one.
    pub fn top_layer(&self) -> Option<&Layer> {
        self.layers.last()
    }

    /// A generated layer id not already used on this screen.
    pub fn fresh_layer_id(&self) -> LayerId {
        loop {
            let id = LayerId::generate();
            if self.layer(id).is_none() {
                return id;
            }
        }
    }

    /// Remove widgets by id, returning the removed records. Groups left with
    /// a single member are dissolved.
    pub fn remove_widgets(&mut self, ids: &[WidgetId]) -> Vec<Widget> {
        let (removed, kept): (Vec<Widget>, Vec<Widget>) = std::mem::take(&mut self.widgets)
            .into_iter()
            .partition(|w| ids.contains(&w.id));
        self.widgets = kept;
        if !removed.is_empty() {
            self.dissolve_singleton_groups();
        }
        removed
    }
}

// ─── Canvas settings & themes ────────────────────────────────────────────

/// Display rotation of the target device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    #[serde(rename = "0")]
    Deg0,
    #[serde(rename = "90")]
    Deg90,
    #[serde(rename = "180")]
    Deg180,
    #[serde(rename = "270")]
    Deg270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

/// Global theme applied by the generated code's theme initialisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub primary: Color,
    pub secondary: Color,
    pub text: Color,
    pub background: Color,
    pub dark: bool,
}

impl Theme {
    pub const BUILTIN: [&'static str; 3] = ["light", "dark", "ocean"];

    /// Look up a built-in theme by name.
    pub fn builtin(name: &str) -> Option<Theme> {
        let (primary, secondary, text, background, dark) = match name {
            "light" => (0x2196F3, 0xFF9800, 0x212121, 0xFFFFFF, false),
            "dark" => (0x90CAF9, 0xFFB74D, 0xECEFF1, 0x121212, true),
            "ocean" => (0x00838F, 0x26C6DA, 0x0D2B36, 0xE0F7FA, false),
            _ => return None,
        };
        let c = |v: u32| Color::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8);
        Some(Theme {
            name: name.to_string(),
            primary: c(primary),
            secondary: c(secondary),
            text: c(text),
            background: c(background),
            dark,
        })
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::builtin("light").unwrap_or(Theme {
            name: "light".into(),
            primary: Color::rgb(0x21, 0x96, 0xF3),
            secondary: Color::rgb(0xFF, 0x98, 0x00),
            text: Color::rgb(0x21, 0x21, 0x21),
            background: Color::WHITE,
            dark: false,
        })
    }
}

/// Canvas/device settings shared by every screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSettings {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    /// Target board identifier, e.g. `esp32-s3-box`.
    pub device: String,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default)]
    pub theme: Theme,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 480,
            height: 320,
            background: Color::WHITE,
            device: "generic".into(),
            rotation: Rotation::Deg0,
            theme: Theme::default(),
        }
    }
}

/// A named, reusable style. Applying it copies its fields onto a widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylePreset {
    pub id: PresetId,
    pub name: String,
    pub style: Style,
}

impl StylePreset {
    pub fn new(name: impl Into<String>, style: Style) -> Self {
        Self {
            id: PresetId::generate(),
            name: name.into(),
            style,
        }
    }
}

// ─── Project ─────────────────────────────────────────────────────────────

/// Root aggregate. Which screen is "current" is tracked by the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub settings: CanvasSettings,
    /// Never empty.
    pub screens: Vec<Screen>,
    #[serde(default)]
    pub style_presets: Vec<StylePreset>,
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl Project {
    /// An empty project: one screen with one layer.
    pub fn new() -> Self {
        Self {
            settings: CanvasSettings::default(),
            screens: vec![Screen::new("Main")],
            style_presets: Vec::new(),
        }
    }

    pub fn screen(&self, id: ScreenId) -> Option<&Screen> {
        self.screens.iter().find(|s| s.id == id)
    }

    pub fn screen_mut(&mut self, id: ScreenId) -> Option<&mut Screen> {
        self.screens.iter_mut().find(|s| s.id == id)
    }

    /// Find a widget anywhere in the project, with its screen.
    pub fn find_widget(&self, id: WidgetId) -> Option<(&Screen, &Widget)> {
        self.screens
            .iter()
            .find_map(|s| s.widget(id).map(|w| (s, w)))
    }

    pub fn preset(&self, id: PresetId) -> Option<&StylePreset> {
        self.style_presets.iter().find(|p| p.id == id)
    }

    pub fn preset_by_name(&self, name: &str) -> Option<&StylePreset> {
        self.style_presets.iter().find(|p| p.name == name)
    }

    /// A generated widget id not already used in this project. Loaded
    /// documents may contain ids that collide with the process counter.
    pub fn fresh_widget_id(&self, prefix: &str) -> WidgetId {
        loop {
            let id = WidgetId::with_prefix(prefix);
            if self.find_widget(id).is_none() {
                return id;
            }
        }
    }

    /// A generated group id not already used in this project.
    pub fn fresh_group_id(&self) -> GroupId {
        loop {
            let id = GroupId::generate();
            let taken = self
                .screens
                .iter()
                .flat_map(|s| &s.widgets)
                .any(|w| w.group_id == Some(id));
            if !taken {
                return id;
            }
        }
    }

    /// A generated screen id not already used in this project.
    pub fn fresh_screen_id(&self) -> ScreenId {
        loop {
            let id = ScreenId::generate();
            if self.screen(id).is_none() {
                return id;
            }
        }
    }

    /// A generated preset id not already used in this project.
    pub fn fresh_preset_id(&self) -> PresetId {
        loop {
            let id = PresetId::generate();
            if self.preset(id).is_none() {
                return id;
            }
        }
    }

    /// A generated event id not attached to any widget in this project.
    pub fn fresh_event_id(&self) -> EventId {
        loop {
            let id = EventId::generate();
            if !self.has_event(id) {
                return id;
            }
        }
    }

    pub fn has_event(&self, id: EventId) -> bool {
        self.screens
            .iter()
            .flat_map(|s| &s.widgets)
            .flat_map(|w| &w.events)
            .any(|e| e.id == id)
    }
}
