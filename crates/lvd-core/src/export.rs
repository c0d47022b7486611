//! Serialization boundary toward the code-generation service.
//!
//! Builds a trimmed copy of the project: only visible layers, widgets in
//! paint order, inline image data replaced by a placeholder, and event
//! targets annotated with whether they still resolve. This is a read-only
//! view; the document itself is never modified.

use crate::id::{EventId, GroupId, ScreenId, WidgetId};
use crate::model::{
    Color, EventAction, EventTrigger, ImageSource, Project, Rotation, Screen, Style, Theme, Widget,
    WidgetKind,
};
use serde::Serialize;

/// Stand-in for stripped inline image payloads.
pub const IMAGE_PLACEHOLDER: &str = "<inline image omitted>";

/// Device metadata sent alongside the screens.
#[derive(Debug, Clone, Serialize)]
pub struct ExportDevice {
    pub device: String,
    pub width: u32,
    pub height: u32,
    pub rotation: Rotation,
    pub background: Color,
    pub theme: Theme,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportEvent {
    pub id: EventId,
    pub trigger: EventTrigger,
    #[serde(flatten)]
    pub action: EventAction,
    /// False when a NAVIGATE target no longer exists.
    pub target_exists: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportWidget {
    pub id: WidgetId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Style::is_empty")]
    pub style: Style,
    pub kind: WidgetKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<ExportEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportScreen {
    pub id: ScreenId,
    pub name: String,
    pub bg_color: Color,
    /// Bottom to top.
    pub widgets: Vec<ExportWidget>,
}

/// The document as handed to the code generator.
#[derive(Debug, Clone, Serialize)]
pub struct ExportDocument {
    pub target_language: String,
    pub device: ExportDevice,
    pub screens: Vec<ExportScreen>,
}

impl ExportDocument {
    /// Build the export view of `project` for `target_language` (e.g. `"c"`).
    pub fn build(project: &Project, target_language: &str) -> Self {
        let settings = &project.settings;
        Self {
            target_language: target_language.to_string(),
            device: ExportDevice {
                device: settings.device.clone(),
                width: settings.width,
                height: settings.height,
                rotation: settings.rotation,
                background: settings.background,
                theme: settings.theme.clone(),
            },
            screens: project
                .screens
                .iter()
                .map(|s| export_screen(project, s))
                .collect(),
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn widget_count(&self) -> usize {
        self.screens.iter().map(|s| s.widgets.len()).sum()
    }
}

fn export_screen(project: &Project, screen: &Screen) -> ExportScreen {
    ExportScreen {
        id: screen.id,
        name: screen.name.clone(),
        bg_color: screen.bg_color,
        widgets: screen
            .visible_render_order()
            .into_iter()
            .map(|w| export_widget(project, w))
            .collect(),
    }
}

fn export_widget(project: &Project, widget: &Widget) -> ExportWidget {
    let kind = match &widget.kind {
        WidgetKind::Image {
            source: Some(ImageSource::Inline { .. }),
        } => WidgetKind::Image {
            source: Some(ImageSource::Inline {
                data: IMAGE_PLACEHOLDER.to_string(),
            }),
        },
        other => other.clone(),
    };
    let events = widget
        .events
        .iter()
        .map(|ev| ExportEvent {
            id: ev.id,
            trigger: ev.trigger,
            target_exists: match &ev.action {
                EventAction::Navigate { target } => project.screen(*target).is_some(),
                EventAction::CustomCode { .. } => true,
            },
            action: ev.action.clone(),
        })
        .collect();

    ExportWidget {
        id: widget.id,
        group_id: widget.group_id,
        x: widget.x,
        y: widget.y,
        width: widget.width,
        height: widget.height,
        style: widget.style.clone(),
        kind,
        events,
    }
}
