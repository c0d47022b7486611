//! Document mutations.
//!
//! Every edit the editor can make is a `Mutation`: a pure function from the
//! current project to the next one. `apply` returns `None` when the edit is
//! rejected or changes nothing, so the history never records no-op entries.

use lvd_core::draft::WidgetDraft;
use lvd_core::id::{EventId, GroupId, LayerId, PresetId, ScreenId, WidgetId};
use lvd_core::layers::{Placement, ZOrder};
use lvd_core::model::*;
use std::collections::HashMap;

/// Where the first auto-placed widget lands.
pub const DEFAULT_ORIGIN: (i32, i32) = (20, 20);
/// Step between auto-placed widgets so they never stack exactly.
pub const STACK_OFFSET: i32 = 20;
/// Offset of duplicated widgets from their originals.
pub const DUPLICATE_OFFSET: i32 = 20;

// ─── Widget patch ────────────────────────────────────────────────────────

/// Partial widget update. Unset fields are left alone; `style` is merged
/// field by field so one style edit keeps its siblings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetPatch {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub style: Option<Style>,
    /// Replaces the type payload (and so may change the widget's type).
    pub kind: Option<WidgetKind>,
    /// Applied after `kind`.
    pub text: Option<String>,
}

impl WidgetPatch {
    pub fn position(x: i32, y: i32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn size(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn style(style: Style) -> Self {
        Self {
            style: Some(style),
            ..Self::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    fn apply(&self, w: &mut Widget) -> bool {
        let before = w.clone();
        if let Some(x) = self.x {
            w.x = x;
        }
        if let Some(y) = self.y {
            w.y = y;
        }
        if let Some(width) = self.width {
            w.width = width;
        }
        if let Some(height) = self.height {
            w.height = height;
        }
        if let Some(style) = &self.style {
            merge_style(&mut w.style, style);
        }
        if let Some(kind) = &self.kind {
            w.kind = kind.clone();
        }
        if let Some(text) = &self.text {
            w.kind.set_text(text);
        }
        *w != before
    }
}

// ─── Mutations ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Add a default widget; `position: None` auto-places it.
    AddWidget {
        screen: ScreenId,
        layer: LayerId,
        widget_type: WidgetType,
        position: Option<(i32, i32)>,
    },
    UpdateWidgets {
        screen: ScreenId,
        patches: Vec<(WidgetId, WidgetPatch)>,
    },
    /// Absolute positions; missing and locked widgets are skipped.
    SetPositions {
        screen: ScreenId,
        positions: Vec<(WidgetId, i32, i32)>,
    },
    Nudge {
        screen: ScreenId,
        ids: Vec<WidgetId>,
        dx: i32,
        dy: i32,
    },
    DeleteWidgets {
        screen: ScreenId,
        ids: Vec<WidgetId>,
    },
    Duplicate {
        screen: ScreenId,
        ids: Vec<WidgetId>,
    },
    Group {
        screen: ScreenId,
        ids: Vec<WidgetId>,
    },
    Ungroup {
        screen: ScreenId,
        ids: Vec<WidgetId>,
    },
    Reorder {
        screen: ScreenId,
        ids: Vec<WidgetId>,
        op: ZOrder,
    },
    MoveToLayer {
        screen: ScreenId,
        ids: Vec<WidgetId>,
        layer: LayerId,
    },
    AddLayer {
        screen: ScreenId,
        name: String,
    },
    DeleteLayer {
        screen: ScreenId,
        layer: LayerId,
    },
    MoveLayer {
        screen: ScreenId,
        layer: LayerId,
        target: LayerId,
        placement: Placement,
    },
    RenameLayer {
        screen: ScreenId,
        layer: LayerId,
        name: String,
    },
    SetLayerVisible {
        screen: ScreenId,
        layer: LayerId,
        visible: bool,
    },
    SetLayerLocked {
        screen: ScreenId,
        layer: LayerId,
        locked: bool,
    },
    AddScreen {
        name: String,
    },
    DeleteScreen {
        screen: ScreenId,
    },
    RenameScreen {
        screen: ScreenId,
        name: String,
    },
    SetScreenBackground {
        screen: ScreenId,
        color: Color,
    },
    AddEvent {
        screen: ScreenId,
        widget: WidgetId,
        event: WidgetEvent,
    },
    RemoveEvent {
        screen: ScreenId,
        widget: WidgetId,
        event: EventId,
    },
    AddPreset {
        name: String,
        style: Style,
    },
    DeletePreset {
        preset: PresetId,
    },
    ApplyPreset {
        screen: ScreenId,
        ids: Vec<WidgetId>,
        preset: PresetId,
    },
    ApplyTheme {
        name: String,
    },
    UpdateSettings {
        settings: CanvasSettings,
    },
    InsertDrafts {
        screen: ScreenId,
        layer: LayerId,
        drafts: Vec<WidgetDraft>,
    },
}

impl Mutation {
    /// History menu label.
    pub fn label(&self) -> String {
        match self {
            Mutation::AddWidget { widget_type, .. } => format!("Add {}", title(*widget_type)),
            Mutation::UpdateWidgets { .. } => "Update Widget".into(),
            Mutation::SetPositions { .. } => "Move Widget".into(),
            Mutation::Nudge { .. } => "Nudge".into(),
            Mutation::DeleteWidgets { ids, .. } if ids.len() > 1 => "Delete Widgets".into(),
            Mutation::DeleteWidgets { .. } => "Delete Widget".into(),
            Mutation::Duplicate { .. } => "Duplicate".into(),
            Mutation::Group { .. } => "Group".into(),
            Mutation::Ungroup { .. } => "Ungroup".into(),
            Mutation::Reorder { op, .. } => zorder_label(*op).into(),
            Mutation::MoveToLayer { .. } => "Move to Layer".into(),
            Mutation::AddLayer { .. } => "Add Layer".into(),
            Mutation::DeleteLayer { .. } => "Delete Layer".into(),
            Mutation::MoveLayer { .. } => "Reorder Layer".into(),
            Mutation::RenameLayer { .. } => "Rename Layer".into(),
            Mutation::SetLayerVisible { visible: true, .. } => "Show Layer".into(),
            Mutation::SetLayerVisible { .. } => "Hide Layer".into(),
            Mutation::SetLayerLocked { locked: true, .. } => "Lock Layer".into(),
            Mutation::SetLayerLocked { .. } => "Unlock Layer".into(),
            Mutation::AddScreen { .. } => "Add Screen".into(),
            Mutation::DeleteScreen { .. } => "Delete Screen".into(),
            Mutation::RenameScreen { .. } => "Rename Screen".into(),
            Mutation::SetScreenBackground { .. } => "Screen Background".into(),
            Mutation::AddEvent { .. } => "Add Event".into(),
            Mutation::RemoveEvent { .. } => "Remove Event".into(),
            Mutation::AddPreset { .. } => "Save Preset".into(),
            Mutation::DeletePreset { .. } => "Delete Preset".into(),
            Mutation::ApplyPreset { .. } => "Apply Preset".into(),
            Mutation::ApplyTheme { .. } => "Apply Theme".into(),
            Mutation::UpdateSettings { .. } => "Canvas Settings".into(),
            Mutation::InsertDrafts { .. } => "AI Widgets".into(),
        }
    }

    /// The next project, or `None` when rejected or without effect.
    pub fn apply(&self, project: &Project) -> Option<Project> {
        let mut next = project.clone();
        if self.apply_in_place(&mut next) {
            log::debug!("mutation applied: {}", self.label());
            Some(next)
        } else {
            log::debug!("mutation had no effect: {}", self.label());
            None
        }
    }

    fn apply_in_place(&self, p: &mut Project) -> bool {
        match self {
            Mutation::AddWidget {
                screen,
                layer,
                widget_type,
                position,
            } => {
                let id = p.fresh_widget_id(widget_type.id_prefix());
                let Some(s) = p.screen_mut(*screen) else {
                    return false;
                };
                if s.layer(*layer).is_none() {
                    log::warn!("add widget: layer {layer} not on screen {screen}");
                    return false;
                }
                let (x, y) = position.unwrap_or_else(|| free_origin(s));
                s.widgets.push(Widget::new(id, *layer, *widget_type, x, y));
                true
            }

            Mutation::UpdateWidgets { screen, patches } => with_screen(p, *screen, |s| {
                let mut changed = false;
                for (id, patch) in patches {
                    if let Some(w) = s.widget_mut(*id) {
                        changed |= patch.apply(w);
                    }
                }
                changed
            }),

            Mutation::SetPositions { screen, positions } => with_screen(p, *screen, |s| {
                let mut changed = false;
                for &(id, x, y) in positions {
                    if s.is_widget_locked(id) {
                        continue;
                    }
                    if let Some(w) = s.widget_mut(id)
                        && (w.x, w.y) != (x, y)
                    {
                        w.x = x;
                        w.y = y;
                        changed = true;
                    }
                }
                changed
            }),

            Mutation::Nudge {
                screen,
                ids,
                dx,
                dy,
            } => with_screen(p, *screen, |s| {
                if (*dx, *dy) == (0, 0) {
                    return false;
                }
                let mut changed = false;
                for &id in ids {
                    if s.is_widget_locked(id) {
                        continue;
                    }
                    if let Some(w) = s.widget_mut(id) {
                        w.x += dx;
                        w.y += dy;
                        changed = true;
                    }
                }
                changed
            }),

            Mutation::DeleteWidgets { screen, ids } => {
                with_screen(p, *screen, |s| !s.remove_widgets(ids).is_empty())
            }

            Mutation::Duplicate { screen, ids } => duplicate(p, *screen, ids),

            Mutation::Group { screen, ids } => {
                let group = p.fresh_group_id();
                with_screen(p, *screen, |s| s.group(ids, group))
            }

            Mutation::Ungroup { screen, ids } => with_screen(p, *screen, |s| s.ungroup(ids)),

            Mutation::Reorder { screen, ids, op } => {
                with_screen(p, *screen, |s| s.reorder_widgets(ids, *op))
            }

            Mutation::MoveToLayer { screen, ids, layer } => {
                with_screen(p, *screen, |s| s.move_widgets_to_layer(ids, *layer))
            }

            Mutation::AddLayer { screen, name } => {
                with_screen(p, *screen, |s| {
                    let mut layer = Layer::new(name.clone());
                    layer.id = s.fresh_layer_id();
                    s.add_layer(layer)
                })
            }

            Mutation::DeleteLayer { screen, layer } => {
                with_screen(p, *screen, |s| s.remove_layer(*layer))
            }

            Mutation::MoveLayer {
                screen,
                layer,
                target,
                placement,
            } => with_screen(p, *screen, |s| s.move_layer(*layer, *target, *placement)),

            Mutation::RenameLayer {
                screen,
                layer,
                name,
            } => with_screen(p, *screen, |s| s.rename_layer(*layer, name)),

            Mutation::SetLayerVisible {
                screen,
                layer,
                visible,
            } => with_screen(p, *screen, |s| s.set_layer_visible(*layer, *visible)),

            Mutation::SetLayerLocked {
                screen,
                layer,
                locked,
            } => with_screen(p, *screen, |s| s.set_layer_locked(*layer, *locked)),

            Mutation::AddScreen { name } => {
                let mut screen = Screen::new(name.clone());
                screen.id = p.fresh_screen_id();
                p.screens.push(screen);
                true
            }

            Mutation::DeleteScreen { screen } => {
                if p.screens.len() <= 1 {
                    log::warn!("refusing to delete the only screen");
                    return false;
                }
                let before = p.screens.len();
                p.screens.retain(|s| s.id != *screen);
                p.screens.len() != before
            }

            Mutation::RenameScreen { screen, name } => with_screen(p, *screen, |s| {
                if s.name == *name {
                    return false;
                }
                s.name = name.clone();
                true
            }),

            Mutation::SetScreenBackground { screen, color } => with_screen(p, *screen, |s| {
                if s.bg_color == *color {
                    return false;
                }
                s.bg_color = *color;
                true
            }),

            Mutation::AddEvent {
                screen,
                widget,
                event,
            } => {
                let mut event = event.clone();
                if p.has_event(event.id) {
                    event.id = p.fresh_event_id();
                }
                with_screen(p, *screen, |s| match s.widget_mut(*widget) {
                    Some(w) => {
                        w.events.push(event);
                        true
                    }
                    None => false,
                })
            }

            Mutation::RemoveEvent {
                screen,
                widget,
                event,
            } => with_screen(p, *screen, |s| match s.widget_mut(*widget) {
                Some(w) => {
                    let before = w.events.len();
                    w.events.retain(|e| e.id != *event);
                    w.events.len() != before
                }
                None => false,
            }),

            Mutation::AddPreset { name, style } => {
                if p.preset_by_name(name).is_some() {
                    log::warn!("preset {name:?} already exists");
                    return false;
                }
                let mut preset = StylePreset::new(name.clone(), style.clone());
                preset.id = p.fresh_preset_id();
                p.style_presets.push(preset);
                true
            }

            Mutation::DeletePreset { preset } => {
                let before = p.style_presets.len();
                p.style_presets.retain(|pr| pr.id != *preset);
                p.style_presets.len() != before
            }

            Mutation::ApplyPreset {
                screen,
                ids,
                preset,
            } => {
                let Some(style) = p.preset(*preset).map(|pr| pr.style.clone()) else {
                    log::warn!("unknown preset {preset}");
                    return false;
                };
                with_screen(p, *screen, |s| {
                    let mut changed = false;
                    for w in s.widgets.iter_mut().filter(|w| ids.contains(&w.id)) {
                        let before = w.style.clone();
                        merge_style(&mut w.style, &style);
                        changed |= w.style != before;
                    }
                    changed
                })
            }

            Mutation::ApplyTheme { name } => {
                let Some(theme) = Theme::builtin(name) else {
                    log::warn!("unknown theme {name:?}");
                    return false;
                };
                let before = p.settings.clone();
                p.settings.background = theme.background;
                p.settings.theme = theme;
                p.settings != before
            }

            Mutation::UpdateSettings { settings } => {
                if p.settings == *settings {
                    return false;
                }
                p.settings = settings.clone();
                true
            }

            Mutation::InsertDrafts {
                screen,
                layer,
                drafts,
            } => {
                let has_layer = p
                    .screen(*screen)
                    .is_some_and(|s| s.layer(*layer).is_some());
                if !has_layer || drafts.is_empty() {
                    return false;
                }
                for draft in drafts {
                    let id = p.fresh_widget_id(draft.widget_type.id_prefix());
                    let widget = draft.clone().into_widget(id, *layer);
                    if let Some(s) = p.screen_mut(*screen) {
                        s.widgets.push(widget);
                    }
                }
                true
            }
        }
    }
}

fn with_screen(p: &mut Project, id: ScreenId, f: impl FnOnce(&mut Screen) -> bool) -> bool {
    match p.screen_mut(id) {
        Some(s) => f(s),
        None => {
            log::warn!("mutation targets missing screen {id}");
            false
        }
    }
}

/// First slot on the diagonal from `DEFAULT_ORIGIN` not taken exactly.
fn free_origin(screen: &Screen) -> (i32, i32) {
    let (mut x, mut y) = DEFAULT_ORIGIN;
    while screen.widgets.iter().any(|w| (w.x, w.y) == (x, y)) {
        x += STACK_OFFSET;
        y += STACK_OFFSET;
    }
    (x, y)
}

/// Copies land on top of their layers. Each source group maps to one fresh
/// group so duplicated groups stay grouped among themselves.
fn duplicate(p: &mut Project, screen: ScreenId, ids: &[WidgetId]) -> bool {
    let originals: Vec<Widget> = match p.screen(screen) {
        Some(s) => s
            .widgets
            .iter()
            .filter(|w| ids.contains(&w.id))
            .cloned()
            .collect(),
        None => return false,
    };
    if originals.is_empty() {
        return false;
    }

    let mut groups: HashMap<GroupId, GroupId> = HashMap::new();
    let mut copies = Vec::with_capacity(originals.len());
    for mut copy in originals {
        copy.id = p.fresh_widget_id(copy.widget_type().id_prefix());
        copy.x += DUPLICATE_OFFSET;
        copy.y += DUPLICATE_OFFSET;
        copy.group_id = copy
            .group_id
            .map(|g| *groups.entry(g).or_insert_with(|| p.fresh_group_id()));
        for event in copy.events.iter_mut() {
            event.id = p.fresh_event_id();
        }
        copies.push(copy);
    }

    with_screen(p, screen, |s| {
        s.widgets.extend(copies);
        s.dissolve_singleton_groups();
        true
    })
}

fn zorder_label(op: ZOrder) -> &'static str {
    match op {
        ZOrder::BringForward => "Bring Forward",
        ZOrder::SendBackward => "Send Backward",
        ZOrder::BringToFront => "Bring to Front",
        ZOrder::SendToBack => "Send to Back",
    }
}

/// `text-area` → `Text Area`.
pub fn title(ty: WidgetType) -> String {
    ty.name()
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn project_with_buttons(n: usize) -> (Project, ScreenId, LayerId, Vec<WidgetId>) {
        let mut p = Project::new();
        let screen = p.screens[0].id;
        let layer = p.screens[0].layers[0].id;
        let mut ids = Vec::new();
        for _ in 0..n {
            p = Mutation::AddWidget {
                screen,
                layer,
                widget_type: WidgetType::Button,
                position: None,
            }
            .apply(&p)
            .unwrap();
            ids.push(p.screens[0].widgets.last().unwrap().id);
        }
        (p, screen, layer, ids)
    }

    #[test]
    fn add_widget_avoids_exact_stacking() {
        let (p, ..) = project_with_buttons(3);
        let positions: Vec<(i32, i32)> = p.screens[0].widgets.iter().map(|w| (w.x, w.y)).collect();
        assert_eq!(positions, [(20, 20), (40, 40), (60, 60)]);
        assert_eq!(p.screens[0].widgets[0].width, 100);
    }

    #[test]
    fn add_widget_rejects_unknown_layer() {
        let p = Project::new();
        let m = Mutation::AddWidget {
            screen: p.screens[0].id,
            layer: LayerId::intern("mut_nowhere"),
            widget_type: WidgetType::Label,
            position: Some((0, 0)),
        };
        assert!(m.apply(&p).is_none());
    }

    #[test]
    fn update_merges_style_one_level_deep() {
        let (p, screen, _, ids) = project_with_buttons(1);
        let p = Mutation::UpdateWidgets {
            screen,
            patches: vec![(
                ids[0],
                WidgetPatch::style(Style {
                    radius: Some(12),
                    ..Style::default()
                }),
            )],
        }
        .apply(&p)
        .unwrap();
        let p = Mutation::UpdateWidgets {
            screen,
            patches: vec![(
                ids[0],
                WidgetPatch::style(Style {
                    font_size: Some(18),
                    ..Style::default()
                }),
            )],
        }
        .apply(&p)
        .unwrap();
        let style = &p.screens[0].widgets[0].style;
        assert_eq!(style.radius, Some(12));
        assert_eq!(style.font_size, Some(18));
        assert_eq!(style.bg_color, WidgetType::Button.default_style().bg_color);
    }

    #[test]
    fn unchanged_update_is_rejected() {
        let (p, screen, _, ids) = project_with_buttons(1);
        let m = Mutation::UpdateWidgets {
            screen,
            patches: vec![(ids[0], WidgetPatch::position(20, 20))],
        };
        assert!(m.apply(&p).is_none());
    }

    #[test]
    fn deleting_from_pair_dissolves_group() {
        let (p, screen, _, ids) = project_with_buttons(2);
        let p = Mutation::Group {
            screen,
            ids: ids.clone(),
        }
        .apply(&p)
        .unwrap();
        assert!(p.screens[0].widgets.iter().all(|w| w.group_id.is_some()));

        let p = Mutation::DeleteWidgets {
            screen,
            ids: vec![ids[0]],
        }
        .apply(&p)
        .unwrap();
        assert_eq!(p.screens[0].widgets.len(), 1);
        assert_eq!(p.screens[0].widgets[0].group_id, None);
    }

    #[test]
    fn group_needs_two() {
        let (p, screen, _, ids) = project_with_buttons(1);
        assert!(Mutation::Group { screen, ids }.apply(&p).is_none());
    }

    #[test]
    fn duplicate_keeps_grouping_under_fresh_id() {
        let (p, screen, _, ids) = project_with_buttons(3);
        let p = Mutation::Group {
            screen,
            ids: ids[..2].to_vec(),
        }
        .apply(&p)
        .unwrap();
        let original_group = p.screens[0].widgets[0].group_id;

        let p = Mutation::Duplicate {
            screen,
            ids: ids.clone(),
        }
        .apply(&p)
        .unwrap();
        let widgets = &p.screens[0].widgets;
        assert_eq!(widgets.len(), 6);
        let copies = &widgets[3..];
        assert_eq!((copies[0].x, copies[0].y), (40, 40));
        assert!(copies[0].group_id.is_some());
        assert_eq!(copies[0].group_id, copies[1].group_id);
        assert_ne!(copies[0].group_id, original_group);
        assert_eq!(copies[2].group_id, None);
        assert!(copies.iter().all(|c| !ids.contains(&c.id)));
    }

    #[test]
    fn duplicating_one_group_member_leaves_copy_ungrouped() {
        let (p, screen, _, ids) = project_with_buttons(2);
        let p = Mutation::Group {
            screen,
            ids: ids.clone(),
        }
        .apply(&p)
        .unwrap();
        let p = Mutation::Duplicate {
            screen,
            ids: vec![ids[0]],
        }
        .apply(&p)
        .unwrap();
        assert_eq!(p.screens[0].widgets[2].group_id, None);
    }

    #[test]
    fn set_positions_skips_locked_and_missing() {
        let (p, screen, layer, ids) = project_with_buttons(1);
        let positions = vec![(ids[0], 100, 100), (WidgetId::intern("mut_gone"), 5, 5)];
        let moved = Mutation::SetPositions {
            screen,
            positions: positions.clone(),
        }
        .apply(&p)
        .unwrap();
        assert_eq!((moved.screens[0].widgets[0].x, moved.screens[0].widgets[0].y), (100, 100));

        let locked = Mutation::SetLayerLocked {
            screen,
            layer,
            locked: true,
        }
        .apply(&p)
        .unwrap();
        assert!(Mutation::SetPositions { screen, positions }.apply(&locked).is_none());
    }

    #[test]
    fn layer_limits_hold() {
        let mut p = Project::new();
        let screen = p.screens[0].id;
        for n in 2..=5 {
            p = Mutation::AddLayer {
                screen,
                name: format!("Layer {n}"),
            }
            .apply(&p)
            .unwrap();
        }
        let sixth = Mutation::AddLayer {
            screen,
            name: "Layer 6".into(),
        };
        assert!(sixth.apply(&p).is_none());
        assert_eq!(p.screens[0].layers.len(), MAX_LAYERS);

        let single = Project::new();
        let only = single.screens[0].layers[0].id;
        assert!(
            Mutation::DeleteLayer {
                screen: single.screens[0].id,
                layer: only,
            }
            .apply(&single)
            .is_none()
        );
    }

    #[test]
    fn screens_cannot_drop_to_zero() {
        let p = Project::new();
        let only = p.screens[0].id;
        assert!(Mutation::DeleteScreen { screen: only }.apply(&p).is_none());

        let p = Mutation::AddScreen {
            name: "Settings".into(),
        }
        .apply(&p)
        .unwrap();
        let p = Mutation::DeleteScreen { screen: only }.apply(&p).unwrap();
        assert_eq!(p.screens.len(), 1);
        assert_eq!(p.screens[0].name, "Settings");
    }

    #[test]
    fn preset_copies_only_its_fields() {
        let (mut p, screen, _, ids) = project_with_buttons(1);
        p = Mutation::AddPreset {
            name: "Rounded".into(),
            style: Style {
                radius: Some(20),
                ..Style::default()
            },
        }
        .apply(&p)
        .unwrap();
        let preset = p.style_presets[0].id;
        assert!(
            Mutation::AddPreset {
                name: "Rounded".into(),
                style: Style::default(),
            }
            .apply(&p)
            .is_none()
        );

        let p = Mutation::ApplyPreset {
            screen,
            ids: ids.clone(),
            preset,
        }
        .apply(&p)
        .unwrap();
        let style = &p.screens[0].widgets[0].style;
        assert_eq!(style.radius, Some(20));
        assert_eq!(style.bg_color, WidgetType::Button.default_style().bg_color);
    }

    #[test]
    fn theme_updates_settings() {
        let p = Project::new();
        let p = Mutation::ApplyTheme {
            name: "dark".into(),
        }
        .apply(&p)
        .unwrap();
        assert!(p.settings.theme.dark);
        assert_eq!(p.settings.background, p.settings.theme.background);
        assert!(
            Mutation::ApplyTheme {
                name: "neon".into()
            }
            .apply(&p)
            .is_none()
        );
    }

    #[test]
    fn events_add_and_remove() {
        let (p, screen, _, ids) = project_with_buttons(1);
        let event = WidgetEvent::new(
            EventTrigger::Clicked,
            EventAction::CustomCode {
                code: "beep();".into(),
            },
        );
        let event_id = event.id;
        let p = Mutation::AddEvent {
            screen,
            widget: ids[0],
            event,
        }
        .apply(&p)
        .unwrap();
        assert_eq!(p.screens[0].widgets[0].events.len(), 1);
        let p = Mutation::RemoveEvent {
            screen,
            widget: ids[0],
            event: event_id,
        }
        .apply(&p)
        .unwrap();
        assert!(p.screens[0].widgets[0].events.is_empty());
    }

    /// Number the id generator will hand out next (or later, if other
    /// threads generate ids meanwhile).
    fn upcoming_suffix() -> u64 {
        GroupId::generate()
            .as_str()
            .rsplit('_')
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap()
    }

    #[test]
    fn new_preset_skips_ids_already_in_the_project() {
        let mut p = Project::new();
        let n = upcoming_suffix();
        for k in 1..=3 {
            let mut preset = StylePreset::new(format!("Loaded {k}"), Style::default());
            preset.id = PresetId::intern(&format!("preset_{}", n + k));
            p.style_presets.push(preset);
        }
        let p = Mutation::AddPreset {
            name: "Bold".into(),
            style: Style::default(),
        }
        .apply(&p)
        .unwrap();
        let ids: std::collections::HashSet<PresetId> =
            p.style_presets.iter().map(|pr| pr.id).collect();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn event_with_taken_id_is_renumbered() {
        let (p, screen, _, ids) = project_with_buttons(1);
        let event = WidgetEvent::new(
            EventTrigger::Pressed,
            EventAction::CustomCode {
                code: "buzz();".into(),
            },
        );
        let first_id = event.id;
        let add = Mutation::AddEvent {
            screen,
            widget: ids[0],
            event,
        };
        let p = add.apply(&p).unwrap();
        let p = add.apply(&p).unwrap();
        let events = &p.screens[0].widgets[0].events;
        assert_eq!(events.len(), 2);
        assert_ne!(events[0].id, events[1].id);

        let p = Mutation::RemoveEvent {
            screen,
            widget: ids[0],
            event: first_id,
        }
        .apply(&p)
        .unwrap();
        assert_eq!(p.screens[0].widgets[0].events.len(), 1);
    }

    #[test]
    fn labels_read_like_menu_items() {
        let screen = ScreenId::intern("mut_screen");
        let layer = LayerId::intern("mut_layer");
        let add = Mutation::AddWidget {
            screen,
            layer,
            widget_type: WidgetType::TextArea,
            position: None,
        };
        assert_eq!(add.label(), "Add Text Area");
        let front = Mutation::Reorder {
            screen,
            ids: vec![],
            op: ZOrder::BringToFront,
        };
        assert_eq!(front.label(), "Bring to Front");
    }
}
