//! The editing session.
//!
//! `Editor` owns the project history plus the transient state around it:
//! selection, current screen, active layer and the pointer gesture in
//! progress. Hosts feed it input events; every document change goes
//! through [`Editor::execute`] and therefore through the history.

use crate::drag::{DragSession, DragState, Marquee, drop_position};
use crate::history::{History, HistoryMenu};
use crate::input::{InputEvent, Modifiers};
use crate::mutation::{Mutation, WidgetPatch};
use crate::selection::{Selection, resolve_pointer_down};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use kurbo::{Point, Rect};
use lvd_core::draft::parse_widget_drafts;
use lvd_core::export::ExportDocument;
use lvd_core::id::{LayerId, PresetId, ScreenId, WidgetId};
use lvd_core::layers::ZOrder;
use lvd_core::lint::{LintDiagnostic, lint_project};
use lvd_core::model::{Project, Screen, WidgetType};
use lvd_render::display::{DisplayList, build_display_list};
use lvd_render::hit::{hit_test, hit_test_rect};
use std::sync::Arc;

/// History label for a completed drag.
pub const MOVE_LABEL: &str = "Move Widget";

pub struct Editor {
    history: History<Project>,
    selection: Selection,
    current_screen: ScreenId,
    /// Preferred insertion layer; falls back to the top layer.
    active_layer: Option<LayerId>,
    drag: DragState,
}

impl Editor {
    pub fn new(mut project: Project) -> Self {
        if project.screens.is_empty() {
            project.screens.push(Screen::new("Main"));
        }
        Self::from_history(History::new(project))
    }

    /// Resume from an existing history, e.g. a restored session.
    pub fn from_history(history: History<Project>) -> Self {
        let current_screen = history
            .present()
            .screens
            .first()
            .map(|s| s.id)
            .unwrap_or_else(|| ScreenId::intern("main"));
        Self {
            history,
            selection: Selection::new(),
            current_screen,
            active_layer: None,
            drag: DragState::Idle,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn project(&self) -> &Project {
        self.history.present()
    }

    /// Shared handle to the current snapshot, for readers on other tasks.
    pub fn snapshot(&self) -> Arc<Project> {
        Arc::clone(self.history.present())
    }

    pub fn history(&self) -> &History<Project> {
        &self.history
    }

    pub fn history_menu(&self) -> HistoryMenu {
        self.history.menu()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn current_screen_id(&self) -> ScreenId {
        self.current_screen
    }

    pub fn current_screen(&self) -> Option<&Screen> {
        self.project().screen(self.current_screen)
    }

    /// Layer new widgets go to: the chosen one while it exists, else the
    /// topmost layer of the current screen.
    pub fn active_layer(&self) -> Option<LayerId> {
        let screen = self.current_screen()?;
        match self.active_layer {
            Some(id) if screen.layer(id).is_some() => Some(id),
            _ => screen.top_layer().map(|l| l.id),
        }
    }

    pub fn set_active_layer(&mut self, layer: LayerId) -> bool {
        let exists = self
            .current_screen()
            .is_some_and(|s| s.layer(layer).is_some());
        if exists {
            self.active_layer = Some(layer);
        }
        exists
    }

    /// Rubber-band rectangle while a marquee is in progress.
    pub fn marquee_rect(&self) -> Option<Rect> {
        match &self.drag {
            DragState::Marquee(m) => Some(m.rect()),
            _ => None,
        }
    }

    // ─── Core write path ─────────────────────────────────────────────────

    /// Apply `mutation` under its default label.
    pub fn execute(&mut self, mutation: Mutation) -> bool {
        let label = mutation.label();
        self.execute_labeled(mutation, &label)
    }

    /// Apply `mutation`, recording it as one history entry named `label`.
    /// Rejected and no-op mutations record nothing.
    pub fn execute_labeled(&mut self, mutation: Mutation, label: &str) -> bool {
        // Any edit other than the drag's own position update gets its own
        // entry: close the open move, record the edit, then keep dragging.
        let split_drag = matches!(self.drag, DragState::Dragging(_))
            && !matches!(mutation, Mutation::SetPositions { .. });
        if split_drag {
            self.history.end_batch(MOVE_LABEL);
        }
        let changed = self
            .history
            .set_with(label, |present| match mutation.apply(present) {
                Some(next) => Arc::new(next),
                None => Arc::clone(present),
            });
        if split_drag {
            self.history.begin_batch();
        }
        if changed {
            self.reconcile();
        }
        changed
    }

    /// Re-anchor transient state after the document changed under it.
    fn reconcile(&mut self) {
        let project = self.history.present();
        if project.screen(self.current_screen).is_none() {
            if let Some(first) = project.screens.first() {
                log::debug!("current screen gone, switching to {}", first.id);
                self.current_screen = first.id;
            }
            self.selection.clear();
            self.active_layer = None;
        }
        if let Some(screen) = project.screen(self.current_screen) {
            self.selection.prune(screen);
        }
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.finish_gesture();
        let done = self.history.undo();
        self.reconcile();
        done
    }

    pub fn redo(&mut self) -> bool {
        self.finish_gesture();
        let done = self.history.redo();
        self.reconcile();
        done
    }

    pub fn jump_to(&mut self, index: usize) -> bool {
        self.finish_gesture();
        let done = self.history.jump_to(index);
        self.reconcile();
        done
    }

    // ─── Screens & layers ────────────────────────────────────────────────

    /// Make `screen` current. Clears the selection.
    pub fn switch_screen(&mut self, screen: ScreenId) -> bool {
        if screen == self.current_screen || self.project().screen(screen).is_none() {
            return false;
        }
        self.finish_gesture();
        self.current_screen = screen;
        self.selection.clear();
        self.active_layer = None;
        true
    }

    pub fn add_screen(&mut self, name: &str) -> Option<ScreenId> {
        if !self.execute(Mutation::AddScreen { name: name.into() }) {
            return None;
        }
        let id = self.project().screens.last()?.id;
        self.switch_screen(id);
        Some(id)
    }

    pub fn delete_screen(&mut self, screen: ScreenId) -> bool {
        self.execute(Mutation::DeleteScreen { screen })
    }

    /// Add a layer on top of the current screen and make it active.
    pub fn add_layer(&mut self, name: &str) -> Option<LayerId> {
        let screen = self.current_screen;
        if !self.execute(Mutation::AddLayer {
            screen,
            name: name.into(),
        }) {
            return None;
        }
        let id = self.current_screen()?.top_layer()?.id;
        self.active_layer = Some(id);
        Some(id)
    }

    pub fn delete_layer(&mut self, layer: LayerId) -> bool {
        let screen = self.current_screen;
        self.execute(Mutation::DeleteLayer { screen, layer })
    }

    // ─── Widgets ─────────────────────────────────────────────────────────

    /// Add a default widget to the active layer and select it.
    pub fn add_widget(&mut self, ty: WidgetType, position: Option<(i32, i32)>) -> Option<WidgetId> {
        let screen = self.current_screen;
        let layer = self.active_layer()?;
        if !self.execute(Mutation::AddWidget {
            screen,
            layer,
            widget_type: ty,
            position,
        }) {
            return None;
        }
        let id = self.current_screen()?.widgets.last()?.id;
        self.selection = Selection::from_ids([id]);
        Some(id)
    }

    /// Palette drop at `pointer`, with `canvas_origin` the canvas' top-left
    /// corner in the same coordinate space.
    pub fn drop_widget(&mut self, ty: WidgetType, pointer: Point, canvas_origin: Point) -> Option<WidgetId> {
        let position = drop_position(pointer, canvas_origin);
        self.add_widget(ty, Some(position))
    }

    /// Replace the selection; group mates of `ids` are included.
    pub fn select(&mut self, ids: &[WidgetId]) {
        let expanded = match self.current_screen() {
            Some(screen) => screen.expand_groups(ids),
            None => Vec::new(),
        };
        let mut selection = Selection::from_ids(expanded);
        if let Some(screen) = self.current_screen() {
            selection.prune(screen);
        }
        self.selection = selection;
    }

    /// Every visible, unlocked widget on the current screen.
    pub fn select_all(&mut self) {
        let ids: Vec<WidgetId> = match self.current_screen() {
            Some(screen) => screen
                .visible_render_order()
                .into_iter()
                .filter(|w| !screen.is_widget_locked(w.id))
                .map(|w| w.id)
                .collect(),
            None => Vec::new(),
        };
        self.selection = Selection::from_ids(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn selected(&self) -> Vec<WidgetId> {
        self.selection.ids().to_vec()
    }

    /// Patch every selected widget.
    pub fn update_selected(&mut self, patch: WidgetPatch) -> bool {
        let patches = self
            .selection
            .ids()
            .iter()
            .map(|&id| (id, patch.clone()))
            .collect();
        let screen = self.current_screen;
        self.execute(Mutation::UpdateWidgets { screen, patches })
    }

    pub fn delete_selected(&mut self) -> bool {
        let screen = self.current_screen;
        let ids = self.selected();
        self.execute(Mutation::DeleteWidgets { screen, ids })
    }

    pub fn group_selected(&mut self) -> bool {
        if self.selection.len() < 2 {
            log::warn!("group needs at least 2 selected widgets");
            return false;
        }
        let screen = self.current_screen;
        let ids = self.selected();
        self.execute(Mutation::Group { screen, ids })
    }

    pub fn ungroup_selected(&mut self) -> bool {
        let screen = self.current_screen;
        let ids = self.selected();
        self.execute(Mutation::Ungroup { screen, ids })
    }

    pub fn reorder_selected(&mut self, op: ZOrder) -> bool {
        let screen = self.current_screen;
        let ids = self.selected();
        self.execute(Mutation::Reorder { screen, ids, op })
    }

    pub fn move_selected_to_layer(&mut self, layer: LayerId) -> bool {
        let screen = self.current_screen;
        let ids = self.selected();
        self.execute(Mutation::MoveToLayer { screen, ids, layer })
    }

    pub fn nudge_selected(&mut self, dx: i32, dy: i32) -> bool {
        let screen = self.current_screen;
        let ids = self.selected();
        self.execute(Mutation::Nudge { screen, ids, dx, dy })
    }

    /// Duplicate the selection and select the copies.
    pub fn duplicate_selected(&mut self) -> bool {
        let Some(before) = self.current_screen().map(|s| s.widgets.len()) else {
            return false;
        };
        let screen = self.current_screen;
        let ids = self.selected();
        if !self.execute(Mutation::Duplicate { screen, ids }) {
            return false;
        }
        let copies: Vec<WidgetId> = self
            .current_screen()
            .map(|s| s.widgets[before..].iter().map(|w| w.id).collect())
            .unwrap_or_default();
        self.selection = Selection::from_ids(copies);
        true
    }

    pub fn apply_preset(&mut self, preset: PresetId) -> bool {
        let screen = self.current_screen;
        let ids = self.selected();
        self.execute(Mutation::ApplyPreset { screen, ids, preset })
    }

    pub fn apply_theme(&mut self, name: &str) -> bool {
        self.execute(Mutation::ApplyTheme { name: name.into() })
    }

    /// Parse an AI reply and insert its widgets into the active layer as
    /// one undo step. Parse errors leave the document untouched.
    pub fn insert_drafts(&mut self, reply: &str) -> anyhow::Result<usize> {
        let drafts = parse_widget_drafts(reply)?;
        let count = drafts.len();
        let Some(layer) = self.active_layer() else {
            anyhow::bail!("current screen {} has no layer", self.current_screen);
        };
        let screen = self.current_screen;
        self.execute(Mutation::InsertDrafts {
            screen,
            layer,
            drafts,
        });
        Ok(count)
    }

    // ─── Pointer gestures ────────────────────────────────────────────────

    /// Pointer pressed on the canvas. Resolves the effective selection
    /// before any move arrives so the drag captures current positions.
    pub fn pointer_down(&mut self, x: f64, y: f64, modifiers: Modifiers) {
        self.finish_gesture();
        let Some(screen) = self.current_screen() else {
            return;
        };
        let point = Point::new(x, y);
        match hit_test(screen, x, y) {
            Some(hit) => {
                let selection = resolve_pointer_down(screen, &self.selection, hit, modifiers.shift);
                let session = DragSession::begin(screen, selection.ids(), point);
                self.selection = selection;
                if !session.is_empty() {
                    self.history.begin_batch();
                    self.drag = DragState::Dragging(session);
                }
            }
            None => {
                if !modifiers.shift {
                    self.selection.clear();
                }
                self.drag = DragState::Marquee(Marquee {
                    start: point,
                    current: point,
                    additive: modifiers.shift,
                });
            }
        }
    }

    /// Pointer moved. While dragging, all selected widgets move in one
    /// batched write-through update.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        let point = Point::new(x, y);
        let positions = match &mut self.drag {
            DragState::Dragging(session) => session.positions(point),
            DragState::Marquee(m) => {
                m.current = point;
                return false;
            }
            DragState::Idle => return false,
        };
        log::trace!("drag to ({x}, {y}): {} widgets", positions.len());
        let screen = self.current_screen;
        self.execute_labeled(Mutation::SetPositions { screen, positions }, MOVE_LABEL)
    }

    /// Pointer released anywhere. Ends the gesture; returns whether a
    /// history entry was recorded.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> bool {
        if let DragState::Marquee(m) = &mut self.drag {
            m.current = Point::new(x, y);
        }
        self.finish_gesture()
    }

    /// Close whatever gesture is open.
    fn finish_gesture(&mut self) -> bool {
        match std::mem::take(&mut self.drag) {
            DragState::Idle => false,
            DragState::Dragging(_) => {
                let recorded = self.history.end_batch(MOVE_LABEL);
                self.reconcile();
                recorded
            }
            DragState::Marquee(m) => {
                self.finish_marquee(&m);
                false
            }
        }
    }

    fn finish_marquee(&mut self, marquee: &Marquee) {
        let rect = marquee.rect();
        if rect.width() == 0.0 && rect.height() == 0.0 {
            return;
        }
        let Some(screen) = self.current_screen() else {
            return;
        };
        let hits = screen.expand_groups(&hit_test_rect(screen, rect));
        if marquee.additive {
            self.selection.extend(hits);
        } else {
            self.selection = Selection::from_ids(hits);
        }
    }

    // ─── Input dispatch ──────────────────────────────────────────────────

    /// Feed one input event. Returns whether the document changed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { x, y, modifiers } => {
                self.pointer_down(*x, *y, *modifiers);
                false
            }
            InputEvent::PointerMove { x, y } => self.pointer_move(*x, *y),
            InputEvent::PointerUp { x, y } => self.pointer_up(*x, *y),
            InputEvent::Key { key, modifiers } => self
                .handle_key(key, *modifiers)
                .is_some_and(|(_, changed)| changed),
        }
    }

    /// Resolve and run a key binding. Returns the action and whether the
    /// document changed.
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> Option<(ShortcutAction, bool)> {
        let action = ShortcutMap::resolve(key, modifiers)?;
        Some((action, self.run_shortcut(action)))
    }

    pub fn run_shortcut(&mut self, action: ShortcutAction) -> bool {
        match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Delete => self.delete_selected(),
            ShortcutAction::Duplicate => self.duplicate_selected(),
            ShortcutAction::Group => self.group_selected(),
            ShortcutAction::Ungroup => self.ungroup_selected(),
            ShortcutAction::SelectAll => {
                self.select_all();
                false
            }
            ShortcutAction::Deselect => {
                self.clear_selection();
                false
            }
            ShortcutAction::SendBackward
            | ShortcutAction::BringForward
            | ShortcutAction::SendToBack
            | ShortcutAction::BringToFront => action
                .zorder()
                .is_some_and(|op| self.reorder_selected(op)),
            ShortcutAction::NudgeLeft
            | ShortcutAction::NudgeRight
            | ShortcutAction::NudgeUp
            | ShortcutAction::NudgeDown => action
                .nudge_delta()
                .is_some_and(|(dx, dy)| self.nudge_selected(dx, dy)),
        }
    }

    // ─── Readers ─────────────────────────────────────────────────────────

    pub fn display_list(&self) -> Option<DisplayList> {
        let screen = self.current_screen()?;
        Some(build_display_list(screen, self.selection.ids()))
    }

    pub fn export(&self, target_language: &str) -> ExportDocument {
        ExportDocument::build(self.project(), target_language)
    }

    pub fn lint(&self) -> Vec<LintDiagnostic> {
        lint_project(self.project())
    }
}
