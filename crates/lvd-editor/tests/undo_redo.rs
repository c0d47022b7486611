//! Integration tests: history engine under real document edits.
//!
//! Exercises `Editor` + `History<Project>`: round trips, branch cuts,
//! jump-to, z-order and layer rules, all through the mutation façade.

use lvd_core::id::{LayerId, WidgetId};
use lvd_core::layers::ZOrder;
use lvd_core::model::{Layer, MAX_LAYERS, Project, Widget, WidgetType};
use lvd_core::{project_from_json, project_to_json};
use lvd_editor::{Editor, Mutation, WidgetPatch};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn editor_with_edits() -> (Editor, Vec<Arc<Project>>) {
    let mut ed = Editor::new(Project::new());
    let mut states = vec![ed.snapshot()];
    ed.add_widget(WidgetType::Button, None);
    states.push(ed.snapshot());
    ed.add_widget(WidgetType::Slider, None);
    states.push(ed.snapshot());
    ed.update_selected(WidgetPatch::size(180, 24));
    states.push(ed.snapshot());
    ed.apply_theme("ocean");
    states.push(ed.snapshot());
    (ed, states)
}

// ─── Round trip ─────────────────────────────────────────────────────────

#[test]
fn undo_all_then_redo_all() {
    let (mut ed, states) = editor_with_edits();
    let n = states.len() - 1;
    assert_eq!(ed.history().past().len(), n);

    for _ in 0..n {
        assert!(ed.undo());
    }
    assert!(Arc::ptr_eq(&ed.snapshot(), &states[0]));
    assert!(!ed.undo());

    for _ in 0..n {
        assert!(ed.redo());
    }
    assert_eq!(*ed.snapshot(), *states[n]);
    assert!(!ed.redo());
}

#[test]
fn each_undo_restores_previous_snapshot() {
    let (mut ed, states) = editor_with_edits();
    for expected in states.iter().rev().skip(1) {
        ed.undo();
        assert!(Arc::ptr_eq(&ed.snapshot(), expected));
    }
}

// ─── Branch cut ─────────────────────────────────────────────────────────

#[test]
fn new_edit_after_undo_clears_redo() {
    let (mut ed, _) = editor_with_edits();
    ed.undo();
    ed.undo();
    assert_eq!(ed.history().future_len(), 2);

    ed.add_widget(WidgetType::Led, None);
    assert_eq!(ed.history().future_len(), 0);
    assert!(!ed.redo());
}

#[test]
fn rejected_edit_keeps_redo() {
    let (mut ed, _) = editor_with_edits();
    ed.undo();
    // Single selection can't be grouped: nothing recorded, redo survives.
    assert!(!ed.group_selected());
    assert_eq!(ed.history().future_len(), 1);
}

// ─── Jump ───────────────────────────────────────────────────────────────

#[test]
fn jump_to_then_redo_back() {
    let (mut ed, states) = editor_with_edits();
    let before = ed.snapshot();
    let past_len = ed.history().past().len();

    assert!(ed.jump_to(1));
    assert!(Arc::ptr_eq(&ed.snapshot(), &states[1]));
    for _ in 0..past_len - 1 {
        assert!(ed.redo());
    }
    assert_eq!(*ed.snapshot(), *before);
}

#[test]
fn jump_out_of_range_is_noop() {
    let (mut ed, _) = editor_with_edits();
    let before = ed.snapshot();
    assert!(!ed.jump_to(99));
    assert!(Arc::ptr_eq(&ed.snapshot(), &before));
}

// ─── Z-order & layers ───────────────────────────────────────────────────

#[test]
fn zorder_within_layer() {
    let mut ed = Editor::new(Project::new());
    let a = ed.add_widget(WidgetType::Button, Some((0, 0))).unwrap();
    let b = ed.add_widget(WidgetType::Button, Some((10, 0))).unwrap();
    let c = ed.add_widget(WidgetType::Button, Some((20, 0))).unwrap();
    let order = |ed: &Editor| -> Vec<_> {
        ed.current_screen()
            .unwrap()
            .render_order()
            .iter()
            .map(|w| w.id)
            .collect()
    };

    ed.select(&[a]);
    assert!(ed.reorder_selected(ZOrder::BringToFront));
    assert_eq!(order(&ed), [b, c, a]);
    ed.undo();

    ed.select(&[c]);
    assert!(ed.reorder_selected(ZOrder::SendBackward));
    assert_eq!(order(&ed), [a, c, b]);

    // Already at the bottom: no entry.
    ed.select(&[a]);
    let past = ed.history().past().len();
    assert!(!ed.reorder_selected(ZOrder::SendToBack));
    assert_eq!(ed.history().past().len(), past);
}

#[test]
fn layer_count_bounds() {
    let mut ed = Editor::new(Project::new());
    for n in 2..=MAX_LAYERS {
        assert!(ed.add_layer(&format!("Layer {n}")).is_some());
    }
    assert_eq!(ed.add_layer("Layer 6"), None);
    assert_eq!(ed.current_screen().unwrap().layers.len(), MAX_LAYERS);

    let mut ed = Editor::new(Project::new());
    let only = ed.active_layer().unwrap();
    assert!(!ed.delete_layer(only));
    assert_eq!(ed.current_screen().unwrap().layers.len(), 1);
}

#[test]
fn added_layer_never_reuses_a_loaded_layer_id() {
    // Name the loaded layers after the ids the generator will hand out next.
    let n: u64 = LayerId::generate()
        .as_str()
        .rsplit('_')
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap();
    let mut project = Project::new();
    let screen = &mut project.screens[0];
    screen.layers[0].id = LayerId::intern(&format!("layer_{}", n + 1));
    for k in 2..MAX_LAYERS as u64 {
        let mut layer = Layer::new(format!("Loaded {k}"));
        layer.id = LayerId::intern(&format!("layer_{}", n + k));
        screen.layers.push(layer);
    }
    let base = screen.layers[0].id;
    screen.widgets.push(Widget::new(
        WidgetId::intern("loaded_ok"),
        base,
        WidgetType::Button,
        10,
        10,
    ));
    let loaded = project_from_json(&project_to_json(&project).unwrap()).unwrap();

    let mut ed = Editor::new(loaded);
    let added = ed.add_layer("Overlay").unwrap();
    let screen = ed.current_screen().unwrap();
    let mut ids: Vec<&str> = screen.layers.iter().map(|l| l.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), MAX_LAYERS);
    assert_eq!(screen.render_order().len(), 1);

    assert!(ed.delete_layer(added));
    assert_eq!(ed.current_screen().unwrap().widgets.len(), 1);
}

#[test]
fn deleting_active_layer_falls_back_to_top() {
    let mut ed = Editor::new(Project::new());
    let base = ed.active_layer().unwrap();
    let top = ed.add_layer("Top").unwrap();
    assert_eq!(ed.active_layer(), Some(top));
    ed.add_widget(WidgetType::Label, None);
    assert!(ed.delete_layer(top));
    assert_eq!(ed.active_layer(), Some(base));
    assert!(ed.current_screen().unwrap().widgets.is_empty());
    assert!(ed.selection().is_empty());
}

#[test]
fn delete_prunes_selection_and_dissolves_group() {
    let mut ed = Editor::new(Project::new());
    let a = ed.add_widget(WidgetType::Button, Some((0, 0))).unwrap();
    let b = ed.add_widget(WidgetType::Button, Some((200, 0))).unwrap();
    ed.select(&[a, b]);
    ed.group_selected();

    let screen = ed.current_screen_id();
    ed.execute(Mutation::DeleteWidgets {
        screen,
        ids: vec![a],
    });
    assert_eq!(ed.selection().ids(), [b]);
    let survivor = ed.current_screen().unwrap().widget(b).unwrap();
    assert_eq!(survivor.group_id, None);
}

#[test]
fn capped_history_drops_oldest() {
    let history = lvd_editor::History::new(Project::new()).with_max_depth(2);
    let mut ed = Editor::from_history(history);
    for _ in 0..4 {
        ed.add_widget(WidgetType::Label, None);
    }
    assert_eq!(ed.history().past().len(), 2);
    ed.undo();
    ed.undo();
    assert!(!ed.undo());
    assert_eq!(ed.current_screen().unwrap().widgets.len(), 2);
}
