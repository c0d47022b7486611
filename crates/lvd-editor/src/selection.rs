//! Selection state and effective-selection resolution.
//!
//! The selection is transient editor state: it is never persisted and it
//! is pruned whenever the document changes underneath it (undo, delete).

use lvd_core::id::WidgetId;
use lvd_core::model::Screen;

/// Ordered set of selected widget ids (insertion order).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<WidgetId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = WidgetId>) -> Self {
        let mut sel = Self::new();
        sel.extend(ids);
        sel
    }

    pub fn ids(&self) -> &[WidgetId] {
        &self.ids
    }

    pub fn first(&self) -> Option<WidgetId> {
        self.ids.first().copied()
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Add ids not already selected.
    pub fn extend(&mut self, ids: impl IntoIterator<Item = WidgetId>) {
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    /// Drop ids that no longer exist on `screen`. Returns whether any were
    /// dropped.
    pub fn prune(&mut self, screen: &Screen) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| screen.contains_widget(*id));
        self.ids.len() != before
    }
}

/// Effective selection after a pointer-down on `hit`.
///
/// - `hit` already selected: unchanged, so the drag moves all of it.
/// - plain click: `hit` and its group.
/// - additive click: current selection plus `hit` and its group.
pub fn resolve_pointer_down(
    screen: &Screen,
    current: &Selection,
    hit: WidgetId,
    additive: bool,
) -> Selection {
    if current.contains(hit) {
        return current.clone();
    }
    let with_group = screen.expand_groups(&[hit]);
    if additive {
        let mut next = current.clone();
        next.extend(with_group);
        next
    } else {
        Selection::from_ids(with_group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lvd_core::id::GroupId;
    use lvd_core::model::{Widget, WidgetType};
    use pretty_assertions::assert_eq;

    fn screen() -> Screen {
        let mut s = Screen::new("Main");
        let layer = s.layers[0].id;
        for (name, x) in [("sel_a", 0), ("sel_b", 120), ("sel_c", 240)] {
            s.widgets
                .push(Widget::new(WidgetId::intern(name), layer, WidgetType::Button, x, 0));
        }
        s.group(
            &[WidgetId::intern("sel_a"), WidgetId::intern("sel_b")],
            GroupId::intern("g1"),
        );
        s
    }

    fn ids(names: &[&str]) -> Vec<WidgetId> {
        names.iter().map(|n| WidgetId::intern(n)).collect()
    }

    #[test]
    fn plain_click_on_grouped_selects_group() {
        let s = screen();
        let sel = resolve_pointer_down(&s, &Selection::new(), WidgetId::intern("sel_a"), false);
        assert_eq!(sel.ids(), ids(&["sel_a", "sel_b"]));
    }

    #[test]
    fn plain_click_on_ungrouped_selects_only_it() {
        let s = screen();
        let current = Selection::from_ids(ids(&["sel_a", "sel_b"]));
        let sel = resolve_pointer_down(&s, &current, WidgetId::intern("sel_c"), false);
        assert_eq!(sel.ids(), ids(&["sel_c"]));
    }

    #[test]
    fn additive_click_unions() {
        let mut s = screen();
        s.ungroup(&ids(&["sel_a"]));
        let current = Selection::from_ids(ids(&["sel_a"]));
        let sel = resolve_pointer_down(&s, &current, WidgetId::intern("sel_c"), true);
        assert_eq!(sel.ids(), ids(&["sel_a", "sel_c"]));
    }

    #[test]
    fn click_inside_selection_keeps_it() {
        let s = screen();
        let current = Selection::from_ids(ids(&["sel_c", "sel_a"]));
        let sel = resolve_pointer_down(&s, &current, WidgetId::intern("sel_a"), false);
        assert_eq!(sel, current);
    }

    #[test]
    fn prune_drops_missing() {
        let mut s = screen();
        let mut sel = Selection::from_ids(ids(&["sel_a", "sel_c"]));
        s.remove_widgets(&ids(&["sel_c"]));
        assert!(sel.prune(&s));
        assert_eq!(sel.ids(), ids(&["sel_a"]));
    }
}
