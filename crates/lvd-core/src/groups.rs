//! Widget grouping.
//!
//! A group is just a shared `group_id` tag. A tag carried by a single widget
//! means nothing, so every operation that can shrink a group finishes by
//! dissolving the groups left with one member.

use crate::id::{GroupId, WidgetId};
use crate::model::Screen;
use std::collections::HashMap;

impl Screen {
    /// Every widget carrying `group`, in storage order.
    pub fn group_members(&self, group: GroupId) -> Vec<WidgetId> {
        self.widgets
            .iter()
            .filter(|w| w.group_id == Some(group))
            .map(|w| w.id)
            .collect()
    }

    /// `ids` plus every widget grouped with one of them. Input order is kept,
    /// group mates follow in storage order, duplicates are dropped.
    pub fn expand_groups(&self, ids: &[WidgetId]) -> Vec<WidgetId> {
        let mut out: Vec<WidgetId> = Vec::with_capacity(ids.len());
        for &id in ids {
            if !out.contains(&id) {
                out.push(id);
            }
            if let Some(group) = self.widget(id).and_then(|w| w.group_id) {
                for mate in self.group_members(group) {
                    if !out.contains(&mate) {
                        out.push(mate);
                    }
                }
            }
        }
        out
    }

    /// Tag the existing widgets among `ids` with `group`. Needs at least two
    /// of them; previous memberships are replaced.
    pub fn group(&mut self, ids: &[WidgetId], group: GroupId) -> bool {
        let present = ids.iter().filter(|&&id| self.contains_widget(id)).count();
        if present < 2 {
            log::warn!("group needs at least 2 widgets, got {present}");
            return false;
        }
        for w in self.widgets.iter_mut().filter(|w| ids.contains(&w.id)) {
            w.group_id = Some(group);
        }
        self.dissolve_singleton_groups();
        true
    }

    /// Clear the group tag of every widget sharing a group with `ids`.
    pub fn ungroup(&mut self, ids: &[WidgetId]) -> bool {
        let groups: Vec<GroupId> = ids
            .iter()
            .filter_map(|&id| self.widget(id).and_then(|w| w.group_id))
            .collect();
        if groups.is_empty() {
            return false;
        }
        for w in &mut self.widgets {
            if w.group_id.is_some_and(|g| groups.contains(&g)) {
                w.group_id = None;
            }
        }
        true
    }

    /// Clear tags held by only one widget. Returns how many were cleared.
    pub fn dissolve_singleton_groups(&mut self) -> usize {
        let mut counts: HashMap<GroupId, usize> = HashMap::new();
        for g in self.widgets.iter().filter_map(|w| w.group_id) {
            *counts.entry(g).or_default() += 1;
        }
        let mut dissolved = 0;
        for w in &mut self.widgets {
            if let Some(g) = w.group_id
                && counts.get(&g).copied().unwrap_or(0) <= 1
            {
                log::debug!("dissolving single-member group {g} on {}", w.id);
                w.group_id = None;
                dissolved += 1;
            }
        }
        dissolved
    }
}
