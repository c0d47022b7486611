//! Layer management and z-order for a single screen.
//!
//! Paint order is layer order (bottom → top) combined with each widget's
//! position among the widgets of its own layer. Z-order operations never
//! move a widget across a layer boundary.
//!
//! Every operation returns `bool` ("did anything change"); rejected or
//! no-op calls leave the screen untouched.

use crate::id::{LayerId, WidgetId};
use crate::model::{Layer, MAX_LAYERS, Screen, Widget};

/// Stacking change applied to widgets within their own layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZOrder {
    /// One step up (swap with the next widget of the layer).
    BringForward,
    /// One step down (swap with the previous widget of the layer).
    SendBackward,
    /// Top of the layer.
    BringToFront,
    /// Bottom of the layer.
    SendToBack,
}

/// Where a moved layer lands relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

impl Screen {
    pub fn layer_index(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    /// Add a layer on top of the stack. Rejected at `MAX_LAYERS`.
    pub fn add_layer(&mut self, layer: Layer) -> bool {
        if self.layers.len() >= MAX_LAYERS {
            log::warn!(
                "screen {}: layer limit ({MAX_LAYERS}) reached, not adding {}",
                self.id,
                layer.name
            );
            return false;
        }
        self.layers.push(layer);
        true
    }

    /// Remove a layer and every widget on it. The last layer can't be removed.
    pub fn remove_layer(&mut self, id: LayerId) -> bool {
        if self.layers.len() <= 1 {
            log::warn!("screen {}: refusing to delete the only layer", self.id);
            return false;
        }
        let Some(pos) = self.layer_index(id) else {
            return false;
        };
        self.layers.remove(pos);
        let doomed: Vec<WidgetId> = self
            .widgets
            .iter()
            .filter(|w| w.layer_id == id)
            .map(|w| w.id)
            .collect();
        self.remove_widgets(&doomed);
        true
    }

    /// Move layer `id` to sit immediately before or after `target`.
    pub fn move_layer(&mut self, id: LayerId, target: LayerId, placement: Placement) -> bool {
        if id == target {
            return false;
        }
        let (Some(from), Some(_)) = (self.layer_index(id), self.layer_index(target)) else {
            return false;
        };
        let before = self.layers.iter().map(|l| l.id).collect::<Vec<_>>();
        let layer = self.layers.remove(from);
        let Some(target_pos) = self.layer_index(target) else {
            self.layers.insert(from, layer);
            return false;
        };
        let insert_at = match placement {
            Placement::Before => target_pos,
            Placement::After => target_pos + 1,
        };
        self.layers.insert(insert_at, layer);
        self.layers.iter().map(|l| l.id).ne(before)
    }

    pub fn rename_layer(&mut self, id: LayerId, name: &str) -> bool {
        match self.layer_mut(id) {
            Some(layer) if layer.name != name => {
                layer.name = name.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn set_layer_visible(&mut self, id: LayerId, visible: bool) -> bool {
        match self.layer_mut(id) {
            Some(layer) if layer.visible != visible => {
                layer.visible = visible;
                true
            }
            _ => false,
        }
    }

    pub fn set_layer_locked(&mut self, id: LayerId, locked: bool) -> bool {
        match self.layer_mut(id) {
            Some(layer) if layer.locked != locked => {
                layer.locked = locked;
                true
            }
            _ => false,
        }
    }

    /// Whether the widget sits on a locked layer. A widget whose layer no
    /// longer exists counts as unlocked.
    pub fn is_widget_locked(&self, id: WidgetId) -> bool {
        self.widget(id)
            .and_then(|w| self.layer(w.layer_id))
            .is_some_and(|l| l.locked)
    }

    /// Whether the widget would be painted: its layer exists and is visible.
    pub fn is_widget_visible(&self, id: WidgetId) -> bool {
        self.widget(id)
            .and_then(|w| self.layer(w.layer_id))
            .is_some_and(|l| l.visible)
    }

    /// Indices into `widgets` of every widget on `layer`, bottom to top.
    fn layer_slots(&self, layer: LayerId) -> Vec<usize> {
        self.widgets
            .iter()
            .enumerate()
            .filter(|(_, w)| w.layer_id == layer)
            .map(|(i, _)| i)
            .collect()
    }

    /// Widgets of one layer, bottom to top.
    pub fn widgets_in_layer(&self, layer: LayerId) -> impl Iterator<Item = &Widget> {
        self.widgets.iter().filter(move |w| w.layer_id == layer)
    }

    /// Full paint order, bottom to top. Widgets whose layer is missing are
    /// skipped.
    pub fn render_order(&self) -> Vec<&Widget> {
        self.layers
            .iter()
            .flat_map(|l| self.widgets_in_layer(l.id))
            .collect()
    }

    /// Paint order restricted to visible layers.
    pub fn visible_render_order(&self) -> Vec<&Widget> {
        self.layers
            .iter()
            .filter(|l| l.visible)
            .flat_map(|l| self.widgets_in_layer(l.id))
            .collect()
    }

    /// Restack `ids` within their layers. Several targets on one layer keep
    /// their relative order. Unknown ids are ignored.
    pub fn reorder_widgets(&mut self, ids: &[WidgetId], op: ZOrder) -> bool {
        let mut layers: Vec<LayerId> = Vec::new();
        for w in self.widgets.iter().filter(|w| ids.contains(&w.id)) {
            if !layers.contains(&w.layer_id) {
                layers.push(w.layer_id);
            }
        }

        let mut changed = false;
        for layer in layers {
            let slots = self.layer_slots(layer);
            let mut order = slots.clone();
            let is_target = |i: usize, widgets: &[Widget]| ids.contains(&widgets[i].id);

            match op {
                ZOrder::BringToFront => {
                    let (targets, rest): (Vec<usize>, Vec<usize>) =
                        order.iter().partition(|&&i| is_target(i, &self.widgets));
                    order = rest.into_iter().chain(targets).collect();
                }
                ZOrder::SendToBack => {
                    let (targets, rest): (Vec<usize>, Vec<usize>) =
                        order.iter().partition(|&&i| is_target(i, &self.widgets));
                    order = targets.into_iter().chain(rest).collect();
                }
                ZOrder::BringForward => {
                    // Walk top-down so a run of targets moves up together.
                    for i in (0..order.len().saturating_sub(1)).rev() {
                        if is_target(order[i], &self.widgets)
                            && !is_target(order[i + 1], &self.widgets)
                        {
                            order.swap(i, i + 1);
                        }
                    }
                }
                ZOrder::SendBackward => {
                    for i in 1..order.len() {
                        if is_target(order[i], &self.widgets)
                            && !is_target(order[i - 1], &self.widgets)
                        {
                            order.swap(i, i - 1);
                        }
                    }
                }
            }

            if order == slots {
                continue;
            }
            let restacked: Vec<Widget> = order.iter().map(|&i| self.widgets[i].clone()).collect();
            for (slot, widget) in slots.into_iter().zip(restacked) {
                self.widgets[slot] = widget;
            }
            changed = true;
        }
        changed
    }

    /// Reassign widgets to another layer, placing them on top of it.
    pub fn move_widgets_to_layer(&mut self, ids: &[WidgetId], layer: LayerId) -> bool {
        if self.layer(layer).is_none() {
            return false;
        }
        let (mut moving, kept): (Vec<Widget>, Vec<Widget>) = std::mem::take(&mut self.widgets)
            .into_iter()
            .partition(|w| ids.contains(&w.id) && w.layer_id != layer);
        self.widgets = kept;
        if moving.is_empty() {
            return false;
        }
        for w in &mut moving {
            w.layer_id = layer;
        }
        self.widgets.extend(moving);
        true
    }
}
