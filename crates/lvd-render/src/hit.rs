//! Hit testing: point → widget lookup.
//!
//! Reverse-walks the paint order (front-to-back) to find which widget is
//! at a given canvas position. Widgets on hidden or locked layers can't be
//! hit.

use crate::display::widget_rect;
use kurbo::{Point, Rect};
use lvd_core::id::WidgetId;
use lvd_core::model::{Screen, Widget};

fn pickable(screen: &Screen, w: &Widget) -> bool {
    screen
        .layer(w.layer_id)
        .is_some_and(|l| l.visible && !l.locked)
}

/// Find the topmost pickable widget at (px, py).
/// Returns `None` if only the background is hit.
pub fn hit_test(screen: &Screen, px: f64, py: f64) -> Option<WidgetId> {
    let p = Point::new(px, py);
    screen
        .render_order()
        .into_iter()
        .rev()
        .filter(|w| pickable(screen, w))
        .find(|w| widget_rect(w).contains(p))
        .map(|w| w.id)
}

/// All pickable widgets overlapping `rect`, bottom to top.
/// Used for marquee (box) selection.
pub fn hit_test_rect(screen: &Screen, rect: Rect) -> Vec<WidgetId> {
    let rect = rect.abs();
    screen
        .render_order()
        .into_iter()
        .filter(|w| pickable(screen, w))
        .filter(|w| overlaps(widget_rect(w), rect))
        .map(|w| w.id)
        .collect()
}

fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

#[cfg(test)]
mod tests {
    use super::*;
    use lvd_core::model::{Layer, WidgetType};
    use pretty_assertions::assert_eq;

    fn screen() -> Screen {
        let mut s = Screen::new("Main");
        let base = s.layers[0].id;
        s.widgets.push(Widget::new(
            WidgetId::intern("hit_back"),
            base,
            WidgetType::Container,
            0,
            0,
        ));
        s.widgets.push(Widget::new(
            WidgetId::intern("hit_front"),
            base,
            WidgetType::Button,
            10,
            10,
        ));
        s
    }

    #[test]
    fn topmost_widget_wins() {
        let s = screen();
        assert_eq!(hit_test(&s, 15.0, 15.0), Some(WidgetId::intern("hit_front")));
        assert_eq!(hit_test(&s, 150.0, 120.0), Some(WidgetId::intern("hit_back")));
        assert_eq!(hit_test(&s, 400.0, 300.0), None);
    }

    #[test]
    fn locked_and_hidden_layers_are_not_pickable() {
        let mut s = screen();
        let base = s.layers[0].id;
        s.set_layer_locked(base, true);
        assert_eq!(hit_test(&s, 15.0, 15.0), None);

        s.set_layer_locked(base, false);
        let top = Layer::new("Top");
        let top_id = top.id;
        s.add_layer(top);
        s.widgets.insert(
            0,
            Widget::new(WidgetId::intern("hit_ghost"), top_id, WidgetType::Label, 0, 0),
        );
        assert_eq!(hit_test(&s, 5.0, 5.0), Some(WidgetId::intern("hit_ghost")));
        s.set_layer_visible(top_id, false);
        assert_eq!(hit_test(&s, 5.0, 5.0), Some(WidgetId::intern("hit_back")));
    }

    #[test]
    fn marquee_collects_overlapping() {
        let s = screen();
        let hits = hit_test_rect(&s, Rect::new(105.0, 55.0, 300.0, 300.0));
        assert_eq!(hits, vec![WidgetId::intern("hit_back"), WidgetId::intern("hit_front")]);
        let hits = hit_test_rect(&s, Rect::new(300.0, 300.0, 250.0, 260.0));
        assert!(hits.is_empty());
    }
}
