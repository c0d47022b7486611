//! Screen → display list.
//!
//! A pure function of the document: walks the screen in paint order and
//! emits one item per visible widget with its resolved style and canvas
//! rectangle. Hosts turn the list into pixels however they like.

use kurbo::{Rect, RoundedRect};
use lvd_core::id::{LayerId, WidgetId};
use lvd_core::model::{Color, Screen, Style, Widget, WidgetKind, merge_style};

/// One widget ready to paint.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayItem {
    pub widget: WidgetId,
    pub layer: LayerId,
    pub rect: Rect,
    /// Type defaults with the widget's own style laid over them.
    pub style: Style,
    /// Text to draw on the widget, if its type has one.
    pub text: Option<String>,
    pub locked: bool,
    pub selected: bool,
}

impl DisplayItem {
    pub fn shape(&self) -> RoundedRect {
        self.rect
            .to_rounded_rect(self.style.radius.unwrap_or(0) as f64)
    }

    /// Opacity as a 0.0 ..= 1.0 factor.
    pub fn alpha(&self) -> f64 {
        self.style.opacity.unwrap_or(255) as f64 / 255.0
    }
}

/// Everything needed to draw one screen.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    pub background: Color,
    /// Bottom to top.
    pub items: Vec<DisplayItem>,
    /// Union of the selected items' rectangles.
    pub selection_bounds: Option<Rect>,
}

/// Canvas rectangle of a widget.
pub fn widget_rect(w: &Widget) -> Rect {
    let x = w.x as f64;
    let y = w.y as f64;
    Rect::new(x, y, x + w.width as f64, y + w.height as f64)
}

/// Resolved style: type defaults, then the widget's overrides.
pub fn resolve_style(w: &Widget) -> Style {
    let mut style = w.widget_type().default_style();
    merge_style(&mut style, &w.style);
    style
}

/// Build the display list for `screen`, marking `selected` widgets.
pub fn build_display_list(screen: &Screen, selected: &[WidgetId]) -> DisplayList {
    let items: Vec<DisplayItem> = screen
        .visible_render_order()
        .into_iter()
        .map(|w| {
            log::trace!("PAINT {} {:?} at ({}, {})", w.id, w.widget_type(), w.x, w.y);
            DisplayItem {
                widget: w.id,
                layer: w.layer_id,
                rect: widget_rect(w),
                style: resolve_style(w),
                text: display_text(&w.kind),
                locked: screen.layer(w.layer_id).is_some_and(|l| l.locked),
                selected: selected.contains(&w.id),
            }
        })
        .collect();

    let selection_bounds = items
        .iter()
        .filter(|i| i.selected)
        .map(|i| i.rect)
        .reduce(|a, b| a.union(b));

    DisplayList {
        background: screen.bg_color,
        items,
        selection_bounds,
    }
}

fn display_text(kind: &WidgetKind) -> Option<String> {
    match kind {
        WidgetKind::Roller { options, selected } | WidgetKind::Dropdown { options, selected } => {
            options.get(*selected).cloned()
        }
        WidgetKind::Icon { symbol } => Some(symbol.clone()),
        WidgetKind::TextArea { text, placeholder } if text.is_empty() => Some(placeholder.clone()),
        other => other.text().map(str::to_string),
    }
}
