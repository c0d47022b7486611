//! Pointer drag state machine.
//!
//! `Idle → Dragging → Idle` for moving widgets, `Idle → Marquee → Idle`
//! for rubber-band selection. The machine only computes positions; the
//! editor turns them into one batched document update per pointer move.

use kurbo::{Point, Rect};
use lvd_core::id::WidgetId;
use lvd_core::model::Screen;

/// Snap unit in canvas pixels.
pub const GRID_SIZE: i32 = 10;

/// Nearest grid multiple, halves rounded away from zero.
pub fn snap(v: f64) -> i32 {
    let grid = GRID_SIZE as f64;
    ((v / grid).round() * grid) as i32
}

/// Snapped drop position for a palette drop at `pointer`, relative to the
/// canvas origin.
pub fn drop_position(pointer: Point, canvas_origin: Point) -> (i32, i32) {
    let local = pointer - canvas_origin;
    (snap(local.x), snap(local.y))
}

/// A widget move in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    start: Point,
    /// Reference positions captured at pointer-down.
    origins: Vec<(WidgetId, i32, i32)>,
}

impl DragSession {
    /// Capture reference positions for `ids`. Missing widgets and widgets
    /// on locked layers are left out.
    pub fn begin(screen: &Screen, ids: &[WidgetId], start: Point) -> Self {
        let origins = ids
            .iter()
            .filter(|&&id| !screen.is_widget_locked(id))
            .filter_map(|&id| screen.widget(id).map(|w| (id, w.x, w.y)))
            .collect();
        Self { start, origins }
    }

    pub fn ids(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.origins.iter().map(|(id, _, _)| *id)
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    /// Snapped target positions for every dragged widget with the pointer
    /// at `pointer`.
    pub fn positions(&self, pointer: Point) -> Vec<(WidgetId, i32, i32)> {
        let delta = pointer - self.start;
        self.origins
            .iter()
            .map(|&(id, x, y)| (id, snap(x as f64 + delta.x), snap(y as f64 + delta.y)))
            .collect()
    }
}

/// Rubber-band selection in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Marquee {
    pub start: Point,
    pub current: Point,
    /// Shift held: add to the existing selection.
    pub additive: bool,
}

impl Marquee {
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.start, self.current)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
    Marquee(Marquee),
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }
}
