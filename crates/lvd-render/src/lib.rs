pub mod display;
pub mod hit;

pub use display::{DisplayItem, DisplayList, build_display_list};
pub use hit::{hit_test, hit_test_rect};
pub use kurbo::{Point, Rect};
