mod interval_dialog;
mod overlay;

pub use interval_dialog::{DialogEvent, IntervalDialog};
pub use overlay::{OverlayEvent, RestOverlay};
