//! Pad localization: adaptive threshold, outer components, shape filter and
//! reading order.

pub mod pads;
pub use pads::{detect, detect_with_mask};
pub mod threshold;
pub use threshold::adaptive_threshold_inv;
