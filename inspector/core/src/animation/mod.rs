//! Animation
//!
//! Auto-scroll of the conversation view: easing curves, the frame-driven
//! scroll state machine, and an async driver for hosts without a frame clock.

mod driver;
mod easing;
mod scroll;

pub use driver::{drive_scroll, ScrollViewport};
pub use easing::EasingFunction;
pub use scroll::{
    scroll_duration, AnimatorPhase, CancelHandle, ScrollAnimator, ScrollMetrics, ScrollSpeed,
    ScrollStart, ScrollState, MIN_SCROLL_DURATION_MS, OVERRIDE_DISTANCE_PX, RESUME_DISTANCE_PX,
};
