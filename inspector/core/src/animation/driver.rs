//! Frame driver
//!
//! Pumps a [`ScrollAnimator`] on a tokio interval against a host viewport.
//! Hosts with their own frame clock call [`ScrollAnimator::frame`] directly.

use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};

use super::scroll::{AnimatorPhase, ScrollAnimator, ScrollMetrics};

/// Movement below this many pixels is treated as our own write
const OFFSET_TOLERANCE_PX: f64 = 0.5;

/// A scrollable view the animator can read and move
pub trait ScrollViewport {
    /// Current geometry
    fn metrics(&self) -> ScrollMetrics;

    /// Move the view to `offset`
    fn scroll_to(&mut self, offset: f64);
}

/// Drive the current run to completion, one frame per `frame_interval`
///
/// An offset that differs from the one last written is reported to the
/// animator as a manual scroll. Returns when the run finishes, is cancelled,
/// or is suspended by the user.
pub async fn drive_scroll<V>(
    animator: &mut ScrollAnimator,
    viewport: &mut V,
    frame_interval: Duration,
) where
    V: ScrollViewport + ?Sized,
{
    let mut ticker = time::interval(frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let origin = Instant::now();
    let mut written = viewport.metrics().offset;
    let mut frames = 0u64;

    while animator.phase() == AnimatorPhase::Animating {
        ticker.tick().await;

        let metrics = viewport.metrics();
        if (metrics.offset - written).abs() > OFFSET_TOLERANCE_PX {
            animator.on_user_scroll(metrics);
        }

        let Some(offset) = animator.frame(origin.elapsed()) else {
            break;
        };
        viewport.scroll_to(offset);
        written = offset;
        frames += 1;
    }

    tracing::debug!(
        frames,
        user_scrolled_up = animator.state().user_scrolled_up,
        "Scroll run ended"
    );
}
