//! Scroll Animator
//!
//! Frame-driven auto-scroll of the conversation view. Each conversation
//! change (and each speed-profile change) starts a new run that eases the view
//! from its current offset to the bottom. A manual scroll upward, far enough
//! from the bottom, suspends animation until the view returns near the bottom.
//!
//! State machine:
//!
//! ```text
//!            conversation / profile change
//!   Idle ───────────────────────────────────▶ Animating
//!    ▲                                            │
//!    └── progress >= 1 | override | cancel ───────┘
//! ```
//!
//! Every run owns a [`CancelHandle`]. Starting a new run, switching profile,
//! calling [`ScrollAnimator::cancel`], or dropping the animator cancels the
//! previous run.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::easing::EasingFunction;
use crate::style::StyleParseError;

/// Shortest total duration of an animated run, in milliseconds
pub const MIN_SCROLL_DURATION_MS: f64 = 8000.0;

/// Scrolling up further than this from the bottom suspends animation
pub const OVERRIDE_DISTANCE_PX: f64 = 100.0;

/// Returning within this distance of the bottom resumes animation
pub const RESUME_DISTANCE_PX: f64 = 50.0;

/// Auto-scroll speed profile
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollSpeed {
    /// 24ms per character
    Slow,
    /// 12ms per character
    #[default]
    Normal,
    /// 8ms per character
    Fast,
    /// Jump straight to the bottom
    Instant,
    /// No auto-scroll at all
    None,
}

impl ScrollSpeed {
    /// All profiles, in menu order
    pub const ALL: [ScrollSpeed; 5] = [
        Self::Slow,
        Self::Normal,
        Self::Fast,
        Self::Instant,
        Self::None,
    ];

    /// Milliseconds of total duration per response character
    ///
    /// `None` for the profile that disables auto-scroll.
    #[must_use]
    pub fn per_char_ms(self) -> Option<f64> {
        match self {
            Self::Slow => Some(24.0),
            Self::Normal => Some(12.0),
            Self::Fast => Some(8.0),
            Self::Instant => Some(0.0),
            Self::None => None,
        }
    }

    /// Config/menu name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Normal => "normal",
            Self::Fast => "fast",
            Self::Instant => "instant",
            Self::None => "none",
        }
    }
}

impl fmt::Display for ScrollSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScrollSpeed {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|speed| speed.as_str() == wanted)
            .ok_or_else(|| StyleParseError {
                kind: "scroll speed",
                value: s.to_string(),
            })
    }
}

/// Total duration of a run for a response of `response_len` characters
///
/// `None` when auto-scroll is disabled, zero for an immediate jump, otherwise
/// `max(8000ms, response_len * per_char_ms)`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn scroll_duration(speed: ScrollSpeed, response_len: usize) -> Option<Duration> {
    let per_char = speed.per_char_ms()?;
    if per_char <= 0.0 {
        return Some(Duration::ZERO);
    }
    let ms = (response_len as f64 * per_char).max(MIN_SCROLL_DURATION_MS);
    Some(Duration::from_secs_f64(ms / 1000.0))
}

/// Geometry of the scrollable conversation view, in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    /// Current scroll offset from the top
    pub offset: f64,
    /// Total content height
    pub scroll_height: f64,
    /// Visible height
    pub client_height: f64,
}

impl ScrollMetrics {
    /// Create metrics
    #[must_use]
    pub fn new(offset: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            offset,
            scroll_height,
            client_height,
        }
    }

    /// Offset at which the view shows the bottom of the content
    #[must_use]
    pub fn bottom(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Distance between the current offset and the bottom
    #[must_use]
    pub fn distance_from_bottom(&self) -> f64 {
        (self.bottom() - self.offset).max(0.0)
    }
}

/// Observable scroll state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollState {
    /// Active speed profile
    pub speed: ScrollSpeed,
    /// Whether a manual scroll suspended auto-scroll
    pub user_scrolled_up: bool,
    /// Last offset observed or written
    pub last_offset: f64,
}

/// Animator phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimatorPhase {
    /// No run in progress
    Idle,
    /// A run is easing the view toward the bottom
    Animating,
}

/// Cancellation handle for one animation run
#[derive(Clone, Debug, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// Create an uncancelled handle
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the run
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether the run was cancelled
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What a state change did to the view
#[derive(Clone, Debug)]
pub enum ScrollStart {
    /// Auto-scroll is disabled by the profile
    Disabled,
    /// Jump to this offset now
    Jumped(f64),
    /// The user has scrolled up; the view stays where it is
    Suppressed,
    /// A run started; frames must be pumped
    Animating(CancelHandle),
}

#[derive(Debug)]
struct ScrollRun {
    from: f64,
    to: f64,
    duration: Duration,
    started_at: Option<Duration>,
    cancel: CancelHandle,
}

/// Frame-driven auto-scroll state machine
#[derive(Debug)]
pub struct ScrollAnimator {
    state: ScrollState,
    easing: EasingFunction,
    run: Option<ScrollRun>,
}

impl ScrollAnimator {
    /// Create an idle animator
    #[must_use]
    pub fn new(speed: ScrollSpeed) -> Self {
        Self {
            state: ScrollState {
                speed,
                user_scrolled_up: false,
                last_offset: 0.0,
            },
            easing: EasingFunction::EaseOutQuart,
            run: None,
        }
    }

    /// Override the easing curve
    #[must_use]
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> ScrollState {
        self.state
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> AnimatorPhase {
        match self.run {
            Some(ref run) if !run.cancel.is_cancelled() => AnimatorPhase::Animating,
            _ => AnimatorPhase::Idle,
        }
    }

    /// React to a conversation change whose latest message has
    /// `response_len` characters
    pub fn on_conversation_changed(
        &mut self,
        response_len: usize,
        metrics: ScrollMetrics,
    ) -> ScrollStart {
        self.cancel();

        let Some(duration) = scroll_duration(self.state.speed, response_len) else {
            return ScrollStart::Disabled;
        };

        if duration.is_zero() {
            let bottom = metrics.bottom();
            self.state.last_offset = bottom;
            self.state.user_scrolled_up = false;
            return ScrollStart::Jumped(bottom);
        }

        if self.state.user_scrolled_up {
            tracing::debug!(response_len, "Auto-scroll suppressed by manual scroll");
            return ScrollStart::Suppressed;
        }

        let cancel = CancelHandle::new();
        self.run = Some(ScrollRun {
            from: metrics.offset,
            to: metrics.bottom(),
            duration,
            started_at: None,
            cancel: cancel.clone(),
        });
        self.state.last_offset = metrics.offset;

        tracing::debug!(
            speed = %self.state.speed,
            response_len,
            duration_ms = duration.as_secs_f64() * 1000.0,
            "Scroll animation started"
        );

        ScrollStart::Animating(cancel)
    }

    /// Switch profile, stopping any run of the old profile
    pub fn set_speed(
        &mut self,
        speed: ScrollSpeed,
        response_len: usize,
        metrics: ScrollMetrics,
    ) -> ScrollStart {
        self.cancel();
        self.state.speed = speed;
        self.on_conversation_changed(response_len, metrics)
    }

    /// Record a manual scroll event
    pub fn on_user_scroll(&mut self, metrics: ScrollMetrics) {
        let from_bottom = metrics.distance_from_bottom();

        if metrics.offset < self.state.last_offset && from_bottom > OVERRIDE_DISTANCE_PX {
            self.state.user_scrolled_up = true;
        }
        if from_bottom <= RESUME_DISTANCE_PX {
            self.state.user_scrolled_up = false;
        }

        self.state.last_offset = metrics.offset;
    }

    /// Advance the run to frame `timestamp` and return the offset to apply
    ///
    /// The first frame of a run defines its start time. Returns `None` when
    /// idle, cancelled, or suspended by a manual scroll; the run ends then.
    pub fn frame(&mut self, timestamp: Duration) -> Option<f64> {
        let run = self.run.as_mut()?;

        if run.cancel.is_cancelled() || self.state.user_scrolled_up {
            self.run = None;
            return None;
        }

        let started = *run.started_at.get_or_insert(timestamp);
        let progress =
            timestamp.saturating_sub(started).as_secs_f64() / run.duration.as_secs_f64();

        if progress >= 1.0 {
            let to = run.to;
            self.run = None;
            self.state.last_offset = to;
            return Some(to);
        }

        let offset = run.from + (run.to - run.from) * self.easing.apply(progress);
        self.state.last_offset = offset;
        Some(offset)
    }

    /// Cancel the current run, if any
    pub fn cancel(&mut self) {
        if let Some(run) = self.run.take() {
            run.cancel.cancel();
        }
    }
}

impl Default for ScrollAnimator {
    fn default() -> Self {
        Self::new(ScrollSpeed::default())
    }
}

impl Drop for ScrollAnimator {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn view(offset: f64) -> ScrollMetrics {
        ScrollMetrics::new(offset, 1500.0, 500.0)
    }

    #[test]
    fn test_duration_table() {
        assert_eq!(scroll_duration(ScrollSpeed::None, 100), None);
        assert_eq!(scroll_duration(ScrollSpeed::Instant, 5000), Some(Duration::ZERO));
        assert_eq!(scroll_duration(ScrollSpeed::Fast, 10), Some(ms(8000)));
        assert_eq!(scroll_duration(ScrollSpeed::Normal, 1000), Some(ms(12_000)));
        assert_eq!(scroll_duration(ScrollSpeed::Slow, 1000), Some(ms(24_000)));
    }

    #[test]
    fn test_duration_monotonic_and_floored() {
        for speed in [ScrollSpeed::Slow, ScrollSpeed::Normal, ScrollSpeed::Fast] {
            let mut previous = Duration::ZERO;
            for len in (0..5000).step_by(37) {
                let d = scroll_duration(speed, len).unwrap();
                assert!(d >= previous);
                assert!(d >= ms(8000));
                previous = d;
            }
        }
    }

    #[test]
    fn test_speed_parse() {
        assert_eq!("FAST".parse::<ScrollSpeed>(), Ok(ScrollSpeed::Fast));
        assert!("warp".parse::<ScrollSpeed>().is_err());
    }

    #[test]
    fn test_instant_jumps_and_clears_override() {
        let mut animator = ScrollAnimator::new(ScrollSpeed::Instant);
        animator.on_user_scroll(view(0.0));
        animator.state.user_scrolled_up = true;

        let start = animator.on_conversation_changed(42, view(100.0));

        assert!(matches!(start, ScrollStart::Jumped(offset) if (offset - 1000.0).abs() < 1e-9));
        assert!(!animator.state().user_scrolled_up);
        assert_eq!(animator.phase(), AnimatorPhase::Idle);
    }

    #[test]
    fn test_none_profile_disables() {
        let mut animator = ScrollAnimator::new(ScrollSpeed::None);
        let start = animator.on_conversation_changed(42, view(0.0));
        assert!(matches!(start, ScrollStart::Disabled));
        assert_eq!(animator.frame(ms(0)), None);
    }

    #[test]
    fn test_run_eases_to_bottom() {
        let mut animator = ScrollAnimator::new(ScrollSpeed::Fast);
        animator.on_conversation_changed(10, view(0.0));
        assert_eq!(animator.phase(), AnimatorPhase::Animating);

        assert_eq!(animator.frame(ms(1000)), Some(0.0));
        let halfway = animator.frame(ms(5000)).unwrap();
        assert!((halfway - 937.5).abs() < 1e-6);
        assert_eq!(animator.frame(ms(9000)), Some(1000.0));
        assert_eq!(animator.phase(), AnimatorPhase::Idle);
        assert_eq!(animator.frame(ms(9016)), None);
    }

    #[test]
    fn test_user_override_stops_run() {
        let mut animator = ScrollAnimator::new(ScrollSpeed::Normal);
        animator.on_conversation_changed(10, view(400.0));
        animator.frame(ms(0));
        animator.frame(ms(100));

        animator.on_user_scroll(view(200.0));
        assert!(animator.state().user_scrolled_up);
        assert_eq!(animator.frame(ms(200)), None);
        assert_eq!(animator.phase(), AnimatorPhase::Idle);
    }

    #[test]
    fn test_small_upward_scroll_near_bottom_is_not_override() {
        let mut animator = ScrollAnimator::new(ScrollSpeed::Normal);
        animator.on_user_scroll(view(980.0));
        animator.on_user_scroll(view(920.0));
        assert!(!animator.state().user_scrolled_up);
    }

    #[test]
    fn test_returning_to_bottom_clears_override() {
        let mut animator = ScrollAnimator::new(ScrollSpeed::Normal);
        animator.on_user_scroll(view(900.0));
        animator.on_user_scroll(view(300.0));
        assert!(animator.state().user_scrolled_up);

        animator.on_user_scroll(view(960.0));
        assert!(!animator.state().user_scrolled_up);
    }

    #[test]
    fn test_override_survives_new_message() {
        let mut animator = ScrollAnimator::new(ScrollSpeed::Normal);
        animator.on_user_scroll(view(900.0));
        animator.on_user_scroll(view(100.0));

        let start = animator.on_conversation_changed(10, view(100.0));
        assert!(matches!(start, ScrollStart::Suppressed));
        assert_eq!(animator.phase(), AnimatorPhase::Idle);
        assert_eq!(animator.frame(ms(0)), None);

        animator.on_user_scroll(view(990.0));
        let start = animator.on_conversation_changed(10, view(990.0));
        assert!(matches!(start, ScrollStart::Animating(_)));
        assert_eq!(animator.phase(), AnimatorPhase::Animating);
    }

    #[test]
    fn test_new_run_cancels_previous_handle() {
        let mut animator = ScrollAnimator::new(ScrollSpeed::Slow);
        let ScrollStart::Animating(first) = animator.on_conversation_changed(10, view(0.0)) else {
            panic!("expected a run");
        };
        let ScrollStart::Animating(second) = animator.set_speed(ScrollSpeed::Fast, 10, view(0.0))
        else {
            panic!("expected a run");
        };

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_eq!(animator.state().speed, ScrollSpeed::Fast);
    }

    #[test]
    fn test_external_cancel_and_drop() {
        let mut animator = ScrollAnimator::new(ScrollSpeed::Normal);
        let ScrollStart::Animating(handle) = animator.on_conversation_changed(10, view(0.0)) else {
            panic!("expected a run");
        };
        handle.cancel();
        assert_eq!(animator.phase(), AnimatorPhase::Idle);
        assert_eq!(animator.frame(ms(0)), None);

        let ScrollStart::Animating(handle) = animator.on_conversation_changed(10, view(0.0)) else {
            panic!("expected a run");
        };
        drop(animator);
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_switching_to_none_stops_old_run() {
        let mut animator = ScrollAnimator::new(ScrollSpeed::Slow);
        let ScrollStart::Animating(handle) = animator.on_conversation_changed(10, view(0.0)) else {
            panic!("expected a run");
        };
        let start = animator.set_speed(ScrollSpeed::None, 10, view(0.0));
        assert!(matches!(start, ScrollStart::Disabled));
        assert!(handle.is_cancelled());
        assert_eq!(animator.phase(), AnimatorPhase::Idle);
    }
}
