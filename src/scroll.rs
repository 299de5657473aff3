use std::time::{Duration, Instant};

use crate::anim::{Animated, Easing};

/// Tracks which feed item the viewport has snapped to and drives the
/// overlay fade that restarts whenever the active index changes.
///
/// Offsets and the viewport height share one unit; the index is the settled
/// offset divided by a full viewport, rounded to nearest. Settling again on
/// the current index produces no new fade.
pub struct FeedScrollController {
    current: usize,
    len: usize,
    viewport_height: f32,
    fade: Animated,
    fade_duration: Duration,
}

impl FeedScrollController {
    pub fn new(len: usize, viewport_height: f32, fade_duration: Duration, now: Instant) -> Self {
        let mut fade = Animated::new(0.0);
        fade.animate_to(1.0, fade_duration, Easing::Linear, now);
        Self {
            current: 0,
            len,
            viewport_height,
            fade,
            fade_duration,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn set_viewport_height(&mut self, viewport_height: f32) {
        if viewport_height > 0.0 {
            self.viewport_height = viewport_height;
        }
    }

    /// The settled offset a given index corresponds to; the inverse of the
    /// index computation, handy for synthesizing flick events.
    pub fn settle_offset_for(&self, index: usize) -> f32 {
        index as f32 * self.viewport_height
    }

    /// Handles a discrete snap-complete event. Returns the new index when it
    /// changed, `None` when the viewport settled where it already was.
    pub fn on_scroll_settle(&mut self, offset: f32, now: Instant) -> Option<usize> {
        if self.len == 0 || self.viewport_height <= 0.0 {
            return None;
        }
        let raw = (offset / self.viewport_height).round();
        let index = (raw.max(0.0) as usize).min(self.len - 1);
        if index == self.current {
            return None;
        }
        self.current = index;
        self.fade.set(0.0);
        self.fade
            .animate_to(1.0, self.fade_duration, Easing::Linear, now);
        Some(index)
    }

    /// Current overlay opacity for the active item, in [0, 1].
    pub fn overlay_opacity(&self, now: Instant) -> f32 {
        self.fade.value_at(now)
    }

    pub fn fade_settled(&self, now: Instant) -> bool {
        self.fade.is_settled_at(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> (FeedScrollController, Instant) {
        let now = Instant::now();
        (
            FeedScrollController::new(5, 800.0, Duration::from_millis(300), now),
            now,
        )
    }

    #[test]
    fn settle_at_two_viewports_selects_index_two() {
        let (mut scroll, now) = controller();
        assert_eq!(scroll.on_scroll_settle(1600.0, now), Some(2));
        assert_eq!(scroll.current_index(), 2);
    }

    #[test]
    fn settling_on_same_index_triggers_no_new_fade() {
        let (mut scroll, now) = controller();
        scroll.on_scroll_settle(1600.0, now);
        let generation_before = {
            // fade has fully run by +1s
            let later = now + Duration::from_secs(1);
            assert_eq!(scroll.overlay_opacity(later), 1.0);
            later
        };
        assert_eq!(scroll.on_scroll_settle(1600.0, generation_before), None);
        assert_eq!(scroll.overlay_opacity(generation_before), 1.0);
    }

    #[test]
    fn index_change_restarts_fade_from_zero() {
        let (mut scroll, now) = controller();
        let later = now + Duration::from_secs(1);
        assert_eq!(scroll.overlay_opacity(later), 1.0);
        scroll.on_scroll_settle(800.0, later);
        assert!(scroll.overlay_opacity(later) < 0.05);
        assert_eq!(scroll.overlay_opacity(later + Duration::from_secs(1)), 1.0);
    }

    #[test]
    fn settle_offset_rounds_to_nearest() {
        let (mut scroll, now) = controller();
        assert_eq!(scroll.on_scroll_settle(1150.0, now), Some(1));
        assert_eq!(scroll.on_scroll_settle(1250.0, now), Some(2));
    }

    #[test]
    fn settle_clamps_to_feed_bounds() {
        let (mut scroll, now) = controller();
        assert_eq!(scroll.on_scroll_settle(99_999.0, now), Some(4));
        assert_eq!(scroll.on_scroll_settle(-500.0, now), Some(0));
    }
}
