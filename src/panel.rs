use std::time::{Duration, Instant};

use crate::anim::{Animated, Easing};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Comments,
    Share,
}

impl PanelKind {
    pub fn title(self) -> &'static str {
        match self {
            PanelKind::Comments => "Comments",
            PanelKind::Share => "Share",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Opening,
    Open,
    Closing,
}

/// What a drag release resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Displacement beat the close threshold; the panel is closing and its
    /// target has been cleared.
    Dismissed,
    /// Sprung back to the fully-open position.
    SprungBack,
    /// There was no recognized drag to release.
    Ignored,
}

/// Thresholds and animation timings, in pixel units shared with the caller.
#[derive(Debug, Clone, Copy)]
pub struct PanelTuning {
    pub open_duration: Duration,
    pub close_duration: Duration,
    /// Downward displacement past which a release dismisses the panel.
    pub close_threshold_px: f32,
    /// Minimum vertical displacement before a drag is recognized at all.
    pub drag_min_px: f32,
    /// Background dim level when fully open.
    pub dim_opacity: f32,
}

impl Default for PanelTuning {
    fn default() -> Self {
        Self {
            open_duration: Duration::from_millis(300),
            close_duration: Duration::from_millis(250),
            close_threshold_px: 100.0,
            drag_min_px: 10.0,
            dim_opacity: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    dx: f32,
    dy: f32,
    recognized: bool,
}

/// Bottom-anchored slide-up overlay driven by open/close animations and a
/// vertical drag-to-dismiss gesture.
///
/// `offset` is the distance from the fully-open position: 0 when open,
/// `height` when parked off screen. Slide and dim animate concurrently.
/// Only the UI model decides that at most one panel is open at a time; the
/// panel itself does not enforce mutual exclusion.
pub struct Panel {
    kind: PanelKind,
    tuning: PanelTuning,
    phase: Phase,
    target: Option<String>,
    height: f32,
    offset: Animated,
    dim: Animated,
    drag: Option<Drag>,
}

impl Panel {
    pub fn new(kind: PanelKind, tuning: PanelTuning) -> Self {
        Self {
            kind,
            tuning,
            phase: Phase::Closed,
            target: None,
            height: 0.0,
            offset: Animated::new(0.0),
            dim: Animated::new(0.0),
            drag: None,
        }
    }

    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn is_visible(&self) -> bool {
        self.phase != Phase::Closed
    }

    pub fn dragging(&self) -> bool {
        matches!(self.drag, Some(drag) if drag.recognized)
    }

    /// Slide in for `reel_id` with the given on-screen height.
    pub fn open(&mut self, reel_id: &str, height: f32, now: Instant) {
        self.target = Some(reel_id.to_string());
        self.height = height.max(1.0);
        self.phase = Phase::Opening;
        self.drag = None;
        self.offset.set(self.height);
        self.offset
            .animate_to(0.0, self.tuning.open_duration, Easing::Linear, now);
        self.dim.set(0.0);
        self.dim.animate_to(
            self.tuning.dim_opacity,
            self.tuning.open_duration,
            Easing::Linear,
            now,
        );
    }

    /// Starts the close animation and clears the target immediately; the
    /// cleared id is returned so the caller can run its close callback
    /// without waiting for the visual settle.
    pub fn begin_close(&mut self, now: Instant) -> Option<String> {
        if !self.is_visible() {
            return None;
        }
        self.phase = Phase::Closing;
        self.drag = None;
        self.offset
            .animate_to(self.height, self.tuning.close_duration, Easing::Linear, now);
        self.dim
            .animate_to(0.0, self.tuning.close_duration, Easing::Linear, now);
        self.target.take()
    }

    /// Advances phase transitions that ride on animation completion.
    pub fn tick(&mut self, now: Instant) {
        match self.phase {
            Phase::Opening if self.offset.is_settled_at(now) => self.phase = Phase::Open,
            Phase::Closing if self.offset.is_settled_at(now) => {
                self.phase = Phase::Closed;
                self.height = 0.0;
            }
            _ => {}
        }
    }

    /// Feeds cumulative gesture displacement since the touch went down. The
    /// drag is recognized once predominantly vertical and downward; while
    /// recognized, the offset tracks the finger 1:1 downward and clamps at
    /// the open position for upward motion.
    pub fn on_drag_move(&mut self, dx: f32, dy: f32) {
        if self.phase != Phase::Open {
            return;
        }
        let drag = self.drag.get_or_insert(Drag {
            dx: 0.0,
            dy: 0.0,
            recognized: false,
        });
        drag.dx = dx;
        drag.dy = dy;
        if !drag.recognized && dy > self.tuning.drag_min_px && dy > dx.abs() {
            drag.recognized = true;
        }
        if drag.recognized {
            self.offset.set(dy.max(0.0));
        }
    }

    pub fn on_drag_release(&mut self, now: Instant) -> (DragOutcome, Option<String>) {
        let Some(drag) = self.drag.take() else {
            return (DragOutcome::Ignored, None);
        };
        if !drag.recognized || self.phase != Phase::Open {
            return (DragOutcome::Ignored, None);
        }
        if drag.dy > self.tuning.close_threshold_px {
            let target = self.begin_close(now);
            (DragOutcome::Dismissed, target)
        } else {
            self.offset
                .animate_to(0.0, self.tuning.close_duration, Easing::EaseOut, now);
            (DragOutcome::SprungBack, None)
        }
    }

    /// Distance from the fully-open position, in px.
    pub fn offset_px(&self, now: Instant) -> f32 {
        self.offset.value_at(now)
    }

    /// Background dim level, in [0, dim_opacity].
    pub fn dim(&self, now: Instant) -> f32 {
        self.dim.value_at(now)
    }

    pub fn animating(&self, now: Instant) -> bool {
        !self.offset.is_settled_at(now) || !self.dim.is_settled_at(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_panel() -> (Panel, Instant) {
        let now = Instant::now();
        let mut panel = Panel::new(PanelKind::Comments, PanelTuning::default());
        panel.open("1", 560.0, now);
        let settled = now + Duration::from_secs(1);
        panel.tick(settled);
        assert_eq!(panel.phase(), Phase::Open);
        (panel, settled)
    }

    #[test]
    fn open_slides_and_dims_concurrently() {
        let now = Instant::now();
        let mut panel = Panel::new(PanelKind::Share, PanelTuning::default());
        panel.open("2", 320.0, now);
        assert_eq!(panel.phase(), Phase::Opening);
        assert_eq!(panel.target(), Some("2"));
        let mid = now + Duration::from_millis(150);
        let offset = panel.offset_px(mid);
        assert!(offset > 0.0 && offset < 320.0);
        let dim = panel.dim(mid);
        assert!(dim > 0.0 && dim < 0.5);
        panel.tick(now + Duration::from_secs(1));
        assert_eq!(panel.phase(), Phase::Open);
    }

    #[test]
    fn drag_past_threshold_dismisses_and_clears_target() {
        let (mut panel, now) = open_panel();
        panel.on_drag_move(4.0, 150.0);
        let (outcome, target) = panel.on_drag_release(now);
        assert_eq!(outcome, DragOutcome::Dismissed);
        assert_eq!(target.as_deref(), Some("1"));
        assert_eq!(panel.phase(), Phase::Closing);
        assert_eq!(panel.target(), None);
        panel.tick(now + Duration::from_secs(1));
        assert_eq!(panel.phase(), Phase::Closed);
    }

    #[test]
    fn short_drag_springs_back_open() {
        let (mut panel, now) = open_panel();
        panel.on_drag_move(2.0, 60.0);
        let (outcome, target) = panel.on_drag_release(now);
        assert_eq!(outcome, DragOutcome::SprungBack);
        assert!(target.is_none());
        assert_eq!(panel.phase(), Phase::Open);
        assert_eq!(panel.target(), Some("1"));
        assert_eq!(panel.offset_px(now + Duration::from_secs(1)), 0.0);
    }

    #[test]
    fn horizontal_gesture_is_not_recognized() {
        let (mut panel, now) = open_panel();
        panel.on_drag_move(80.0, 40.0);
        assert!(!panel.dragging());
        let (outcome, _) = panel.on_drag_release(now);
        assert_eq!(outcome, DragOutcome::Ignored);
        assert_eq!(panel.phase(), Phase::Open);
    }

    #[test]
    fn upward_motion_clamps_at_open_position() {
        let (mut panel, now) = open_panel();
        panel.on_drag_move(0.0, 30.0);
        assert!(panel.dragging());
        panel.on_drag_move(0.0, -50.0);
        assert_eq!(panel.offset_px(now), 0.0);
    }

    #[test]
    fn close_clears_target_before_animation_finishes() {
        let (mut panel, now) = open_panel();
        let target = panel.begin_close(now);
        assert_eq!(target.as_deref(), Some("1"));
        assert_eq!(panel.phase(), Phase::Closing);
        assert_eq!(panel.target(), None);
        assert!(panel.offset_px(now + Duration::from_millis(100)) > 0.0);
    }
}
