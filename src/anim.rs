use std::time::{Duration, Instant};

/// Interpolation curve for an [`Animated`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// Cubic ease-out, used for spring-back style settles.
    EaseOut,
}

impl Easing {
    fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
        }
    }
}

/// A scalar that interpolates toward a target over a fixed duration.
///
/// Retriggering while a run is still in flight supersedes it: the generation
/// counter bumps and the latest target wins. Callers that schedule work for
/// "animation finished" compare the generation they captured against the
/// current one to drop stale completions.
#[derive(Debug, Clone)]
pub struct Animated {
    from: f32,
    to: f32,
    started: Instant,
    duration: Duration,
    easing: Easing,
    generation: u64,
}

impl Animated {
    pub fn new(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            started: Instant::now(),
            duration: Duration::ZERO,
            easing: Easing::Linear,
            generation: 0,
        }
    }

    /// Jump straight to `value` without animating.
    pub fn set(&mut self, value: f32) {
        self.from = value;
        self.to = value;
        self.duration = Duration::ZERO;
        self.generation += 1;
    }

    /// Start interpolating from the current sampled value toward `to`.
    /// Returns the new generation.
    pub fn animate_to(&mut self, to: f32, duration: Duration, easing: Easing, now: Instant) -> u64 {
        self.from = self.value_at(now);
        self.to = to;
        self.started = now;
        self.duration = duration;
        self.easing = easing;
        self.generation += 1;
        self.generation
    }

    pub fn value_at(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.started);
        if elapsed >= self.duration {
            return self.to;
        }
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_settled_at(&self, now: Instant) -> bool {
        self.duration.is_zero() || now.saturating_duration_since(self.started) >= self.duration
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_between_endpoints() {
        let now = Instant::now();
        let mut anim = Animated::new(0.0);
        anim.animate_to(1.0, Duration::from_millis(100), Easing::Linear, now);
        let mid = anim.value_at(now + Duration::from_millis(50));
        assert!(mid > 0.4 && mid < 0.6, "midpoint was {mid}");
        assert_eq!(anim.value_at(now + Duration::from_millis(200)), 1.0);
    }

    #[test]
    fn retrigger_supersedes_previous_target() {
        let now = Instant::now();
        let mut anim = Animated::new(0.0);
        let first = anim.animate_to(1.0, Duration::from_millis(300), Easing::Linear, now);
        let second = anim.animate_to(
            0.25,
            Duration::from_millis(100),
            Easing::Linear,
            now + Duration::from_millis(150),
        );
        assert!(second > first);
        assert_eq!(anim.target(), 0.25);
        assert_eq!(anim.value_at(now + Duration::from_secs(1)), 0.25);
    }

    #[test]
    fn set_jumps_without_animation() {
        let mut anim = Animated::new(0.0);
        anim.set(0.7);
        assert_eq!(anim.value_at(Instant::now()), 0.7);
        assert!(anim.is_settled_at(Instant::now()));
    }

    #[test]
    fn ease_out_front_loads_motion() {
        let now = Instant::now();
        let mut anim = Animated::new(0.0);
        anim.animate_to(1.0, Duration::from_millis(100), Easing::EaseOut, now);
        let mid = anim.value_at(now + Duration::from_millis(50));
        assert!(mid > 0.8, "ease-out midpoint was {mid}");
    }
}
