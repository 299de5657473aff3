use std::time::{Duration, Instant};

/// How long a floating heart stays alive after a like.
pub const HEART_LIFETIME: Duration = Duration::from_millis(1500);

/// Viewer-local like state for one entity (a reel or a comment).
///
/// The seed count is captured once; the displayed count is always derived
/// from it, so any even number of toggles lands back exactly on the seed
/// value and the count can never drift or go negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reaction {
    seed: u64,
    liked: bool,
}

impl Reaction {
    pub fn new(seed: u64) -> Self {
        Self { seed, liked: false }
    }

    /// Flips the liked flag. Returns the new state (`true` = now liked).
    pub fn toggle(&mut self) -> bool {
        self.liked = !self.liked;
        self.liked
    }

    pub fn liked(&self) -> bool {
        self.liked
    }

    pub fn display_count(&self) -> u64 {
        self.seed + u64::from(self.liked)
    }
}

#[derive(Debug, Clone, Copy)]
struct HeartToken {
    id: u64,
    born: Instant,
}

/// Active set of floating-heart animation tokens. Each token is spawned on a
/// false-to-true like transition and removed once its lifetime elapses;
/// rapid likes stack several concurrent tokens, each independently timed.
#[derive(Debug, Default)]
pub struct HeartBurst {
    next_id: u64,
    tokens: Vec<HeartToken>,
}

impl HeartBurst {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.tokens.push(HeartToken { id, born: now });
        id
    }

    /// Drops expired tokens. Returns `true` when anything was removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.tokens.len();
        self.tokens
            .retain(|token| now.saturating_duration_since(token.born) < HEART_LIFETIME);
        self.tokens.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Progress of each live token in [0, 1), oldest first.
    pub fn progress(&self, now: Instant) -> impl Iterator<Item = (u64, f32)> + '_ {
        self.tokens.iter().filter_map(move |token| {
            let elapsed = now.saturating_duration_since(token.born);
            if elapsed >= HEART_LIFETIME {
                return None;
            }
            Some((token.id, elapsed.as_secs_f32() / HEART_LIFETIME.as_secs_f32()))
        })
    }
}
