use std::process::{Child, Command, Stdio};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use parking_lot::RwLock;

use crate::debuglog::debug_log;
use crate::feed::ReelItem;

/// Whether the host environment allows unsolicited playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayPolicy {
    /// Activation may start playing immediately.
    Immediate,
    /// The very first activation waits for one explicit interaction; after
    /// that single interaction every activation plays immediately.
    AfterInteraction,
}

/// Shared volume level and mute flag for whichever item is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioSettings {
    pub volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 0.8,
            muted: false,
        }
    }
}

/// Explicit context for the process-wide playback singletons: the autoplay
/// interaction gate and the audio settings. Passed around rather than kept
/// as ambient global state so independent feeds (tests included) do not
/// interfere. All mutation arrives from sequential UI callbacks.
pub struct PlaybackContext {
    policy: AutoplayPolicy,
    audio: RwLock<AudioSettings>,
    interacted: RwLock<bool>,
}

impl PlaybackContext {
    pub fn new(policy: AutoplayPolicy, audio: AudioSettings) -> Self {
        Self {
            policy,
            audio: RwLock::new(audio),
            interacted: RwLock::new(false),
        }
    }

    pub fn policy(&self) -> AutoplayPolicy {
        self.policy
    }

    /// Records a user interaction. Returns `true` only for the first one.
    pub fn record_interaction(&self) -> bool {
        let mut interacted = self.interacted.write();
        if *interacted {
            false
        } else {
            *interacted = true;
            true
        }
    }

    pub fn has_interacted(&self) -> bool {
        *self.interacted.read()
    }

    pub fn autoplay_allowed(&self) -> bool {
        self.policy == AutoplayPolicy::Immediate || self.has_interacted()
    }

    pub fn audio(&self) -> AudioSettings {
        *self.audio.read()
    }

    /// Clamps to [0, 1]; dragging the level to zero also mutes.
    pub fn set_volume(&self, volume: f32) {
        let mut audio = self.audio.write();
        audio.volume = volume.clamp(0.0, 1.0);
        audio.muted = audio.volume == 0.0;
    }

    pub fn toggle_mute(&self) -> bool {
        let mut audio = self.audio.write();
        audio.muted = !audio.muted;
        audio.muted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Inactive,
    Playing,
    Paused,
}

/// Media subsystem seam. Operations may fail; callers treat both as
/// fire-and-forget and never roll logical state back on failure.
pub trait MediaBackend: Send {
    fn play(&mut self, reel: &ReelItem, audio: &AudioSettings) -> Result<()>;
    fn pause(&mut self, reel_id: &str) -> Result<()>;
}

/// Backend used when no external player is configured.
#[derive(Default)]
pub struct NullBackend;

impl MediaBackend for NullBackend {
    fn play(&mut self, _reel: &ReelItem, _audio: &AudioSettings) -> Result<()> {
        Ok(())
    }

    fn pause(&mut self, _reel_id: &str) -> Result<()> {
        Ok(())
    }
}

/// Drives an external mpv process: spawn on play, kill on pause. One child
/// at a time; videos loop until stopped.
pub struct MpvBackend {
    command: Vec<String>,
    child: Option<(String, Child)>,
}

impl MpvBackend {
    /// `command` is the configured template, e.g. `["mpv", "%URL%"]`.
    /// Returns `None` for an empty template so callers can fall back to the
    /// null backend.
    pub fn from_command(command: Vec<String>) -> Option<Self> {
        if command.first().map(|program| program.trim().is_empty()).unwrap_or(true) {
            return None;
        }
        Some(Self {
            command,
            child: None,
        })
    }

    fn kill_current(&mut self) {
        if let Some((reel_id, mut child)) = self.child.take() {
            if let Err(err) = child.kill() {
                debug_log(format!("mpv: kill player for reel {reel_id} failed: {err}"));
            }
            let _ = child.wait();
        }
    }
}

fn mpv_args(template: &[String], url: &str, audio: &AudioSettings) -> (String, Vec<String>) {
    let program = template[0].clone();
    let mut args: Vec<String> = template[1..]
        .iter()
        .map(|arg| arg.replace("%URL%", url))
        .collect();
    if !args.iter().any(|arg| arg.contains(url)) {
        args.push(url.to_string());
    }
    args.push("--loop-file=inf".to_string());
    args.push("--really-quiet".to_string());
    args.push("--keep-open=no".to_string());
    args.push(format!("--volume={}", (audio.volume * 100.0).round() as i64));
    args.push(format!(
        "--mute={}",
        if audio.muted { "yes" } else { "no" }
    ));
    (program, args)
}

impl MediaBackend for MpvBackend {
    fn play(&mut self, reel: &ReelItem, audio: &AudioSettings) -> Result<()> {
        if reel.video_url.trim().is_empty() {
            return Err(anyhow!("video URL missing for reel {}", reel.id));
        }
        self.kill_current();
        let (program, args) = mpv_args(&self.command, &reel.video_url, audio);
        let child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("launch {program} to play {}", reel.video_url))?;
        self.child = Some((reel.id.clone(), child));
        Ok(())
    }

    fn pause(&mut self, reel_id: &str) -> Result<()> {
        match self.child.take() {
            Some((id, mut child)) if id == reel_id => {
                child
                    .kill()
                    .with_context(|| format!("stop player for reel {reel_id}"))?;
                let _ = child.wait();
                Ok(())
            }
            other => {
                self.child = other;
                Ok(())
            }
        }
    }
}

impl Drop for MpvBackend {
    fn drop(&mut self) {
        self.kill_current();
    }
}

struct ActiveSlot {
    reel: ReelItem,
    state: PlaybackState,
}

/// Drives the single active-video slot: scroll activation, tap toggling and
/// the autoplay interaction gate. Backend calls are optimistic — a failed
/// play or pause is debug-logged and the tracked state stands, so logical
/// state can diverge from the actual player on failure (accepted, matching
/// the source behavior).
pub struct PlaybackController {
    ctx: Arc<PlaybackContext>,
    backend: Box<dyn MediaBackend>,
    active: Option<ActiveSlot>,
}

impl PlaybackController {
    pub fn new(ctx: Arc<PlaybackContext>, backend: Box<dyn MediaBackend>) -> Self {
        Self {
            ctx,
            backend,
            active: None,
        }
    }

    pub fn context(&self) -> &Arc<PlaybackContext> {
        &self.ctx
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_ref().map(|slot| slot.reel.id.as_str())
    }

    pub fn state_for(&self, reel_id: &str) -> PlaybackState {
        match &self.active {
            Some(slot) if slot.reel.id == reel_id => slot.state,
            _ => PlaybackState::Inactive,
        }
    }

    /// The active item sits paused behind the interaction gate and renders a
    /// tap-to-play prompt.
    pub fn awaiting_interaction(&self) -> bool {
        matches!(&self.active, Some(slot) if slot.state == PlaybackState::Paused)
            && !self.ctx.autoplay_allowed()
    }

    /// The feed snapped to `reel`: pause whatever was active (an inactive
    /// video is always paused, never muted-and-playing) and start the new
    /// item, unless the interaction gate is still closed.
    pub fn activate(&mut self, reel: &ReelItem) {
        if self
            .active
            .as_ref()
            .map(|slot| slot.reel.id == reel.id)
            .unwrap_or(false)
        {
            return;
        }
        if let Some(prev) = self.active.take() {
            if prev.state == PlaybackState::Playing {
                self.fire_pause(&prev.reel.id);
            }
        }
        let state = if self.ctx.autoplay_allowed() {
            self.fire_play(reel);
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        };
        self.active = Some(ActiveSlot {
            reel: reel.clone(),
            state,
        });
    }

    /// Unmounts the active slot entirely (feed teardown).
    pub fn deactivate(&mut self) {
        if let Some(prev) = self.active.take() {
            if prev.state == PlaybackState::Playing {
                self.fire_pause(&prev.reel.id);
            }
        }
    }

    /// A tap on the active video. Records the global interaction, then
    /// toggles play/pause; with the gate just opened this starts playback.
    pub fn tap(&mut self) -> PlaybackState {
        self.ctx.record_interaction();
        let Some(slot) = &self.active else {
            return PlaybackState::Inactive;
        };
        let reel = slot.reel.clone();
        let next = match slot.state {
            PlaybackState::Playing => {
                self.fire_pause(&reel.id);
                PlaybackState::Paused
            }
            _ => {
                self.fire_play(&reel);
                PlaybackState::Playing
            }
        };
        if let Some(slot) = &mut self.active {
            slot.state = next;
        }
        next
    }

    fn fire_play(&mut self, reel: &ReelItem) {
        let audio = self.ctx.audio();
        if let Err(err) = self.backend.play(reel, &audio) {
            debug_log(format!("playback: play reel {} failed: {err:#}", reel.id));
        }
    }

    fn fire_pause(&mut self, reel_id: &str) {
        if let Err(err) = self.backend.pause(reel_id) {
            debug_log(format!("playback: pause reel {reel_id} failed: {err:#}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn reel(id: &str) -> ReelItem {
        ReelItem {
            id: id.to_string(),
            video_url: format!("https://videos.test/{id}.mp4"),
            username: "tester".to_string(),
            description: String::new(),
            likes: 0,
            comments: 0,
            shares: 0,
            views: "0".to_string(),
            hashtags: Vec::new(),
            duration: "0:10".to_string(),
        }
    }

    struct ScriptedBackend {
        calls: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl MediaBackend for ScriptedBackend {
        fn play(&mut self, reel: &ReelItem, _audio: &AudioSettings) -> Result<()> {
            self.calls.lock().push(format!("play:{}", reel.id));
            if self.fail {
                return Err(anyhow!("backend rejected play"));
            }
            Ok(())
        }

        fn pause(&mut self, reel_id: &str) -> Result<()> {
            self.calls.lock().push(format!("pause:{reel_id}"));
            if self.fail {
                return Err(anyhow!("backend rejected pause"));
            }
            Ok(())
        }
    }

    fn controller(
        policy: AutoplayPolicy,
        fail: bool,
    ) -> (PlaybackController, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let ctx = Arc::new(PlaybackContext::new(policy, AudioSettings::default()));
        let backend = ScriptedBackend {
            calls: calls.clone(),
            fail,
        };
        (PlaybackController::new(ctx, Box::new(backend)), calls)
    }

    #[test]
    fn immediate_policy_plays_on_activation() {
        let (mut playback, calls) = controller(AutoplayPolicy::Immediate, false);
        playback.activate(&reel("1"));
        assert_eq!(playback.state_for("1"), PlaybackState::Playing);
        assert_eq!(calls.lock().as_slice(), ["play:1"]);
    }

    #[test]
    fn gated_first_activation_waits_for_one_interaction() {
        let (mut playback, calls) = controller(AutoplayPolicy::AfterInteraction, false);
        playback.activate(&reel("1"));
        assert_eq!(playback.state_for("1"), PlaybackState::Paused);
        assert!(playback.awaiting_interaction());
        assert!(calls.lock().is_empty());

        // one tap opens the gate and starts playback
        assert_eq!(playback.tap(), PlaybackState::Playing);
        assert!(!playback.awaiting_interaction());

        // a different item then activates with no second interaction
        playback.activate(&reel("2"));
        assert_eq!(playback.state_for("2"), PlaybackState::Playing);
        assert_eq!(calls.lock().as_slice(), ["play:1", "pause:1", "play:2"]);
    }

    #[test]
    fn activation_pauses_previous_item() {
        let (mut playback, calls) = controller(AutoplayPolicy::Immediate, false);
        playback.activate(&reel("1"));
        playback.activate(&reel("2"));
        assert_eq!(playback.state_for("1"), PlaybackState::Inactive);
        assert_eq!(playback.state_for("2"), PlaybackState::Playing);
        assert_eq!(calls.lock().as_slice(), ["play:1", "pause:1", "play:2"]);
    }

    #[test]
    fn reactivating_current_item_does_not_restart_it() {
        let (mut playback, calls) = controller(AutoplayPolicy::Immediate, false);
        let item = reel("1");
        playback.activate(&item);
        playback.activate(&item);
        assert_eq!(calls.lock().as_slice(), ["play:1"]);
    }

    #[test]
    fn tap_toggles_between_playing_and_paused() {
        let (mut playback, _calls) = controller(AutoplayPolicy::Immediate, false);
        playback.activate(&reel("1"));
        assert_eq!(playback.tap(), PlaybackState::Paused);
        assert_eq!(playback.tap(), PlaybackState::Playing);
    }

    #[test]
    fn backend_failure_keeps_optimistic_state() {
        let (mut playback, _calls) = controller(AutoplayPolicy::Immediate, true);
        playback.activate(&reel("1"));
        assert_eq!(playback.state_for("1"), PlaybackState::Playing);
        assert_eq!(playback.tap(), PlaybackState::Paused);
        assert_eq!(playback.state_for("1"), PlaybackState::Paused);
    }

    #[test]
    fn volume_zero_implies_muted() {
        let ctx = PlaybackContext::new(AutoplayPolicy::Immediate, AudioSettings::default());
        ctx.set_volume(0.0);
        assert!(ctx.audio().muted);
        ctx.set_volume(0.4);
        assert!(!ctx.audio().muted);
        ctx.set_volume(7.0);
        assert_eq!(ctx.audio().volume, 1.0);
    }

    #[test]
    fn mute_toggle_is_independent_of_volume() {
        let ctx = PlaybackContext::new(AutoplayPolicy::Immediate, AudioSettings::default());
        assert!(ctx.toggle_mute());
        assert_eq!(ctx.audio().volume, 0.8);
        assert!(!ctx.toggle_mute());
    }

    #[test]
    fn mpv_args_substitute_url_and_audio() {
        let template = vec!["mpv".to_string(), "%URL%".to_string()];
        let audio = AudioSettings {
            volume: 0.5,
            muted: true,
        };
        let (program, args) = mpv_args(&template, "https://videos.test/1.mp4", &audio);
        assert_eq!(program, "mpv");
        assert_eq!(args[0], "https://videos.test/1.mp4");
        assert!(args.contains(&"--loop-file=inf".to_string()));
        assert!(args.contains(&"--volume=50".to_string()));
        assert!(args.contains(&"--mute=yes".to_string()));
    }

    #[test]
    fn empty_player_command_yields_no_backend() {
        assert!(MpvBackend::from_command(Vec::new()).is_none());
        assert!(MpvBackend::from_command(vec![" ".to_string()]).is_none());
        assert!(MpvBackend::from_command(vec!["mpv".to_string()]).is_some());
    }
}
