use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::comments::CommentStore;
use crate::config;
use crate::feed::{self, FeedService, StaticFeedService};
use crate::panel::PanelTuning;
use crate::playback::{
    AudioSettings, MediaBackend, MpvBackend, NullBackend, PlaybackContext, PlaybackController,
};
use crate::ui;

const VIEWER_NAME: &str = "you";

pub fn run() -> Result<()> {
    let cfg = config::load(config::LoadOptions::default()).context("load config")?;
    let config_path = config::default_path();
    let display_path = friendly_path(config_path.as_deref());

    let feed_service = StaticFeedService::default();
    let reels = feed_service.load_reels().context("load feed")?;

    let mut comment_store = CommentStore::new(VIEWER_NAME);
    for (reel_id, thread) in feed::seed_comment_threads() {
        comment_store.seed_thread(&reel_id, thread);
    }

    let audio = AudioSettings {
        volume: cfg.player.volume.clamp(0.0, 1.0),
        muted: cfg.player.muted,
    };
    let ctx = Arc::new(PlaybackContext::new(cfg.player.autoplay.into(), audio));
    let backend: Box<dyn MediaBackend> =
        match MpvBackend::from_command(cfg.player.video_command.clone()) {
            Some(mpv) => Box::new(mpv),
            None => Box::new(NullBackend),
        };
    let playback = PlaybackController::new(ctx, backend);

    let panel_tuning = PanelTuning {
        open_duration: cfg.panel.open_duration,
        close_duration: cfg.panel.close_duration,
        close_threshold_px: cfg.panel.close_threshold_px,
        drag_min_px: cfg.panel.drag_min_px,
        dim_opacity: cfg.panel.dim_opacity,
    };

    let status = format!("Ready. Config: {display_path}");

    let mut model = ui::Model::new(ui::Options {
        status_message: status,
        reels,
        comment_store,
        playback,
        panel_tuning,
        fade_duration: cfg.feed.fade_duration,
    });
    model.run()
}

fn friendly_path(path: Option<&Path>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "(no config dir)".to_string(),
    }
}
