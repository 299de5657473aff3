use std::collections::{HashMap, HashSet};
use std::io::{self, Stdout};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::anim::{Animated, Easing};
use crate::comments::{CommentId, CommentStore, MAX_COMMENT_LEN};
use crate::feed::ReelItem;
use crate::panel::{DragOutcome, Panel, PanelKind, PanelTuning};
use crate::playback::{PlaybackController, PlaybackState};
use crate::reaction::{HeartBurst, Reaction};
use crate::scroll::FeedScrollController;
use crate::share::{self, ShareError, ShareOutcome, ShareTarget};

/// Pixel unit assigned to one terminal row so gesture thresholds expressed
/// in px (drag recognition, dismiss distance, panel heights) map onto cells.
const CELL_PX: f32 = 20.0;
const TICK_RATE: Duration = Duration::from_millis(80);
const COMMENTS_PANEL_RATIO: f32 = 0.7;
const SHARE_PANEL_PX: f32 = 320.0;
const VOLUME_GAUGE_HIDE_AFTER: Duration = Duration::from_secs(4);
const VOLUME_GAUGE_ANIM: Duration = Duration::from_millis(200);
const LIKE_PULSE_DURATION: Duration = Duration::from_millis(300);
const DESCRIPTION_CLAMP_LINES: usize = 4;
const HEART_RISE_ROWS: f32 = 4.0;
const ACTION_COLUMN_WIDTH: u16 = 10;

const COLOR_BG: Color = Color::Rgb(30, 30, 46);
const COLOR_PANEL_BG: Color = Color::Rgb(24, 24, 36);
const COLOR_DIM_BG: Color = Color::Rgb(12, 12, 18);
const COLOR_BORDER_IDLE: Color = Color::Rgb(49, 50, 68);
const COLOR_PANEL_SELECTED_BG: Color = Color::Rgb(69, 71, 90);
const COLOR_TEXT_PRIMARY: Color = Color::Rgb(205, 214, 244);
const COLOR_TEXT_SECONDARY: Color = Color::Rgb(166, 173, 200);
const COLOR_TEXT_FAINT: Color = Color::Rgb(108, 112, 134);
const COLOR_ACCENT: Color = Color::Rgb(137, 180, 250);
const COLOR_LIKE: Color = Color::Rgb(243, 139, 168);

enum AsyncResponse {
    Share {
        result: Result<ShareOutcome, ShareError>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CommentFocus {
    List,
    Input,
}

struct VolumeGauge {
    visible: bool,
    anim: Animated,
    last_touch: Instant,
}

impl VolumeGauge {
    fn new() -> Self {
        Self {
            visible: false,
            anim: Animated::new(0.0),
            last_touch: Instant::now(),
        }
    }

    fn touch(&mut self, now: Instant) {
        self.last_touch = now;
        if !self.visible {
            self.visible = true;
            self.anim
                .animate_to(1.0, VOLUME_GAUGE_ANIM, Easing::Linear, now);
        }
    }

    fn toggle(&mut self, now: Instant) {
        if self.visible {
            self.hide(now);
        } else {
            self.touch(now);
        }
    }

    fn hide(&mut self, now: Instant) {
        if self.visible {
            self.visible = false;
            self.anim
                .animate_to(0.0, VOLUME_GAUGE_ANIM, Easing::Linear, now);
        }
    }

    /// Auto-hide after a stretch with no slider interaction.
    fn tick(&mut self, now: Instant) -> bool {
        if self.visible && now.saturating_duration_since(self.last_touch) >= VOLUME_GAUGE_HIDE_AFTER
        {
            self.hide(now);
            return true;
        }
        !self.anim.is_settled_at(now)
    }

    fn level(&self, now: Instant) -> f32 {
        self.anim.value_at(now)
    }
}

pub struct Options {
    pub status_message: String,
    pub reels: Vec<ReelItem>,
    pub comment_store: CommentStore,
    pub playback: PlaybackController,
    pub panel_tuning: PanelTuning,
    pub fade_duration: Duration,
}

pub struct Model {
    reels: Vec<ReelItem>,
    scroll: FeedScrollController,
    playback: PlaybackController,
    comment_store: CommentStore,
    reel_reactions: HashMap<String, Reaction>,
    hearts: HashMap<String, HeartBurst>,
    like_pulse: Option<(String, Instant)>,
    expanded_descriptions: HashSet<String>,
    volume_gauge: VolumeGauge,
    comments_panel: Panel,
    share_panel: Panel,
    comment_focus: CommentFocus,
    comment_input: String,
    visible_comments: Vec<CommentId>,
    selected_comment: usize,
    reply_to: Option<CommentId>,
    share_selected: usize,
    share_in_flight: bool,
    drag_origin: Option<(u16, u16)>,
    panel_area: Option<Rect>,
    status_message: String,
    needs_redraw: bool,
    response_tx: Sender<AsyncResponse>,
    response_rx: Receiver<AsyncResponse>,
}

impl Model {
    pub fn new(options: Options) -> Self {
        let now = Instant::now();
        let (response_tx, response_rx) = unbounded();
        let mut model = Self {
            scroll: FeedScrollController::new(
                options.reels.len(),
                24.0 * CELL_PX,
                options.fade_duration,
                now,
            ),
            reels: options.reels,
            playback: options.playback,
            comment_store: options.comment_store,
            reel_reactions: HashMap::new(),
            hearts: HashMap::new(),
            like_pulse: None,
            expanded_descriptions: HashSet::new(),
            volume_gauge: VolumeGauge::new(),
            comments_panel: Panel::new(PanelKind::Comments, options.panel_tuning),
            share_panel: Panel::new(PanelKind::Share, options.panel_tuning),
            comment_focus: CommentFocus::List,
            comment_input: String::new(),
            visible_comments: Vec::new(),
            selected_comment: 0,
            reply_to: None,
            share_selected: 0,
            share_in_flight: false,
            drag_origin: None,
            panel_area: None,
            status_message: options.status_message,
            needs_redraw: true,
            response_tx,
            response_rx,
        };
        if let Some(reel) = model.reels.first().cloned() {
            model.playback.activate(&reel);
        }
        model
    }

    pub fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal);

        self.playback.deactivate();
        disable_raw_mode()?;
        terminal.backend_mut().execute(DisableMouseCapture)?;
        terminal.backend_mut().execute(LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let mut last_tick = Instant::now();

        loop {
            if self.poll_async() {
                self.mark_dirty();
            }

            if self.needs_redraw {
                terminal.draw(|frame| self.draw(frame))?;
                self.needs_redraw = false;
            }

            let timeout = TICK_RATE
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_millis(16));

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        match self.handle_key(key.code) {
                            Ok(true) => break,
                            Ok(false) => {}
                            Err(err) => {
                                self.status_message = format!("Error: {}", err);
                                self.mark_dirty();
                            }
                        }
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Resize(_, _) => self.mark_dirty(),
                    _ => {}
                }
            }

            if last_tick.elapsed() >= TICK_RATE {
                last_tick = Instant::now();
                if self.tick(last_tick) {
                    self.mark_dirty();
                }
            }
        }

        Ok(())
    }

    fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    fn poll_async(&mut self) -> bool {
        let mut handled = false;
        while let Ok(response) = self.response_rx.try_recv() {
            match response {
                AsyncResponse::Share { result } => {
                    self.share_in_flight = false;
                    self.status_message = match result {
                        Ok(outcome) => outcome.notice(),
                        Err(err) => format!("Share failed: {err}"),
                    };
                }
            }
            handled = true;
        }
        handled
    }

    /// Advances time-driven state. Returns `true` when a redraw is due.
    fn tick(&mut self, now: Instant) -> bool {
        let mut dirty = false;

        for burst in self.hearts.values_mut() {
            if burst.prune(now) {
                dirty = true;
            }
            if !burst.is_empty() {
                dirty = true;
            }
        }

        if let Some((_, started)) = &self.like_pulse {
            if now.saturating_duration_since(*started) >= LIKE_PULSE_DURATION {
                self.like_pulse = None;
            }
            dirty = true;
        }

        self.comments_panel.tick(now);
        self.share_panel.tick(now);
        if self.comments_panel.animating(now) || self.share_panel.animating(now) {
            dirty = true;
        }

        if !self.scroll.fade_settled(now) {
            dirty = true;
        }

        if self.volume_gauge.tick(now) {
            dirty = true;
        }

        dirty
    }

    fn active_reel(&self) -> Option<&ReelItem> {
        self.reels.get(self.scroll.current_index())
    }

    fn any_panel_visible(&self) -> bool {
        self.comments_panel.is_visible() || self.share_panel.is_visible()
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        if self.comments_panel.is_visible() {
            self.handle_comments_key(code);
            return Ok(false);
        }
        if self.share_panel.is_visible() {
            return Ok(self.handle_share_key(code));
        }

        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('j') | KeyCode::Down => self.flick(1),
            KeyCode::Char('k') | KeyCode::Up => self.flick(-1),
            KeyCode::Char(' ') | KeyCode::Enter => self.tap_video(),
            KeyCode::Char('l') => self.like_active_reel(),
            KeyCode::Char('c') => self.open_comments(),
            KeyCode::Char('s') => self.open_share(),
            KeyCode::Char('m') => self.toggle_mute(),
            KeyCode::Char('v') => {
                self.volume_gauge.toggle(Instant::now());
                self.mark_dirty();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_volume(0.1),
            KeyCode::Char('-') => self.adjust_volume(-0.1),
            KeyCode::Char('e') => self.toggle_description(),
            _ => {}
        }
        Ok(false)
    }

    fn flick(&mut self, delta: i64) {
        if self.reels.is_empty() {
            return;
        }
        let now = Instant::now();
        let len = self.reels.len() as i64;
        let target = (self.scroll.current_index() as i64 + delta).clamp(0, len - 1) as usize;
        let offset = self.scroll.settle_offset_for(target);
        if let Some(index) = self.scroll.on_scroll_settle(offset, now) {
            let reel = self.reels[index].clone();
            self.playback.activate(&reel);
            self.status_message = format!(
                "Reel {}/{} — @{}",
                index + 1,
                self.reels.len(),
                reel.username
            );
        }
        self.mark_dirty();
    }

    fn tap_video(&mut self) {
        let state = self.playback.tap();
        self.status_message = match state {
            PlaybackState::Playing => "Playing.".to_string(),
            PlaybackState::Paused => "Paused.".to_string(),
            PlaybackState::Inactive => "Nothing to play.".to_string(),
        };
        self.mark_dirty();
    }

    fn like_active_reel(&mut self) {
        let Some(reel) = self.active_reel().cloned() else {
            return;
        };
        let reaction = self
            .reel_reactions
            .entry(reel.id.clone())
            .or_insert_with(|| Reaction::new(reel.likes));
        let now = Instant::now();
        if reaction.toggle() {
            self.hearts.entry(reel.id.clone()).or_default().spawn(now);
        }
        self.like_pulse = Some((reel.id.clone(), now));
        self.mark_dirty();
    }

    fn toggle_mute(&mut self) {
        let muted = self.playback.context().toggle_mute();
        self.status_message = if muted {
            "Muted.".to_string()
        } else {
            "Unmuted.".to_string()
        };
        self.volume_gauge.touch(Instant::now());
        self.mark_dirty();
    }

    fn adjust_volume(&mut self, delta: f32) {
        let ctx = self.playback.context().clone();
        let volume = ctx.audio().volume + delta;
        ctx.set_volume(volume);
        self.volume_gauge.touch(Instant::now());
        self.status_message = format!("Volume {:.0}%", ctx.audio().volume * 100.0);
        self.mark_dirty();
    }

    fn toggle_description(&mut self) {
        let Some(reel) = self.active_reel() else {
            return;
        };
        let id = reel.id.clone();
        if !self.expanded_descriptions.remove(&id) {
            self.expanded_descriptions.insert(id);
        }
        self.mark_dirty();
    }

    fn open_comments(&mut self) {
        if self.any_panel_visible() {
            return;
        }
        let Some(reel) = self.active_reel() else {
            return;
        };
        let reel_id = reel.id.clone();
        let now = Instant::now();
        let height = self.viewport_px() * COMMENTS_PANEL_RATIO;
        self.comments_panel.open(&reel_id, height, now);
        self.visible_comments = self.comment_store.flatten(&reel_id);
        self.selected_comment = 0;
        self.comment_focus = CommentFocus::List;
        self.reply_to = None;
        self.mark_dirty();
    }

    fn open_share(&mut self) {
        if self.any_panel_visible() {
            return;
        }
        let Some(reel) = self.active_reel() else {
            return;
        };
        let reel_id = reel.id.clone();
        let now = Instant::now();
        let height = SHARE_PANEL_PX.min(self.viewport_px() * 0.8);
        self.share_panel.open(&reel_id, height, now);
        self.share_selected = 0;
        self.mark_dirty();
    }

    fn viewport_px(&self) -> f32 {
        self.scroll.viewport_height()
    }

    fn close_comments(&mut self) {
        let now = Instant::now();
        self.comments_panel.begin_close(now);
        self.comment_focus = CommentFocus::List;
        self.reply_to = None;
        self.mark_dirty();
    }

    fn handle_comments_key(&mut self, code: KeyCode) {
        if self.comment_focus == CommentFocus::Input {
            match code {
                KeyCode::Esc => {
                    self.comment_focus = CommentFocus::List;
                    self.reply_to = None;
                }
                KeyCode::Enter => self.submit_comment(),
                KeyCode::Backspace => {
                    self.comment_input.pop();
                }
                KeyCode::Char(ch) => {
                    // further input past the cap is dropped, not rejected
                    if self.comment_input.chars().count() < MAX_COMMENT_LEN {
                        self.comment_input.push(ch);
                    }
                }
                _ => {}
            }
            self.mark_dirty();
            return;
        }

        match code {
            KeyCode::Esc => self.close_comments(),
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected_comment + 1 < self.visible_comments.len() {
                    self.selected_comment += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_comment = self.selected_comment.saturating_sub(1);
            }
            KeyCode::Char('l') => {
                if let Some(id) = self.visible_comments.get(self.selected_comment).cloned() {
                    self.comment_store.toggle_like(&id);
                }
            }
            KeyCode::Char('r') => {
                if let Some(id) = self.visible_comments.get(self.selected_comment).cloned() {
                    self.reply_to = Some(id);
                    self.comment_focus = CommentFocus::Input;
                }
            }
            KeyCode::Char('i') | KeyCode::Char('a') => {
                self.reply_to = None;
                self.comment_focus = CommentFocus::Input;
            }
            _ => {}
        }
        self.mark_dirty();
    }

    fn submit_comment(&mut self) {
        let Some(reel_id) = self.comments_panel.target().map(str::to_string) else {
            return;
        };
        let text = self.comment_input.clone();
        let added = match &self.reply_to {
            Some(parent) => self.comment_store.add_reply(parent, &text),
            None => self.comment_store.add_top_level(&reel_id, &text),
        };
        if added.is_some() {
            self.comment_input.clear();
            self.reply_to = None;
            self.comment_focus = CommentFocus::List;
            self.visible_comments = self.comment_store.flatten(&reel_id);
            self.selected_comment = 0;
            self.status_message = "Comment posted.".to_string();
        }
        // blank input is a silent no-op by contract
        self.mark_dirty();
    }

    /// Returns `true` to quit (never, currently; share panel swallows keys).
    fn handle_share_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Esc => {
                self.share_panel.begin_close(Instant::now());
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.share_selected + 1 < ShareTarget::ALL.len() {
                    self.share_selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.share_selected = self.share_selected.saturating_sub(1);
            }
            KeyCode::Enter => self.invoke_share(),
            _ => {}
        }
        self.mark_dirty();
        false
    }

    fn invoke_share(&mut self) {
        if self.share_in_flight {
            return;
        }
        let Some(reel_id) = self.share_panel.target().map(str::to_string) else {
            return;
        };
        let target = ShareTarget::ALL[self.share_selected.min(ShareTarget::ALL.len() - 1)];
        self.share_in_flight = true;
        let tx = self.response_tx.clone();
        thread::spawn(move || {
            let mut clipboard = share::SystemClipboard;
            let result = share::share(target, &reel_id, &mut clipboard);
            let _ = tx.send(AsyncResponse::Share { result });
        });
        self.share_panel.begin_close(Instant::now());
        self.mark_dirty();
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let now = Instant::now();
        let panel = if self.comments_panel.is_visible() {
            Some(&mut self.comments_panel)
        } else if self.share_panel.is_visible() {
            Some(&mut self.share_panel)
        } else {
            None
        };
        let Some(panel) = panel else {
            return;
        };
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let inside = self
                    .panel_area
                    .map(|area| {
                        mouse.column >= area.x
                            && mouse.column < area.x + area.width
                            && mouse.row >= area.y
                            && mouse.row < area.y + area.height
                    })
                    .unwrap_or(false);
                if inside {
                    self.drag_origin = Some((mouse.column, mouse.row));
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((origin_col, origin_row)) = self.drag_origin {
                    let dx = (f32::from(mouse.column) - f32::from(origin_col)) * (CELL_PX / 2.0);
                    let dy = (f32::from(mouse.row) - f32::from(origin_row)) * CELL_PX;
                    panel.on_drag_move(dx, dy);
                    self.mark_dirty();
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.drag_origin.take().is_some() {
                    let (outcome, _target) = panel.on_drag_release(now);
                    if outcome == DragOutcome::Dismissed && panel.kind() == PanelKind::Comments {
                        self.comment_focus = CommentFocus::List;
                        self.reply_to = None;
                    }
                    self.mark_dirty();
                }
            }
            _ => {}
        }
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let now = Instant::now();
        let area = frame.size();
        self.scroll
            .set_viewport_height(f32::from(area.height.max(1)) * CELL_PX);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        self.draw_feed(frame, chunks[0], now);
        self.draw_status(frame, chunks[1]);

        self.panel_area = None;
        if self.comments_panel.is_visible() {
            self.draw_comments_panel(frame, chunks[0], now);
        } else if self.share_panel.is_visible() {
            self.draw_share_panel(frame, chunks[0], now);
        }
    }

    fn draw_feed(&mut self, frame: &mut Frame<'_>, area: Rect, now: Instant) {
        let index = self.scroll.current_index();
        let Some(reel) = self.reels.get(index).cloned() else {
            let empty = Paragraph::new("The feed is empty.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(COLOR_TEXT_SECONDARY).bg(COLOR_BG));
            frame.render_widget(empty, area);
            return;
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(COLOR_BORDER_IDLE))
            .style(Style::default().bg(COLOR_BG))
            .title(format!(" Reels {}/{} ", index + 1, self.reels.len()));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height < 6 || inner.width < 20 {
            return;
        }

        let fade = self.scroll.overlay_opacity(now);
        let overlay_fg = fade_color(fade);
        let overlay_dim = if fade < 0.5 {
            COLOR_TEXT_FAINT
        } else {
            COLOR_TEXT_SECONDARY
        };

        // bottom overlay: username, description, metadata
        let description_width = inner.width.saturating_sub(ACTION_COLUMN_WIDTH + 2) as usize;
        let expanded = self.expanded_descriptions.contains(&reel.id);
        let wrapped = wrap(&reel.description, description_width.max(10));
        let clamped = !expanded && wrapped.len() > DESCRIPTION_CLAMP_LINES;
        let shown_lines = if clamped {
            DESCRIPTION_CLAMP_LINES
        } else {
            wrapped.len()
        };
        let overlay_height = (shown_lines + 3) as u16;
        let video_area = Rect {
            x: inner.x,
            y: inner.y,
            width: inner.width,
            height: inner.height.saturating_sub(overlay_height),
        };
        let overlay_area = Rect {
            x: inner.x,
            y: inner.y + video_area.height,
            width: inner.width.saturating_sub(ACTION_COLUMN_WIDTH),
            height: overlay_height.min(inner.height),
        };

        self.draw_video(frame, video_area, &reel, now);

        let mut overlay_lines: Vec<Line> = Vec::new();
        overlay_lines.push(Line::from(Span::styled(
            format!("@{}", reel.username),
            Style::default().fg(overlay_fg).add_modifier(Modifier::BOLD),
        )));
        for piece in wrapped.iter().take(shown_lines) {
            overlay_lines.push(Line::from(Span::styled(
                piece.to_string(),
                Style::default().fg(overlay_fg),
            )));
        }
        if clamped || (expanded && wrapped.len() > DESCRIPTION_CLAMP_LINES) {
            overlay_lines.push(Line::from(Span::styled(
                if expanded { "less (e)" } else { "more… (e)" },
                Style::default().fg(COLOR_ACCENT),
            )));
        }
        let mut metadata = vec![Span::styled(
            format!("{} views", reel.views),
            Style::default().fg(overlay_dim),
        )];
        for tag in &reel.hashtags {
            metadata.push(Span::raw("  "));
            metadata.push(Span::styled(
                format!("#{tag}"),
                Style::default().fg(overlay_fg),
            ));
        }
        overlay_lines.push(Line::from(metadata));
        frame.render_widget(Paragraph::new(Text::from(overlay_lines)), overlay_area);

        self.draw_action_column(frame, inner, &reel, now);
        self.draw_volume_gauge(frame, inner, now);
    }

    fn draw_video(&self, frame: &mut Frame<'_>, area: Rect, reel: &ReelItem, _now: Instant) {
        if area.height < 3 {
            return;
        }
        let state = self.playback.state_for(&reel.id);
        let (glyph, label, label_style) = if self.playback.awaiting_interaction() {
            (
                "▶",
                "Tap to play (space)".to_string(),
                Style::default()
                    .fg(COLOR_TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            match state {
                PlaybackState::Playing => (
                    "⏵",
                    format!("Playing · {}", reel.duration),
                    Style::default().fg(COLOR_TEXT_SECONDARY),
                ),
                PlaybackState::Paused => (
                    "▶",
                    "Paused".to_string(),
                    Style::default()
                        .fg(COLOR_TEXT_PRIMARY)
                        .add_modifier(Modifier::BOLD),
                ),
                PlaybackState::Inactive => (
                    "·",
                    "Inactive".to_string(),
                    Style::default().fg(COLOR_TEXT_FAINT),
                ),
            }
        };

        let mut lines: Vec<Line> = Vec::new();
        let pad = area.height.saturating_sub(3) / 2;
        for _ in 0..pad {
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(Span::styled(
            glyph,
            Style::default()
                .fg(COLOR_TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(label, label_style)));
        lines.push(Line::from(Span::styled(
            reel.video_url.clone(),
            Style::default().fg(COLOR_TEXT_FAINT),
        )));
        let video = Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(video, area);
    }

    fn draw_action_column(&self, frame: &mut Frame<'_>, inner: Rect, reel: &ReelItem, now: Instant) {
        let column_height: u16 = 10;
        if inner.height < column_height + 2 || inner.width <= ACTION_COLUMN_WIDTH {
            return;
        }
        let area = Rect {
            x: inner.x + inner.width - ACTION_COLUMN_WIDTH,
            y: inner.y + inner.height - column_height - 1,
            width: ACTION_COLUMN_WIDTH,
            height: column_height,
        };

        let reaction = self
            .reel_reactions
            .get(&reel.id)
            .copied()
            .unwrap_or_else(|| Reaction::new(reel.likes));
        let pulsing = matches!(&self.like_pulse, Some((id, _)) if id == &reel.id);
        let heart_style = if reaction.liked() {
            let mut style = Style::default().fg(COLOR_LIKE);
            if pulsing {
                style = style.add_modifier(Modifier::BOLD);
            }
            style
        } else {
            Style::default().fg(COLOR_TEXT_PRIMARY)
        };

        // rows 0..=4 carry floating hearts drifting up from the like button
        let heart_rise_span = HEART_RISE_ROWS as usize;
        let mut float_rows: Vec<Option<f32>> = vec![None; heart_rise_span + 1];
        if let Some(burst) = self.hearts.get(&reel.id) {
            for (_, progress) in burst.progress(now) {
                let rise = ((progress * HEART_RISE_ROWS) as usize).min(heart_rise_span);
                float_rows[heart_rise_span - rise] = Some(progress);
            }
        }

        let mut lines: Vec<Line> = Vec::new();
        for slot in &float_rows {
            match slot {
                Some(progress) => {
                    let style = if *progress > 0.8 {
                        Style::default().fg(COLOR_TEXT_FAINT)
                    } else {
                        Style::default().fg(COLOR_LIKE)
                    };
                    lines.push(Line::from(Span::styled("  ♥", style)));
                }
                None => lines.push(Line::raw("")),
            }
        }
        lines.push(Line::from(vec![
            Span::styled("♥ ", heart_style),
            Span::styled(
                format_count(reaction.display_count()),
                Style::default().fg(COLOR_TEXT_PRIMARY),
            ),
        ]));
        let thread_extra = self.comment_store.thread_total(&reel.id) as u64;
        lines.push(Line::from(vec![
            Span::styled("🗨 ", Style::default().fg(COLOR_TEXT_PRIMARY)),
            Span::styled(
                format_count(reel.comments + thread_extra),
                Style::default().fg(COLOR_TEXT_PRIMARY),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::styled("↗ ", Style::default().fg(COLOR_TEXT_PRIMARY)),
            Span::styled(
                format_count(reel.shares),
                Style::default().fg(COLOR_TEXT_PRIMARY),
            ),
        ]));
        let audio = self.playback.context().audio();
        lines.push(Line::from(Span::styled(
            if audio.muted { "🔇" } else { "🔊" },
            Style::default().fg(COLOR_TEXT_SECONDARY),
        )));

        frame.render_widget(Paragraph::new(Text::from(lines)), area);
    }

    fn draw_volume_gauge(&self, frame: &mut Frame<'_>, inner: Rect, now: Instant) {
        let level = self.volume_gauge.level(now);
        if level <= 0.01 || inner.width < 24 {
            return;
        }
        let audio = self.playback.context().audio();
        let full_width: u16 = 20;
        // slide in from the left as the gauge animates
        let width = ((f32::from(full_width) * level).round() as u16).clamp(1, full_width);
        let area = Rect {
            x: inner.x + 1,
            y: inner.y,
            width,
            height: 1,
        };
        let filled = ((audio.volume * 10.0).round() as usize).min(10);
        let bar: String = "█".repeat(filled) + &"░".repeat(10 - filled);
        let label = if audio.muted {
            format!("{bar} muted")
        } else {
            format!("{bar} {:3.0}%", audio.volume * 100.0)
        };
        let gauge = Paragraph::new(Span::styled(
            label,
            Style::default().fg(COLOR_TEXT_PRIMARY).bg(COLOR_PANEL_BG),
        ));
        frame.render_widget(gauge, area);
    }

    fn panel_rect(&self, area: Rect, panel: &Panel, now: Instant) -> Option<Rect> {
        let visible_px = (panel.height() - panel.offset_px(now)).max(0.0);
        let rows = (visible_px / CELL_PX).round() as u16;
        if rows < 3 {
            return None;
        }
        let rows = rows.min(area.height.saturating_sub(1));
        Some(Rect {
            x: area.x,
            y: area.y + area.height - rows,
            width: area.width,
            height: rows,
        })
    }

    fn dim_backdrop(&self, frame: &mut Frame<'_>, area: Rect, panel: &Panel, now: Instant) {
        if panel.dim(now) >= 0.25 {
            frame.render_widget(
                Block::default().style(Style::default().bg(COLOR_DIM_BG)),
                area,
            );
        }
    }

    fn draw_comments_panel(&mut self, frame: &mut Frame<'_>, area: Rect, now: Instant) {
        self.dim_backdrop(frame, area, &self.comments_panel, now);
        let Some(rect) = self.panel_rect(area, &self.comments_panel, now) else {
            return;
        };
        self.panel_area = Some(rect);
        frame.render_widget(Clear, rect);

        let reel_id = self
            .comments_panel
            .target()
            .map(str::to_string)
            .unwrap_or_default();
        let total = self.comment_store.thread_total(&reel_id);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(COLOR_BORDER_IDLE))
            .style(Style::default().bg(COLOR_PANEL_BG))
            .title(format!(" ── Comments ({total}) ── "));
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        if inner.height < 4 {
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(2)])
            .split(inner);

        let items: Vec<ListItem> = self
            .visible_comments
            .iter()
            .filter_map(|id| self.comment_store.get(id))
            .map(|comment| {
                let indent = "  ".repeat(comment.display_indent());
                let mut text = Text::default();
                text.lines.push(Line::from(vec![
                    Span::raw(indent.clone()),
                    Span::styled(
                        comment.author().to_string(),
                        Style::default()
                            .fg(COLOR_TEXT_PRIMARY)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(
                        comment.created_at().to_string(),
                        Style::default().fg(COLOR_TEXT_FAINT),
                    ),
                ]));
                let body_width = (inner.width as usize).saturating_sub(indent.len() + 2);
                for piece in wrap(comment.text(), body_width.max(10)) {
                    text.lines.push(Line::from(vec![
                        Span::raw(indent.clone()),
                        Span::styled(piece.to_string(), Style::default().fg(COLOR_TEXT_SECONDARY)),
                    ]));
                }
                let heart = if comment.liked() {
                    Span::styled("♥", Style::default().fg(COLOR_LIKE))
                } else {
                    Span::styled("♡", Style::default().fg(COLOR_TEXT_FAINT))
                };
                text.lines.push(Line::from(vec![
                    Span::raw(indent),
                    heart,
                    Span::styled(
                        format!(" {}  ·  reply (r)", comment.like_count()),
                        Style::default().fg(COLOR_TEXT_FAINT),
                    ),
                ]));
                ListItem::new(text)
            })
            .collect();

        if items.is_empty() {
            let empty = Paragraph::new("No comments yet. Press i to write one.")
                .style(Style::default().fg(COLOR_TEXT_FAINT));
            frame.render_widget(empty, chunks[0]);
        } else {
            let list = List::new(items)
                .highlight_style(Style::default().bg(COLOR_PANEL_SELECTED_BG));
            let mut state = ListState::default();
            state.select(Some(self.selected_comment.min(
                self.visible_comments.len().saturating_sub(1),
            )));
            frame.render_stateful_widget(list, chunks[0], &mut state);
        }

        let reply_hint = self
            .reply_to
            .as_ref()
            .and_then(|id| self.comment_store.get(id))
            .map(|comment| format!("Replying to {} — Esc cancels", comment.author()));
        let mut input_lines: Vec<Line> = Vec::new();
        if let Some(hint) = reply_hint {
            input_lines.push(Line::from(Span::styled(
                hint,
                Style::default().fg(COLOR_ACCENT),
            )));
        } else {
            input_lines.push(Line::from(Span::styled(
                if self.comment_focus == CommentFocus::Input {
                    "Enter sends · Esc back"
                } else {
                    "i write · r reply · l like · ↓ drag or Esc to close"
                },
                Style::default().fg(COLOR_TEXT_FAINT),
            )));
        }
        let cursor = if self.comment_focus == CommentFocus::Input {
            "▌"
        } else {
            ""
        };
        input_lines.push(Line::from(vec![
            Span::styled("> ", Style::default().fg(COLOR_ACCENT)),
            Span::styled(
                format!("{}{}", self.comment_input, cursor),
                Style::default().fg(COLOR_TEXT_PRIMARY),
            ),
        ]));
        frame.render_widget(Paragraph::new(Text::from(input_lines)), chunks[1]);
    }

    fn draw_share_panel(&mut self, frame: &mut Frame<'_>, area: Rect, now: Instant) {
        self.dim_backdrop(frame, area, &self.share_panel, now);
        let Some(rect) = self.panel_rect(area, &self.share_panel, now) else {
            return;
        };
        self.panel_area = Some(rect);
        frame.render_widget(Clear, rect);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(COLOR_BORDER_IDLE))
            .style(Style::default().bg(COLOR_PANEL_BG))
            .title(" ── Share ── ");
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        if inner.height < 2 {
            return;
        }

        let items: Vec<ListItem> = ShareTarget::ALL
            .iter()
            .map(|target| {
                let icon = match target {
                    ShareTarget::WhatsApp => "💬",
                    ShareTarget::X => "𝕏 ",
                    ShareTarget::Gmail => "📧",
                    ShareTarget::CopyLink => "🔗",
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{icon}  ")),
                    Span::styled(target.label(), Style::default().fg(COLOR_TEXT_PRIMARY)),
                ]))
            })
            .collect();
        let list = List::new(items).highlight_style(Style::default().bg(COLOR_PANEL_SELECTED_BG));
        let mut state = ListState::default();
        state.select(Some(self.share_selected));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);
        frame.render_stateful_widget(list, chunks[0], &mut state);
        let hint = Paragraph::new(Span::styled(
            "Enter share · ↓ drag or Esc to close",
            Style::default().fg(COLOR_TEXT_FAINT),
        ));
        frame.render_widget(hint, chunks[1]);
    }

    fn draw_status(&self, frame: &mut Frame<'_>, area: Rect) {
        let hints = "q quit · j/k flick · space play · l like · c comments · s share · m mute";
        let mut spans = vec![Span::styled(
            self.status_message.clone(),
            Style::default().fg(COLOR_TEXT_PRIMARY),
        )];
        let used = self.status_message.width() + 3;
        if area.width as usize > used + hints.len() {
            spans.push(Span::styled(
                format!("   {hints}"),
                Style::default().fg(COLOR_TEXT_FAINT),
            ));
        }
        let status = Paragraph::new(Line::from(spans))
            .style(Style::default().bg(COLOR_PANEL_BG));
        frame.render_widget(status, area);
    }
}

fn fade_color(fade: f32) -> Color {
    if fade < 0.33 {
        COLOR_TEXT_FAINT
    } else if fade < 0.66 {
        COLOR_TEXT_SECONDARY
    } else {
        COLOR_TEXT_PRIMARY
    }
}

fn format_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_abbreviate_like_the_seed_labels() {
        assert_eq!(format_count(89), "89");
        assert_eq!(format_count(3600), "3.6K");
        assert_eq!(format_count(1_250_000), "1.3M");
    }

    #[test]
    fn fade_color_brightens_with_opacity() {
        assert_eq!(fade_color(0.0), COLOR_TEXT_FAINT);
        assert_eq!(fade_color(0.5), COLOR_TEXT_SECONDARY);
        assert_eq!(fade_color(1.0), COLOR_TEXT_PRIMARY);
    }
}
