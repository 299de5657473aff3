#![allow(clippy::uninlined_format_args)]

pub mod anim;
pub mod app;
pub mod comments;
pub mod config;
pub mod debuglog;
pub mod feed;
pub mod panel;
pub mod playback;
pub mod reaction;
pub mod scroll;
pub mod share;
pub mod ui;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use app::run;
