/// Share targets for a reel: the clipboard, plus named providers that are
/// deliberate stubs for now. Every action is attempted exactly once; a
/// failure is terminal for that attempt.

const REEL_LINK_BASE: &str = "https://app.example.com/reel";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareTarget {
    CopyLink,
    WhatsApp,
    X,
    Gmail,
}

impl ShareTarget {
    pub const ALL: [ShareTarget; 4] = [
        ShareTarget::WhatsApp,
        ShareTarget::X,
        ShareTarget::Gmail,
        ShareTarget::CopyLink,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ShareTarget::CopyLink => "Copy link",
            ShareTarget::WhatsApp => "WhatsApp",
            ShareTarget::X => "X",
            ShareTarget::Gmail => "Gmail",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The link landed on the clipboard.
    Copied,
    /// A named provider that is still an unimplemented passthrough.
    Stubbed(&'static str),
}

impl ShareOutcome {
    pub fn notice(&self) -> String {
        match self {
            ShareOutcome::Copied => "Link copied to clipboard.".to_string(),
            ShareOutcome::Stubbed(name) => {
                format!("{name} sharing is still in development.")
            }
        }
    }
}

pub fn reel_link(reel_id: &str) -> String {
    format!("{REEL_LINK_BASE}/{reel_id}")
}

/// Seam over the system clipboard so share logic stays testable.
pub trait ClipboardSink: Send {
    fn set_text(&mut self, text: String) -> Result<(), ShareError>;
}

/// `arboard`-backed clipboard. The handle is created per call; keeping one
/// open for the process lifetime pins the selection on some platforms.
#[derive(Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: String) -> Result<(), ShareError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|err| ShareError::Clipboard(err.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|err| ShareError::Clipboard(err.to_string()))
    }
}

pub fn share(
    target: ShareTarget,
    reel_id: &str,
    clipboard: &mut dyn ClipboardSink,
) -> Result<ShareOutcome, ShareError> {
    match target {
        ShareTarget::CopyLink => {
            clipboard.set_text(reel_link(reel_id))?;
            Ok(ShareOutcome::Copied)
        }
        ShareTarget::WhatsApp => Ok(ShareOutcome::Stubbed("WhatsApp")),
        ShareTarget::X => Ok(ShareOutcome::Stubbed("X")),
        ShareTarget::Gmail => Ok(ShareOutcome::Stubbed("Gmail")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingClipboard {
        contents: Option<String>,
        fail: bool,
    }

    impl ClipboardSink for RecordingClipboard {
        fn set_text(&mut self, text: String) -> Result<(), ShareError> {
            if self.fail {
                return Err(ShareError::Clipboard("denied".to_string()));
            }
            self.contents = Some(text);
            Ok(())
        }
    }

    #[test]
    fn copy_link_puts_reel_url_on_clipboard() {
        let mut clipboard = RecordingClipboard::default();
        let outcome = share(ShareTarget::CopyLink, "42", &mut clipboard).unwrap();
        assert_eq!(outcome, ShareOutcome::Copied);
        assert_eq!(
            clipboard.contents.as_deref(),
            Some("https://app.example.com/reel/42")
        );
    }

    #[test]
    fn clipboard_failure_surfaces_as_error() {
        let mut clipboard = RecordingClipboard {
            fail: true,
            ..Default::default()
        };
        let err = share(ShareTarget::CopyLink, "42", &mut clipboard).unwrap_err();
        assert!(matches!(err, ShareError::Clipboard(_)));
    }

    #[test]
    fn named_providers_are_stubs() {
        let mut clipboard = RecordingClipboard::default();
        for target in [ShareTarget::WhatsApp, ShareTarget::X, ShareTarget::Gmail] {
            let outcome = share(target, "42", &mut clipboard).unwrap();
            assert!(matches!(outcome, ShareOutcome::Stubbed(_)));
        }
        assert!(clipboard.contents.is_none());
    }
}
