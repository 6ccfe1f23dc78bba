//! Clipboard access for the copy action.
//!
//! The system clipboard shells out to pbcopy (macOS), wl-copy (Wayland) or xclip (X11),
//! trying each in turn. Unlike a best-effort copy, failure is reported so the form
//! controller can surface it.

use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// How long a tool that keeps running after the copy gets to report an early failure
const SETTLE_WINDOW: Duration = Duration::from_millis(200);
const SETTLE_POLL: Duration = Duration::from_millis(20);

/// Whether a clipboard tool exits after taking the text or stays in the foreground
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifetime {
    Exits,
    StaysRunning,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);

/// Destination for copied transcript text
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The desktop clipboard
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    fn candidates() -> Vec<(&'static str, &'static [&'static str], Lifetime)> {
        let mut tools: Vec<(&'static str, &'static [&'static str], Lifetime)> = Vec::new();
        #[cfg(target_os = "macos")]
        tools.push(("pbcopy", &[], Lifetime::Exits));
        tools.push(("wl-copy", &["--type", "text/plain"], Lifetime::Exits));
        // xclip -quiet stays in the foreground until the selection is taken over
        tools.push((
            "xclip",
            &["-selection", "clipboard", "-in", "-quiet"],
            Lifetime::StaysRunning,
        ));
        tools
    }

    fn pipe_to(tool: &str, args: &[&str], text: &str, lifetime: Lifetime) -> Result<(), String> {
        let mut child = Command::new(tool)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| format!("{tool} not found or not executable: {e}"))?;

        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| format!("{tool} stdin unavailable"))?;
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| format!("failed to write to {tool} stdin: {e}"))?;
        }

        match lifetime {
            Lifetime::Exits => {
                let status = child
                    .wait()
                    .map_err(|e| format!("failed to wait for {tool}: {e}"))?;
                if status.success() {
                    Ok(())
                } else {
                    Err(format!("{tool} exited with {status}"))
                }
            }
            Lifetime::StaysRunning => Self::settle(tool, &mut child),
        }
    }

    /// Give a foreground tool a short window to fail (no display, bad selection).
    /// Still running after the window means it holds the selection.
    fn settle(tool: &str, child: &mut Child) -> Result<(), String> {
        let started = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) if status.success() => return Ok(()),
                Ok(Some(status)) => return Err(format!("{tool} exited with {status}")),
                Ok(None) if started.elapsed() >= SETTLE_WINDOW => return Ok(()),
                Ok(None) => thread::sleep(SETTLE_POLL),
                Err(e) => return Err(format!("failed to wait for {tool}: {e}")),
            }
        }
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut failures = Vec::new();

        for (tool, args, lifetime) in Self::candidates() {
            match Self::pipe_to(tool, args, text, lifetime) {
                Ok(()) => {
                    tracing::debug!("Transcript copied to clipboard via {}", tool);
                    return Ok(());
                }
                Err(reason) => {
                    tracing::debug!("{}", reason);
                    failures.push(reason);
                }
            }
        }

        tracing::warn!("No clipboard tool available");
        Err(ClipboardError(failures.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool_is_reported() {
        let err = SystemClipboard::pipe_to("yt-transcript-no-such-tool", &[], "hello", Lifetime::Exits)
            .unwrap_err();
        assert!(err.contains("yt-transcript-no-such-tool"));

        let err = SystemClipboard::pipe_to(
            "yt-transcript-no-such-tool",
            &[],
            "hello",
            Lifetime::StaysRunning,
        )
        .unwrap_err();
        assert!(err.contains("not found"));
    }

    #[cfg(unix)]
    #[test]
    fn test_foreground_tool_that_exits_with_error_fails() {
        // Exits non-zero right away, the way xclip does without a display
        let err = SystemClipboard::pipe_to("sh", &["-c", "exit 1"], "hello", Lifetime::StaysRunning)
            .unwrap_err();
        assert!(err.contains("sh"));
    }

    #[cfg(unix)]
    #[test]
    fn test_foreground_tool_still_running_counts_as_copied() {
        let result = SystemClipboard::pipe_to("sleep", &["1"], "hello", Lifetime::StaysRunning);
        assert_eq!(result, Ok(()));
    }

    #[cfg(unix)]
    #[test]
    fn test_exiting_tool_status_is_checked() {
        assert_eq!(
            SystemClipboard::pipe_to("sh", &["-c", "cat > /dev/null"], "hello", Lifetime::Exits),
            Ok(())
        );
        assert!(
            SystemClipboard::pipe_to("sh", &["-c", "cat > /dev/null; exit 3"], "hello", Lifetime::Exits)
                .is_err()
        );
    }
}
