//! System clipboard access through the platform's copy tool

use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::{DotifyError, Result};

/// A copy command that reads the text on stdin
struct CopyTool {
    program: &'static str,
    args: &'static [&'static str],
}

/// Copy tools tried in order for the current platform
#[cfg(target_os = "macos")]
const COPY_TOOLS: &[CopyTool] = &[CopyTool { program: "pbcopy", args: &[] }];

#[cfg(target_os = "linux")]
const COPY_TOOLS: &[CopyTool] = &[
    CopyTool { program: "wl-copy", args: &[] },
    CopyTool { program: "xclip", args: &["-selection", "clipboard"] },
    CopyTool { program: "xsel", args: &["--clipboard", "--input"] },
];

#[cfg(target_os = "windows")]
const COPY_TOOLS: &[CopyTool] = &[CopyTool { program: "clip", args: &[] }];

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
const COPY_TOOLS: &[CopyTool] = &[];

/// Copies text to the system clipboard.
/// - macOS: pbcopy
/// - Linux: wl-copy, xclip or xsel
/// - Windows: clip.exe
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    if !cfg!(feature = "clipboard") {
        return Err(DotifyError::clipboard("Clipboard support is disabled in this build"));
    }

    if COPY_TOOLS.is_empty() {
        return Err(DotifyError::clipboard("Clipboard not supported on this platform"));
    }

    let mut last_error = None;
    for CopyTool { program, args } in COPY_TOOLS {
        match pipe_to(program, args, text) {
            Ok(()) => {
                tracing::debug!(program = %program, "Copied to clipboard");
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(program = %program, error = %e, "Clipboard tool failed");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| DotifyError::clipboard("No clipboard tool available")))
}

fn pipe_to(program: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| DotifyError::clipboard(format!("Failed to spawn {}: {}", program, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        if let Err(e) = stdin.write_all(text.as_bytes()) {
            // Reap the child so a failed write never leaves it running
            drop(stdin);
            let _ = child.kill();
            let _ = child.wait();
            return Err(DotifyError::clipboard(format!("Failed to write to {}: {}", program, e)));
        }
    }

    let status = child
        .wait()
        .map_err(|e| DotifyError::clipboard(format!("Failed to wait for {}: {}", program, e)))?;

    if status.success() {
        Ok(())
    } else {
        Err(DotifyError::clipboard(format!("{} exited with {}", program, status)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_clipboard_error() {
        let err = pipe_to("dotify-no-such-clipboard-tool", &[], "x").unwrap_err();
        assert!(matches!(err, DotifyError::Clipboard { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_tool_that_never_reads_is_clipboard_error() {
        // `true` exits without draining stdin, so a payload larger than the
        // pipe buffer fails with a broken pipe
        let payload = "x".repeat(4 << 20);
        let err = pipe_to("true", &[], &payload).unwrap_err();
        match err {
            DotifyError::Clipboard { message } => assert!(message.contains("Failed to write to true")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
