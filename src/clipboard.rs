//! Clipboard access through the platform's copy tools (`wl-copy`, `xclip`,
//! `xsel`, `pbcopy`), behind a trait so the rest of the crate can be driven
//! by an in-memory clipboard instead.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::process::Stdio;
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

// ─── Data types ───────────────────────────────────────────────────────────────

/// What to put on the clipboard. `html` is offered as `text/html` where the
/// backend can do that; `text` is the plain-text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardPayload {
    pub html: Option<String>,
    pub text: String,
}

impl ClipboardPayload {
    pub fn html(markup: String) -> Self {
        Self { html: Some(markup.clone()), text: markup }
    }

    pub fn text(text: String) -> Self {
        Self { html: None, text }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("no clipboard tool available (install wl-clipboard, xclip or xsel)")]
    NoBackend,

    #[error("could not start {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source:  std::io::Error,
    },

    #[error("writing to {program} failed: {source}")]
    Io {
        program: &'static str,
        #[source]
        source:  std::io::Error,
    },

    #[error("{program} exited with {}", exit_desc(.code))]
    Rejected { program: &'static str, code: Option<i32> },

    #[error("{program} did not finish within {ms} ms")]
    Timeout { program: &'static str, ms: u64 },

    #[error("{0}")]
    Unavailable(String),
}

fn exit_desc(code: &Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_owned(), |c| format!("status {c}"))
}

pub trait Clipboard {
    fn copy(&self, payload: &ClipboardPayload) -> impl Future<Output = Result<(), ClipboardError>>;
}

// ─── System clipboard ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    WlCopy,
    Xclip,
    Xsel,
    Pbcopy,
}

impl Backend {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "wl-copy" | "wayland" => Some(Backend::WlCopy),
            "xclip"               => Some(Backend::Xclip),
            "xsel"                => Some(Backend::Xsel),
            "pbcopy" | "macos"    => Some(Backend::Pbcopy),
            _                     => None,
        }
    }

    /// Picks a backend from the session environment.
    pub fn detect() -> Option<Self> {
        let set = |var: &str| std::env::var_os(var).is_some_and(|v| !v.is_empty());
        if cfg!(target_os = "macos") {
            Some(Backend::Pbcopy)
        } else if set("WAYLAND_DISPLAY") {
            Some(Backend::WlCopy)
        } else if set("DISPLAY") {
            Some(Backend::Xclip)
        } else {
            None
        }
    }

    pub fn program(self) -> &'static str {
        match self {
            Backend::WlCopy => "wl-copy",
            Backend::Xclip  => "xclip",
            Backend::Xsel   => "xsel",
            Backend::Pbcopy => "pbcopy",
        }
    }

    pub fn supports_html(self) -> bool {
        matches!(self, Backend::WlCopy | Backend::Xclip)
    }

    pub fn args(self, html: bool) -> &'static [&'static str] {
        match (self, html) {
            (Backend::WlCopy, true)  => &["--type", "text/html"],
            (Backend::WlCopy, false) => &[],
            (Backend::Xclip,  true)  => &["-selection", "clipboard", "-t", "text/html"],
            (Backend::Xclip,  false) => &["-selection", "clipboard"],
            (Backend::Xsel,   _)     => &["--clipboard", "--input"],
            (Backend::Pbcopy, _)     => &[],
        }
    }
}

pub struct SystemClipboard {
    backend: Option<Backend>,
    timeout: Duration,
}

impl SystemClipboard {
    /// `backend_name` overrides detection; an unknown name is ignored.
    pub fn new(backend_name: Option<&str>, timeout_ms: u64) -> Self {
        let backend = match backend_name.map(|n| (n, Backend::from_name(n))) {
            Some((_, Some(b))) => Some(b),
            Some((n, None))    => {
                tracing::warn!("unknown clipboard backend {n:?}, detecting instead");
                Backend::detect()
            }
            None => Backend::detect(),
        };
        tracing::debug!(?backend, "clipboard backend");
        Self { backend, timeout: Duration::from_millis(timeout_ms) }
    }

    pub fn backend(&self) -> Option<Backend> { self.backend }
}

impl Clipboard for SystemClipboard {
    async fn copy(&self, payload: &ClipboardPayload) -> Result<(), ClipboardError> {
        let backend = self.backend.ok_or(ClipboardError::NoBackend)?;
        let program = backend.program();
        let (data, as_html) = match &payload.html {
            Some(html) if backend.supports_html() => (html.as_str(), true),
            _                                     => (payload.text.as_str(), false),
        };

        pipe_into(program, backend.args(as_html), data.as_bytes(), self.timeout).await?;
        tracing::info!(program, bytes = data.len(), html = as_html, "copied to clipboard");
        Ok(())
    }
}

/// Runs `program`, feeds `data` to its stdin and waits for a zero exit. The
/// write and the wait share one `limit`, so a tool that never drains its
/// stdin times out too.
async fn pipe_into(
    program: &'static str,
    args:    &[&str],
    data:    &[u8],
    limit:   Duration,
) -> Result<(), ClipboardError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ClipboardError::Spawn { program, source })?;

    let ms = limit.as_millis() as u64;
    let status = timeout(limit, async {
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(data).await?;
            // stdin is dropped here so the tool sees EOF
        }
        child.wait().await
    })
    .await
    .map_err(|_| ClipboardError::Timeout { program, ms })?
    .map_err(|source| ClipboardError::Io { program, source })?;

    if !status.success() {
        return Err(ClipboardError::Rejected { program, code: status.code() });
    }
    Ok(())
}

// ─── In-memory clipboard ──────────────────────────────────────────────────────

/// Keeps every payload it is given. Used for `--dry-run` and in tests.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    copies:    Mutex<Vec<ClipboardPayload>>,
    fail_with: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self { Self::default() }

    /// A clipboard that rejects every copy with `message`.
    #[cfg(test)]
    pub fn failing(message: &str) -> Self {
        Self { copies: Mutex::default(), fail_with: Some(message.to_owned()) }
    }

    /// Drains the recorded payloads, oldest first.
    pub fn take(&self) -> Vec<ClipboardPayload> {
        std::mem::take(&mut *self.copies.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl Clipboard for MemoryClipboard {
    async fn copy(&self, payload: &ClipboardPayload) -> Result<(), ClipboardError> {
        if let Some(msg) = &self.fail_with {
            return Err(ClipboardError::Unavailable(msg.clone()));
        }
        self.copies.lock().unwrap_or_else(|e| e.into_inner()).push(payload.clone());
        Ok(())
    }
}
