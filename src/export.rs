//! Getting a rendered card out of the program: the two clipboard copies and
//! the browser preview page.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::clipboard::{Clipboard, ClipboardError, ClipboardPayload};
use crate::markup::RenderedCalendar;

pub const DEFAULT_STATUS_DISMISS_MS: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyKind {
    /// Style block + table as `text/html` (plain-text fallback).
    Rich,
    /// The embed tag as plain text.
    Container,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Please generate the calendar first!")]
    NothingGenerated,

    #[error("Failed to copy! {0}")]
    RichCopyFailed(#[source] ClipboardError),

    #[error("Failed to copy HTML. Try again! ({0})")]
    ContainerCopyFailed(#[source] ClipboardError),
}

pub async fn copy_calendar<C: Clipboard>(
    rendered:  Option<&RenderedCalendar>,
    kind:      CopyKind,
    clipboard: &C,
) -> Result<&'static str, ExportError> {
    let rendered = rendered.ok_or(ExportError::NothingGenerated)?;
    match kind {
        CopyKind::Rich => {
            clipboard.copy(&ClipboardPayload::html(rendered.rich_html())).await
                .map_err(ExportError::RichCopyFailed)?;
            Ok("Calendar copied! Paste it into your mail client.")
        }
        CopyKind::Container => {
            clipboard.copy(&ClipboardPayload::text(rendered.embed_tag())).await
                .map_err(ExportError::ContainerCopyFailed)?;
            Ok("HTML copied to clipboard!")
        }
    }
}

/// Writes the card as a standalone page under the cache dir.
pub fn write_preview_page(rendered: &RenderedCalendar) -> Result<PathBuf> {
    let dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("calcard");
    write_preview_page_to(&dir, rendered)
}

/// Writes `preview.html` into `dir`, creating it if needed.
pub fn write_preview_page_to(dir: &Path, rendered: &RenderedCalendar) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join("preview.html");
    std::fs::write(&path, rendered.standalone_document())?;
    Ok(path)
}

pub fn open_in_browser(rendered: &RenderedCalendar) -> Result<PathBuf> {
    let path = write_preview_page(rendered)?;
    open::that(&path)?;
    tracing::info!("opened preview {}", path.display());
    Ok(path)
}

// ─── Status messages ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind { Success, Failure }

/// A transient message that disappears on its own after `ttl`.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text:     String,
    pub kind:     StatusKind,
    pub shown_at: Instant,
    pub ttl:      Duration,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>, ttl: Duration) -> Self {
        Self { text: text.into(), kind: StatusKind::Success, shown_at: Instant::now(), ttl }
    }

    pub fn failure(text: impl Into<String>, ttl: Duration) -> Self {
        Self { text: text.into(), kind: StatusKind::Failure, shown_at: Instant::now(), ttl }
    }

    pub fn from_copy(result: &Result<&'static str, ExportError>, ttl: Duration) -> Self {
        match result {
            Ok(msg)  => Self::success(*msg, ttl),
            Err(err) => Self::failure(err.to_string(), ttl),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::markup::render;
    use crate::widget::WidgetAttrs;

    const TTL: Duration = Duration::from_millis(2000);

    #[tokio::test]
    async fn copy_before_generate_fails() {
        let clip = MemoryClipboard::new();
        for kind in [CopyKind::Rich, CopyKind::Container] {
            let err = copy_calendar(None, kind, &clip).await.unwrap_err();
            assert!(matches!(err, ExportError::NothingGenerated));
            assert_eq!(err.to_string(), "Please generate the calendar first!");
        }
        assert!(clip.take().is_empty());
    }

    #[tokio::test]
    async fn rich_copy_carries_html_and_text() {
        let clip     = MemoryClipboard::new();
        let rendered = render(&WidgetAttrs::default());
        let msg = copy_calendar(Some(&rendered), CopyKind::Rich, &clip).await.unwrap();
        assert!(msg.starts_with("Calendar copied!"));

        let copies = clip.take();
        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].html.as_deref(), Some(rendered.rich_html().as_str()));
        assert_eq!(copies[0].text, rendered.rich_html());
    }

    #[tokio::test]
    async fn container_copy_is_plain_embed_tag() {
        let clip     = MemoryClipboard::new();
        let rendered = render(&WidgetAttrs::default());
        let msg = copy_calendar(Some(&rendered), CopyKind::Container, &clip).await.unwrap();
        assert_eq!(msg, "HTML copied to clipboard!");

        let copies = clip.take();
        assert_eq!(copies[0].html, None);
        assert!(copies[0].text.starts_with("<my-calendar "));
    }

    #[tokio::test]
    async fn clipboard_failure_is_reported() {
        let clip     = MemoryClipboard::failing("permission denied");
        let rendered = render(&WidgetAttrs::default());

        let rich = copy_calendar(Some(&rendered), CopyKind::Rich, &clip).await;
        let status = StatusMessage::from_copy(&rich, TTL);
        assert_eq!(status.kind, StatusKind::Failure);
        assert_eq!(status.text, "Failed to copy! permission denied");

        let raw = copy_calendar(Some(&rendered), CopyKind::Container, &clip).await;
        assert!(matches!(raw, Err(ExportError::ContainerCopyFailed(_))));
    }

    #[test]
    fn status_expires_after_ttl() {
        let status = StatusMessage::success("ok", TTL);
        assert!(!status.is_expired(status.shown_at));
        assert!(!status.is_expired(status.shown_at + Duration::from_millis(1999)));
        assert!(status.is_expired(status.shown_at + TTL));
    }

    #[test]
    fn preview_page_is_written() {
        let rendered = render(&WidgetAttrs::default());
        let dir = std::env::temp_dir().join(format!("calcard-test-{}", std::process::id()));
        let path = write_preview_page_to(&dir, &rendered).unwrap();
        assert_eq!(path, dir.join("preview.html"));
        let html = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
        assert!(html.contains("<title>January 2025</title>"));
    }
}
