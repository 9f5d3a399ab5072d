use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::clipboard::DEFAULT_TIMEOUT_MS;
use crate::export::DEFAULT_STATUS_DISMISS_MS;
use crate::widget::{Attributes, ATTR_DESIGN, ATTR_HIGHLIGHT, ATTR_MONTH, ATTR_SIZE, ATTR_YEAR};

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    pub defaults:  Option<DefaultsConfig>,
    pub clipboard: Option<ClipboardConfig>,
    pub ui:        Option<UiConfig>,
}

/// Initial attribute values; they go through the same sanitizing as
/// command-line and form input.
#[derive(Debug, Deserialize, Default)]
pub struct DefaultsConfig {
    pub month:          Option<u32>,
    pub year:           Option<i32>,
    pub size:           Option<u32>,
    pub design:         Option<String>,
    pub highlight_days: Option<Vec<u32>>,
}

#[derive(Debug, Deserialize)]
pub struct ClipboardConfig {
    /// "wl-copy" | "xclip" | "xsel" | "pbcopy"; detected when unset.
    pub backend:    Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct UiConfig {
    pub status_dismiss_ms: Option<u64>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(&config_dir().join("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            Ok(toml::from_str(&std::fs::read_to_string(path)?)?)
        } else {
            Ok(AppConfig::default())
        }
    }

    pub fn initial_attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        let Some(d) = &self.defaults else { return attrs };
        if let Some(m) = d.month  { attrs.insert(ATTR_MONTH.into(), m.to_string()); }
        if let Some(y) = d.year   { attrs.insert(ATTR_YEAR.into(),  y.to_string()); }
        if let Some(s) = d.size   { attrs.insert(ATTR_SIZE.into(),  s.to_string()); }
        if let Some(ref name) = d.design { attrs.insert(ATTR_DESIGN.into(), name.clone()); }
        if let Some(ref days) = d.highlight_days {
            let list = days.iter().map(u32::to_string).collect::<Vec<_>>().join(",");
            attrs.insert(ATTR_HIGHLIGHT.into(), list);
        }
        attrs
    }

    pub fn clipboard_backend(&self) -> Option<&str> {
        self.clipboard.as_ref().and_then(|c| c.backend.as_deref())
    }

    pub fn clipboard_timeout_ms(&self) -> u64 {
        self.clipboard.as_ref().and_then(|c| c.timeout_ms).unwrap_or(DEFAULT_TIMEOUT_MS)
    }

    pub fn status_ttl(&self) -> Duration {
        let ms = self.ui.as_ref().and_then(|u| u.status_dismiss_ms).unwrap_or(DEFAULT_STATUS_DISMISS_MS);
        Duration::from_millis(ms)
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("calcard")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Design;
    use crate::widget::WidgetAttrs;

    #[test]
    fn empty_config_has_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert!(cfg.initial_attributes().is_empty());
        assert_eq!(cfg.clipboard_timeout_ms(), DEFAULT_TIMEOUT_MS);
        assert_eq!(cfg.status_ttl(), Duration::from_millis(2000));
        assert_eq!(cfg.clipboard_backend(), None);
    }

    #[test]
    fn defaults_become_attributes() {
        let cfg: AppConfig = toml::from_str(r#"
            [defaults]
            month = 4
            size = 200
            design = "minimal"
            highlight_days = [14, 1]

            [clipboard]
            backend = "xsel"
            timeout_ms = 500

            [ui]
            status_dismiss_ms = 3500
        "#).unwrap();

        let attrs = WidgetAttrs::from_attributes(&cfg.initial_attributes());
        assert_eq!(attrs.month, 4);
        assert_eq!(attrs.size, 200);
        assert_eq!(attrs.design, Design::Minimal);
        assert_eq!(attrs.highlight_list(), "1,14");
        assert_eq!(cfg.clipboard_backend(), Some("xsel"));
        assert_eq!(cfg.clipboard_timeout_ms(), 500);
        assert_eq!(cfg.status_ttl(), Duration::from_millis(3500));
    }

    #[test]
    fn out_of_range_default_month_is_sanitized() {
        let cfg: AppConfig = toml::from_str("[defaults]\nmonth = 14\n").unwrap();
        assert_eq!(WidgetAttrs::from_attributes(&cfg.initial_attributes()).month, 1);
    }

    #[test]
    fn missing_file_is_default() {
        let path = std::env::temp_dir().join("calcard-test-no-such-config.toml");
        let cfg = AppConfig::load_from(&path).unwrap();
        assert!(cfg.defaults.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("calcard-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "[defaults\nmonth = ").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
