use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::session::DEFAULT_REPLY_DELAY;

pub const CONTENT_DIR_VAR: &str = "FOLIO_CONTENT_DIR";
pub const REPLY_DELAY_VAR: &str = "FOLIO_REPLY_DELAY_MS";
pub const OWNER_NAME_VAR: &str = "FOLIO_OWNER_NAME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub content_dir: PathBuf,
    pub reply_delay: Duration,
    /// Overrides the profile name in the chat header.
    pub owner_name: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            reply_delay: DEFAULT_REPLY_DELAY,
            owner_name: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(dir) = get(CONTENT_DIR_VAR) {
            settings.content_dir = PathBuf::from(dir);
        }

        if let Some(ms) = get(REPLY_DELAY_VAR) {
            let ms: u64 = ms
                .trim()
                .parse()
                .with_context(|| format!("{REPLY_DELAY_VAR} must be a whole number of milliseconds, got {ms:?}"))?;
            settings.reply_delay = Duration::from_millis(ms);
        }

        settings.owner_name = get(OWNER_NAME_VAR).map(|name| name.trim().to_string());

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(settings(&[]).unwrap(), Settings::default());
        assert_eq!(Settings::default().reply_delay, Duration::from_millis(1000));
    }

    #[test]
    fn reads_overrides() {
        let s = settings(&[
            (CONTENT_DIR_VAR, "/srv/site/content"),
            (REPLY_DELAY_VAR, " 250 "),
            (OWNER_NAME_VAR, " Ada "),
        ])
        .unwrap();

        assert_eq!(s.content_dir, PathBuf::from("/srv/site/content"));
        assert_eq!(s.reply_delay, Duration::from_millis(250));
        assert_eq!(s.owner_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn blank_values_keep_defaults() {
        let s = settings(&[(OWNER_NAME_VAR, "  "), (REPLY_DELAY_VAR, "")]).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn rejects_bad_delay() {
        let err = settings(&[(REPLY_DELAY_VAR, "soon")]).unwrap_err();
        assert!(err.to_string().contains(REPLY_DELAY_VAR));
    }
}
