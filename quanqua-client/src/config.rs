//! Client configuration from the environment

use crate::history::HISTORY_STORAGE_KEY;
use crate::translator::TranslatorSettings;
use std::path::PathBuf;

pub const PROXY_URL_VAR: &str = "QUANQUA_PROXY_URL";
pub const DATA_DIR_VAR: &str = "QUANQUA_DATA_DIR";

pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:3000";
/// Used when neither `QUANQUA_DATA_DIR` nor `HOME` is set
pub const FALLBACK_DATA_DIR: &str = ".quanqua";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin of the translation proxy
    pub proxy_url: String,
    /// Directory holding persisted history
    pub data_dir: PathBuf,
    pub history_key: String,
    pub settings: TranslatorSettings,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let data_dir = match non_blank(DATA_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => match non_blank("HOME") {
                Some(home) => PathBuf::from(home).join(FALLBACK_DATA_DIR),
                None => PathBuf::from(FALLBACK_DATA_DIR),
            },
        };

        Self {
            proxy_url: non_blank(PROXY_URL_VAR).unwrap_or_else(|| DEFAULT_PROXY_URL.to_string()),
            data_dir,
            history_key: HISTORY_STORAGE_KEY.to_string(),
            settings: TranslatorSettings::default(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
