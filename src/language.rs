//! Supported languages
//!
//! The set of languages is fixed: English plus three Ethiopian languages. Everything
//! about a language that the proxy or the client needs (display names, provider code,
//! speech locale) is derived from [`LanguageCode`] through the static [`LANGUAGES`] table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Speech locale used when a language code is not one of ours
pub const DEFAULT_SPEECH_LOCALE: &str = "en-US";

/// One of the four supported language codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    En,
    Am,
    Ti,
    Om,
}

/// Static description of a supported language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: LanguageCode,
    /// English name, e.g. "Amharic"
    pub display_name: &'static str,
    /// Name in the language's own script, e.g. "አማርኛ"
    pub native_name: &'static str,
    /// ISO 3166 region the language is presented with
    pub region_tag: &'static str,
}

pub const LANGUAGES: [Language; 4] = [
    Language {
        code: LanguageCode::En,
        display_name: "English",
        native_name: "English",
        region_tag: "GB",
    },
    Language {
        code: LanguageCode::Am,
        display_name: "Amharic",
        native_name: "አማርኛ",
        region_tag: "ET",
    },
    Language {
        code: LanguageCode::Ti,
        display_name: "Tigrigna",
        native_name: "ትግርኛ",
        region_tag: "ET",
    },
    Language {
        code: LanguageCode::Om,
        display_name: "Afaan Oromo",
        native_name: "Afaan Oromoo",
        region_tag: "ET",
    },
];

impl LanguageCode {
    pub const ALL: [LanguageCode; 4] = [
        LanguageCode::En,
        LanguageCode::Am,
        LanguageCode::Ti,
        LanguageCode::Om,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LanguageCode::En => "en",
            LanguageCode::Am => "am",
            LanguageCode::Ti => "ti",
            LanguageCode::Om => "om",
        }
    }

    /// Full table entry for this code
    pub fn language(self) -> &'static Language {
        match self {
            LanguageCode::En => &LANGUAGES[0],
            LanguageCode::Am => &LANGUAGES[1],
            LanguageCode::Ti => &LANGUAGES[2],
            LanguageCode::Om => &LANGUAGES[3],
        }
    }

    /// Locale tag handed to speech recognition and synthesis
    pub fn speech_locale(self) -> &'static str {
        match self {
            LanguageCode::En => "en-US",
            LanguageCode::Am => "am-ET",
            LanguageCode::Ti => "ti-ET",
            LanguageCode::Om => "om-ET",
        }
    }

    /// Code the translation provider expects for this language
    pub fn provider_code(self) -> &'static str {
        // Google Translate uses the same ISO 639-1 codes for all four
        self.as_str()
    }
}

impl Language {
    /// Regional indicator flag built from the region tag
    pub fn flag(&self) -> String {
        self.region_tag
            .chars()
            .filter_map(|c| char::from_u32(0x1F1E6 + (c as u32).wrapping_sub('A' as u32)))
            .collect()
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a code outside the supported set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported language code: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for LanguageCode {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(LanguageCode::En),
            "am" => Ok(LanguageCode::Am),
            "ti" => Ok(LanguageCode::Ti),
            "om" => Ok(LanguageCode::Om),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

/// Map a request language code to the provider's code
///
/// Known codes go through [`LanguageCode::provider_code`]; anything else passes through
/// unchanged so that new provider languages work without a release.
pub fn provider_code(code: &str) -> &str {
    match code.parse::<LanguageCode>() {
        Ok(known) if known.as_str() == code => known.provider_code(),
        _ => code,
    }
}

/// Speech locale for an arbitrary code, falling back to [`DEFAULT_SPEECH_LOCALE`]
pub fn speech_locale(code: &str) -> &'static str {
    code.parse::<LanguageCode>()
        .map(LanguageCode::speech_locale)
        .unwrap_or(DEFAULT_SPEECH_LOCALE)
}
