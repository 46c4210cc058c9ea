use crate::error::Error;

/// Dictionary editions we know how to build URLs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    EnglishChineseSimplified,
    EnglishChineseTraditional,
}

impl Language {
    /// All supported language keys, in the order shown to the user.
    pub const KEYS: [&'static str; 3] = ["en", "en-zh-s", "en-zh-t"];

    /// Parse a language key ("en", "en-zh-s", "en-zh-t").
    ///
    /// Fails before any network activity for anything else.
    pub fn from_key(key: &str) -> Result<Self, Error> {
        match key {
            "en" => Ok(Self::English),
            "en-zh-s" => Ok(Self::EnglishChineseSimplified),
            "en-zh-t" => Ok(Self::EnglishChineseTraditional),
            other => Err(Error::UnsupportedLanguage(other.to_string())),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::EnglishChineseSimplified => "en-zh-s",
            Self::EnglishChineseTraditional => "en-zh-t",
        }
    }

    /// Per-language dictionary base path. Word pages live directly under it.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::English => "https://dictionary.cambridge.org/dictionary/english/",
            Self::EnglishChineseSimplified => {
                "https://dictionary.cambridge.org/us/dictionary/english-chinese-simplified/"
            }
            Self::EnglishChineseTraditional => {
                "https://dictionary.cambridge.org/us/dictionary/english-chinese-traditional/"
            }
        }
    }

    /// The monolingual English page uses a different top-level container class.
    pub fn is_english(&self) -> bool {
        matches!(self, Self::English)
    }

    /// Page URL for a word: base path + word.
    pub fn build_url(&self, word: &str) -> String {
        format!("{}{}", self.base_url(), word)
    }
}
