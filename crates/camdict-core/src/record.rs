use serde::{Deserialize, Serialize};

/// Phonetic text and audio URLs for both regions. Empty string means absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pronunciation {
    #[serde(rename = "AmE")]
    pub ame: String,
    #[serde(rename = "BrE")]
    pub bre: String,
    #[serde(rename = "AmEmp3")]
    pub ame_mp3: String,
    #[serde(rename = "BrEmp3")]
    pub bre_mp3: String,
}

/// Everything extracted from one dictionary page, plus the word and URL
/// it was looked up under. Built once per invocation, never mutated after.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupRecord {
    pub pronunciation: Pronunciation,
    pub image: String,
    pub thumb: String,
    pub definitions: Vec<String>,
    pub word: String,
    pub url: String,
}
