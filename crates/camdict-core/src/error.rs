#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unsupported language key: {0}")]
    UnsupportedLanguage(String),
}
