pub mod error;
pub mod language;
pub mod record;

pub use error::Error;
pub use language::Language;
pub use record::{LookupRecord, Pronunciation};

/// Site root, used to resolve relative audio and image URLs.
pub const CAMBRIDGE_BASE: &str = "https://dictionary.cambridge.org/";
