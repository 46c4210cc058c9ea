pub mod config;
pub mod error;
pub mod fetch;
pub mod parse;

pub use config::FetchConfig;
pub use error::ScrapeError;
pub use fetch::Fetcher;
pub use parse::parse_page;
