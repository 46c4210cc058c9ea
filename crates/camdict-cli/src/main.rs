use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use camdict_core::Language;
use camdict_scrape::{FetchConfig, Fetcher, parse_page};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Look up a word on Cambridge Dictionary and print the result as JSON.
#[derive(Debug, Parser)]
#[command(name = "camdict", version)]
struct Cli {
    /// Word to query
    word: String,

    /// Dictionary language (en, en-zh-s, en-zh-t)
    #[arg(long, default_value = "en", value_parser = Language::from_key)]
    lang: Language,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,

    /// Write a styled HTML file to this path
    #[arg(long)]
    html_out: Option<PathBuf>,

    /// Write CSS to this path (referenced by the HTML output)
    #[arg(long)]
    css_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only the JSON record.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let url = cli.lang.build_url(&cli.word);
    tracing::debug!(%url, lang = cli.lang.key(), "looking up word");

    let fetcher = Fetcher::new(&FetchConfig::new())?;
    let html = fetcher.fetch(&url)?;

    let mut record = parse_page(&html, cli.lang.is_english());
    record.word = cli.word;
    record.url = url;

    if let Some(html_path) = &cli.html_out {
        let css_path = match &cli.css_out {
            Some(path) => {
                fs::write(path, format!("{}\n", camdict_render::DEFAULT_CSS.trim()))
                    .with_context(|| format!("Failed to write CSS to {}", path.display()))?;
                Some(path.to_string_lossy().into_owned())
            }
            None => None,
        };
        let document = camdict_render::render_html(&record, css_path.as_deref());
        fs::write(html_path, document)
            .with_context(|| format!("Failed to write HTML to {}", html_path.display()))?;
    }

    let json = if cli.pretty {
        serde_json::to_string_pretty(&record)?
    } else {
        serde_json::to_string(&record)?
    };
    println!("{json}");

    Ok(())
}
