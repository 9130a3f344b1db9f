use crate::filter::KeywordFilter;
use crate::models::Credentials;
use crate::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Operator knobs on the command line; secrets stay in the environment
#[derive(Parser, Debug)]
#[command(name = "orderbot", about = "Claims portal orders matching a keyword allow-list")]
pub struct Cli {
    /// CSV file with one order title per row (first column)
    #[arg(long, default_value = "keywords.csv")]
    pub keywords: PathBuf,

    /// Seconds to sleep between polling cycles
    #[arg(long, default_value_t = 60)]
    pub poll_interval_secs: u64,

    /// Session cookie snapshot location
    #[arg(long, default_value = "cookies.json")]
    pub session_file: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Fully resolved runtime configuration
///
/// Environment (via `.env`): `SCRAPER_USERNAME`, `SCRAPER_PASSWORD`,
/// `SHOW_BROWSER` ("true" keeps the window visible), `WEBDRIVER_URL`.
#[derive(Debug)]
pub struct Config {
    pub credentials: Credentials,
    pub keywords: Vec<String>,
    pub headless: bool,
    pub webdriver_url: String,
    pub poll_interval: Duration,
    pub session_file: PathBuf,
    pub verbose: bool,
}

impl Config {
    /// Resolve CLI flags, `.env`, and the keyword file. Anything missing
    /// here should stop the process before a browser ever starts.
    pub fn load() -> Result<Self> {
        // A missing .env is fine; the variables may come from the shell
        let _ = dotenvy::dotenv();
        Self::from_cli(Cli::parse())
    }

    fn from_cli(cli: Cli) -> Result<Self> {
        let username =
            std::env::var("SCRAPER_USERNAME").map_err(|_| "SCRAPER_USERNAME not set")?;
        let password =
            std::env::var("SCRAPER_PASSWORD").map_err(|_| "SCRAPER_PASSWORD not set")?;

        let show_browser = std::env::var("SHOW_BROWSER")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let webdriver_url = std::env::var("WEBDRIVER_URL")
            .unwrap_or_else(|_| DEFAULT_WEBDRIVER_URL.to_string());

        let keywords = read_keywords(&cli.keywords)?;

        Ok(Self {
            credentials: Credentials { username, password },
            keywords,
            headless: !show_browser,
            webdriver_url,
            poll_interval: Duration::from_secs(cli.poll_interval_secs),
            session_file: cli.session_file,
            verbose: cli.verbose,
        })
    }

    pub fn keyword_filter(&self) -> KeywordFilter {
        KeywordFilter::new(self.keywords.iter().cloned())
    }
}

/// First column of every non-empty row; an empty list is a startup error
/// because the bot would silently claim nothing
pub fn read_keywords(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| format!("cannot read keyword file {}: {}", path.display(), e))?;

    let mut keywords = Vec::new();
    for row in reader.records() {
        let row = row?;
        if let Some(first) = row.get(0) {
            if !first.trim().is_empty() {
                keywords.push(first.to_string());
            }
        }
    }

    if keywords.is_empty() {
        return Err(format!("keyword file {} contains no keywords", path.display()).into());
    }

    Ok(keywords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_keywords_first_column() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "epic run,ignored note").unwrap();
        writeln!(file, "duo boost").unwrap();
        file.flush().unwrap();

        let keywords = read_keywords(file.path()).unwrap();
        assert_eq!(keywords, vec!["epic run", "duo boost"]);
    }

    #[test]
    fn test_read_keywords_skips_blank_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "epic run").unwrap();
        writeln!(file, "   ").unwrap();
        writeln!(file, "placement games").unwrap();
        file.flush().unwrap();

        let keywords = read_keywords(file.path()).unwrap();
        assert_eq!(keywords, vec!["epic run", "placement games"]);
    }

    #[test]
    fn test_empty_keyword_file_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(read_keywords(file.path()).is_err());
    }

    #[test]
    fn test_missing_keyword_file_is_an_error() {
        assert!(read_keywords(Path::new("/nonexistent/keywords.csv")).is_err());
    }
}
