use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::source::{CsvSource, DirSource, HttpSource};

/// Which page summaries to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Page {
    Overview,
    BrandSpend,
    Awareness,
    FtsRecall,
    PriceWorth,
    ProofOfPoint,
    All,
}

/// Brand-tracking survey dashboard: loads the six survey exports and prints
/// the per-page summaries.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding the CSV exports. Ignored when --base-url is set.
    #[arg(long, env = "BRAND_TRACKER_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Base URL the CSV exports are served from, e.g. http://localhost:5173
    #[arg(long, env = "BRAND_TRACKER_BASE_URL")]
    pub base_url: Option<String>,

    /// Page to summarize.
    #[arg(long, value_enum, default_value_t = Page::All)]
    pub page: Page,

    /// Rows shown per table preview.
    #[arg(long, default_value_t = 5)]
    pub preview_rows: usize,

    /// If set, page tables (CSV) and normalized datasets (JSON) are written here.
    #[arg(long, env = "BRAND_TRACKER_OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Turn on debug logging.
    #[arg(long)]
    pub verbose: bool,
}

impl Args {
    pub fn source(&self) -> Box<dyn CsvSource> {
        match &self.base_url {
            Some(url) => Box::new(HttpSource::new(url.clone())),
            None => Box::new(DirSource::new(self.data_dir.clone())),
        }
    }

    pub fn shows(&self, page: Page) -> bool {
        self.page == Page::All || self.page == page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults_and_flags() {
        let args = Args::try_parse_from(["brand-tracker", "--data-dir", "exports"]).unwrap();
        assert_eq!(args.data_dir, PathBuf::from("exports"));
        assert_eq!(args.page, Page::All);
        assert_eq!(args.preview_rows, 5);
        assert!(args.shows(Page::FtsRecall));

        let args = Args::try_parse_from([
            "brand-tracker",
            "--page",
            "price-worth",
            "--preview-rows",
            "3",
            "--verbose",
        ])
        .unwrap();
        assert_eq!(args.page, Page::PriceWorth);
        assert!(args.shows(Page::PriceWorth));
        assert!(!args.shows(Page::Overview));
        assert!(args.verbose);
    }

    #[test]
    fn rejects_unknown_page() {
        assert!(Args::try_parse_from(["brand-tracker", "--page", "settings"]).is_err());
    }
}
