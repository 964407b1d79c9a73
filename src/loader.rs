use crate::error::{FetchError, ParseError};
use crate::normalize::{
    normalize_awareness, normalize_brand_spend, normalize_consideration, normalize_fts_recall,
    normalize_price_worth, normalize_proof_of_point,
};
use crate::source::CsvSource;
use crate::types::{
    AwarenessRecord, BrandSpendRecord, Cell, ConsiderationRecord, FtsRecallRecord,
    PriceWorthRecord, ProofOfPointRecord, RawRow,
};
use crate::util::format_int;
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, Trim};
use log::{debug, error, info, warn};
use once_cell::sync::OnceCell;
use rayon::prelude::*;
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load data. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DatasetKind {
    BrandSpend,
    Consideration,
    Awareness,
    FtsRecall,
    PriceWorth,
    ProofOfPoint,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 6] = [
        DatasetKind::BrandSpend,
        DatasetKind::Consideration,
        DatasetKind::Awareness,
        DatasetKind::FtsRecall,
        DatasetKind::PriceWorth,
        DatasetKind::ProofOfPoint,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            DatasetKind::BrandSpend => "hilton_spend_by_brand.csv",
            DatasetKind::Consideration => "final_consideration.csv",
            DatasetKind::Awareness => "final_unaided_awareness.csv",
            DatasetKind::FtsRecall => "fts_association_communication_recall.csv",
            DatasetKind::PriceWorth => "price_worth_by_generation.csv",
            DatasetKind::ProofOfPoint => "hilton_proof_of_point.csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DatasetKind::BrandSpend => "Brand Spend",
            DatasetKind::Consideration => "Consideration",
            DatasetKind::Awareness => "Unaided Awareness",
            DatasetKind::FtsRecall => "FTS Recall",
            DatasetKind::PriceWorth => "Price Worth",
            DatasetKind::ProofOfPoint => "Proof of Point",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Loading,
    Ready,
    Error,
}

/// The six normalized collections. Read-only once a load has finished.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Datasets {
    pub brand_spend: Vec<BrandSpendRecord>,
    pub consideration: Vec<ConsiderationRecord>,
    pub awareness: Vec<AwarenessRecord>,
    pub fts_recall: Vec<FtsRecallRecord>,
    pub price_worth: Vec<PriceWorthRecord>,
    pub proof_of_point: Vec<ProofOfPointRecord>,
}

impl Datasets {
    pub fn count(&self, kind: DatasetKind) -> usize {
        match kind {
            DatasetKind::BrandSpend => self.brand_spend.len(),
            DatasetKind::Consideration => self.consideration.len(),
            DatasetKind::Awareness => self.awareness.len(),
            DatasetKind::FtsRecall => self.fts_recall.len(),
            DatasetKind::PriceWorth => self.price_worth.len(),
            DatasetKind::ProofOfPoint => self.proof_of_point.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        DatasetKind::ALL.iter().all(|k| self.count(*k) == 0)
    }

    fn absorb(&mut self, collection: Collection) {
        match collection {
            Collection::BrandSpend(v) => self.brand_spend = v,
            Collection::Consideration(v) => self.consideration = v,
            Collection::Awareness(v) => self.awareness = v,
            Collection::FtsRecall(v) => self.fts_recall = v,
            Collection::PriceWorth(v) => self.price_worth = v,
            Collection::ProofOfPoint(v) => self.proof_of_point = v,
        }
    }
}

/// What happened to one source during a load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReport {
    pub kind: DatasetKind,
    pub file_name: String,
    pub rows: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadOutcome {
    pub datasets: Datasets,
    pub status: LoadStatus,
    pub error: Option<String>,
    pub sources: Vec<SourceReport>,
    pub loaded_at: DateTime<Utc>,
}

impl LoadOutcome {
    fn failed(sources: Vec<SourceReport>) -> Self {
        LoadOutcome {
            datasets: Datasets::default(),
            status: LoadStatus::Error,
            error: Some(LOAD_FAILED_MESSAGE.to_string()),
            sources,
            loaded_at: Utc::now(),
        }
    }
}

enum Collection {
    BrandSpend(Vec<BrandSpendRecord>),
    Consideration(Vec<ConsiderationRecord>),
    Awareness(Vec<AwarenessRecord>),
    FtsRecall(Vec<FtsRecallRecord>),
    PriceWorth(Vec<PriceWorthRecord>),
    ProofOfPoint(Vec<ProofOfPointRecord>),
}

fn normalize_rows(kind: DatasetKind, rows: &[RawRow]) -> Collection {
    match kind {
        DatasetKind::BrandSpend => {
            Collection::BrandSpend(rows.iter().map(normalize_brand_spend).collect())
        }
        DatasetKind::Consideration => {
            Collection::Consideration(rows.iter().map(normalize_consideration).collect())
        }
        DatasetKind::Awareness => {
            Collection::Awareness(rows.iter().map(normalize_awareness).collect())
        }
        DatasetKind::FtsRecall => {
            Collection::FtsRecall(rows.iter().map(normalize_fts_recall).collect())
        }
        DatasetKind::PriceWorth => {
            Collection::PriceWorth(rows.iter().map(normalize_price_worth).collect())
        }
        DatasetKind::ProofOfPoint => {
            Collection::ProofOfPoint(rows.iter().map(normalize_proof_of_point).collect())
        }
    }
}

/// Parse header-delimited CSV text into raw rows.
///
/// The first record names the columns. Records with only blank fields are
/// skipped. A short record simply lacks the trailing columns; extra fields
/// past the header are ignored.
pub fn parse_csv_rows(file_name: &str, text: &str) -> Result<Vec<RawRow>, ParseError> {
    let wrap = |source| ParseError {
        file_name: file_name.to_string(),
        source,
    };
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());
    let headers = rdr.headers().map_err(wrap)?.clone();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(wrap)?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, field)| (header, Cell::from_csv_field(field)))
            .collect();
        rows.push(row);
    }
    debug!("{}: parsed {} rows", file_name, rows.len());
    Ok(rows)
}

#[derive(Debug, Error)]
enum SourceFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

fn fetch_and_normalize(
    source: &dyn CsvSource,
    kind: DatasetKind,
) -> Result<(usize, Collection), SourceFailure> {
    let text = source.fetch(kind.file_name())?;
    let rows = parse_csv_rows(kind.file_name(), &text)?;
    Ok((rows.len(), normalize_rows(kind, &rows)))
}

/// Fetch, parse and normalize all six datasets concurrently.
///
/// A source that cannot be fetched or parsed ends up as an empty collection
/// and the load still reports `Ready`. Only when every source fails, or the
/// fan-out itself panics, is the outcome `Error` with all collections empty.
pub fn load_all_datasets(source: &dyn CsvSource) -> LoadOutcome {
    let fanned_out = panic::catch_unwind(AssertUnwindSafe(|| {
        DatasetKind::ALL
            .par_iter()
            .map(|&kind| (kind, fetch_and_normalize(source, kind)))
            .collect::<Vec<_>>()
    }));
    let results = match fanned_out {
        Ok(results) => results,
        Err(_) => {
            error!("dataset load aborted unexpectedly");
            return LoadOutcome::failed(Vec::new());
        }
    };

    let mut datasets = Datasets::default();
    let mut sources = Vec::with_capacity(results.len());
    for (kind, result) in results {
        let file_name = kind.file_name().to_string();
        match result {
            Ok((rows, collection)) => {
                info!(
                    "{}: {} rows loaded from {}",
                    kind.label(),
                    format_int(rows as u64),
                    file_name
                );
                datasets.absorb(collection);
                sources.push(SourceReport {
                    kind,
                    file_name,
                    rows,
                    error: None,
                });
            }
            Err(e) => {
                warn!("{}: falling back to an empty dataset ({})", kind.label(), e);
                sources.push(SourceReport {
                    kind,
                    file_name,
                    rows: 0,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    if sources.iter().all(|s| s.error.is_some()) {
        error!("no dataset could be loaded");
        return LoadOutcome::failed(sources);
    }

    LoadOutcome {
        datasets,
        status: LoadStatus::Ready,
        error: None,
        sources,
        loaded_at: Utc::now(),
    }
}

/// One dashboard session: loads at most once and then serves the same
/// outcome to every page.
pub struct Session<S: CsvSource> {
    source: S,
    outcome: OnceCell<LoadOutcome>,
}

impl<S: CsvSource> Session<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            outcome: OnceCell::new(),
        }
    }

    pub fn status(&self) -> LoadStatus {
        self.outcome
            .get()
            .map(|o| o.status)
            .unwrap_or(LoadStatus::Loading)
    }

    /// Run the load on first call; later calls return the first outcome.
    pub fn load(&self) -> &LoadOutcome {
        self.outcome.get_or_init(|| load_all_datasets(&self.source))
    }

    pub fn outcome(&self) -> Option<&LoadOutcome> {
        self.outcome.get()
    }
}
