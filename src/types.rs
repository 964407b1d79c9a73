use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tabled::Tabled;

use crate::util::{fmt_money, fmt_opt_pct, fmt_pct, truncate_label};

/// A single CSV cell after dynamic typing.
///
/// A column that is missing from a row is not a `Cell` at all: it is the
/// absence of a key in [`RawRow`]. `Null` means the column exists but the
/// cell was empty.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Type a raw CSV field: empty -> `Null`, a complete decimal literal ->
    /// `Number`, anything else -> trimmed `Text`.
    pub fn from_csv_field(raw: &str) -> Cell {
        let s = raw.trim();
        if s.is_empty() {
            return Cell::Null;
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Text(s.to_string()),
        }
    }

    pub fn from_json(value: &Value) -> Cell {
        match value {
            Value::Null => Cell::Null,
            Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Null),
            Value::String(s) => Cell::Text(s.clone()),
            Value::Bool(b) => Cell::Text(b.to_string()),
            other => Cell::Text(other.to_string()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

/// One CSV row keyed by header name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    fields: HashMap<String, Cell>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, cell: impl Into<Cell>) {
        self.fields.insert(key.into(), cell.into());
    }

    pub fn get(&self, key: &str) -> Option<&Cell> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a row from a JSON object, e.g. an exported canonical record.
    /// Non-object values give an empty row.
    pub fn from_json(value: &Value) -> RawRow {
        match value {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| (k.clone(), Cell::from_json(v)))
                .collect(),
            _ => RawRow::new(),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Cell)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, Cell)>>(iter: I) -> Self {
        RawRow {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

pub const UNAIDED_AWARENESS: &str = "Unaided Awareness";
pub const CONSIDERATION: &str = "Consideration";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandSpendRecord {
    pub brand: String,
    pub spend: f64,
    pub year: i32,
    pub quarter: String,
    pub category: String,
}

/// Shared shape of the awareness and consideration datasets; `category`
/// tells them apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandMetricRecord {
    pub brand: String,
    pub value: f64,
    pub audience: Option<String>,
    pub quarter: Option<String>,
    pub category: String,
}

pub type AwarenessRecord = BrandMetricRecord;
pub type ConsiderationRecord = BrandMetricRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FtsRecallRecord {
    pub value: f64,
    pub audience: String,
    pub quarter: String,
    pub communication_recall: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceWorthRecord {
    pub audience: String,
    pub quarter: String,
    pub hilton_price: f64,
    pub marriott_price: f64,
    pub hilton_worth: f64,
    pub marriott_worth: f64,
}

/// `value` is always a 0-100 percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofOfPointRecord {
    pub brand: String,
    pub value: f64,
    pub audience: Option<String>,
    pub country: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

/// Padded `[min, max]` range for a chart axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisDomain {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendStats {
    pub total_spend: f64,
    pub highest_brand: Option<String>,
    pub highest_spend: f64,
    pub top3_brands: Vec<String>,
    pub top3_share_pct: f64,
    pub avg_active_spend: f64,
    pub active_brands: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct SpendRankRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Brand")]
    #[tabled(rename = "Brand", display_with = "truncate_label")]
    pub brand: String,
    #[serde(rename = "Spend")]
    #[tabled(rename = "Spend", display_with = "fmt_money")]
    pub spend: f64,
    #[serde(rename = "SharePct")]
    #[tabled(rename = "SharePct", display_with = "fmt_pct")]
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelSummary {
    pub quarter: Option<String>,
    pub hilton_awareness: f64,
    pub hilton_consideration: f64,
    pub gap: f64,
    pub conversion_hilton: f64,
    pub conversion_marriott: f64,
    pub difference: f64,
    pub highest_audience: Option<String>,
    pub highest_audience_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct BrandTrendRow {
    #[serde(rename = "Quarter")]
    #[tabled(rename = "Quarter")]
    pub quarter: String,
    #[serde(rename = "Awareness")]
    #[tabled(rename = "Awareness", display_with = "fmt_opt_pct")]
    pub awareness: Option<f64>,
    #[serde(rename = "Consideration")]
    #[tabled(rename = "Consideration", display_with = "fmt_opt_pct")]
    pub consideration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandTrend {
    pub brand: String,
    pub rows: Vec<BrandTrendRow>,
    pub domain: AxisDomain,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FtsSummary {
    pub latest_quarter: Option<String>,
    pub previous_quarter: Option<String>,
    pub avg_fts: f64,
    pub avg_recall: f64,
    pub latest_fts: f64,
    pub latest_recall: f64,
    pub quarterly_growth: f64,
    pub best_audience: Option<String>,
    pub best_audience_value: f64,
}

/// Long-format series point: one value per (quarter, series).
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct SeriesPointRow {
    #[serde(rename = "Quarter")]
    #[tabled(rename = "Quarter")]
    pub quarter: String,
    #[serde(rename = "Series")]
    #[tabled(rename = "Series")]
    pub series: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value", display_with = "fmt_pct")]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesTrend {
    pub title: String,
    pub rows: Vec<SeriesPointRow>,
    pub domain: AxisDomain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct PriceWorthTrendRow {
    #[serde(rename = "Quarter")]
    #[tabled(rename = "Quarter")]
    pub quarter: String,
    #[serde(rename = "HiltonPrice")]
    #[tabled(rename = "HiltonPrice", display_with = "fmt_pct")]
    pub hilton_price: f64,
    #[serde(rename = "MarriottPrice")]
    #[tabled(rename = "MarriottPrice", display_with = "fmt_pct")]
    pub marriott_price: f64,
    #[serde(rename = "HiltonWorth")]
    #[tabled(rename = "HiltonWorth", display_with = "fmt_pct")]
    pub hilton_worth: f64,
    #[serde(rename = "MarriottWorth")]
    #[tabled(rename = "MarriottWorth", display_with = "fmt_pct")]
    pub marriott_worth: f64,
    #[serde(rename = "HiltonRatio")]
    #[tabled(rename = "HiltonRatio", display_with = "fmt_pct")]
    pub hilton_ratio: f64,
    #[serde(rename = "MarriottRatio")]
    #[tabled(rename = "MarriottRatio", display_with = "fmt_pct")]
    pub marriott_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct GroupAverageRow {
    #[serde(rename = "Group")]
    #[tabled(rename = "Group")]
    pub group: String,
    #[serde(rename = "Average")]
    #[tabled(rename = "Average", display_with = "fmt_pct")]
    pub average: f64,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct KeyTrendRow {
    #[serde(rename = "Quarter")]
    #[tabled(rename = "Quarter")]
    pub quarter: String,
    #[serde(rename = "Awareness")]
    #[tabled(rename = "Awareness", display_with = "fmt_pct")]
    pub awareness: f64,
    #[serde(rename = "Consideration")]
    #[tabled(rename = "Consideration", display_with = "fmt_pct")]
    pub consideration: f64,
    #[serde(rename = "Fts")]
    #[tabled(rename = "Fts", display_with = "fmt_pct")]
    pub fts: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct DatasetCountRow {
    #[serde(rename = "Dataset")]
    #[tabled(rename = "Dataset")]
    pub dataset: String,
    #[serde(rename = "File")]
    #[tabled(rename = "File")]
    pub file_name: String,
    #[serde(rename = "Records")]
    #[tabled(rename = "Records")]
    pub records: usize,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
}
