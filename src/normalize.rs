// Row normalizers: one raw CSV row in, one canonical record out.
//
// Each dataset was exported with its own header conventions, so every field
// lists the column names it has been seen under, canonical name last. A row
// is never rejected: bad numbers become 0 and missing text falls back to a
// default.
use crate::types::{
    AwarenessRecord, BrandMetricRecord, BrandSpendRecord, Cell, ConsiderationRecord,
    FtsRecallRecord, PriceWorthRecord, ProofOfPointRecord, RawRow, CONSIDERATION,
    UNAIDED_AWARENESS,
};
use crate::util::{lookup, parse_numeric, resolve_opt_text, resolve_text, NumericFormat};

const DEFAULT_SPEND_YEAR: i32 = 2023;
const DEFAULT_SPEND_QUARTER: &str = "Q4";
const DEFAULT_SPEND_CATEGORY: &str = "Marketing";
const DEFAULT_PROOF_BRAND: &str = "Hilton";

const AUDIENCE: &[&str] = &["Audience", "audience"];
const QUARTER: &[&str] = &["Quarter", "quarter"];

fn numeric(row: &RawRow, candidates: &[&str]) -> f64 {
    parse_numeric(lookup(row, candidates), NumericFormat::Plain)
}

fn percentage(row: &RawRow, candidates: &[&str]) -> f64 {
    numeric(row, candidates).clamp(0.0, 100.0)
}

pub fn normalize_brand_spend(row: &RawRow) -> BrandSpendRecord {
    let spend = parse_numeric(lookup(row, &["Spend", "spend"]), NumericFormat::Thousands);
    let year = match lookup(row, &["Year", "year"]) {
        None => DEFAULT_SPEND_YEAR,
        Some(cell) => parse_numeric(Some(cell), NumericFormat::Plain).trunc() as i32,
    };
    BrandSpendRecord {
        brand: resolve_text(row, &["Brand", "brand"], ""),
        spend: spend.max(0.0),
        year,
        quarter: resolve_text(row, QUARTER, DEFAULT_SPEND_QUARTER),
        category: resolve_text(row, &["Category", "category"], DEFAULT_SPEND_CATEGORY),
    }
}

fn normalize_brand_metric(row: &RawRow, default_category: &str) -> BrandMetricRecord {
    BrandMetricRecord {
        brand: resolve_text(row, &["Hotel", "Brand", "brand"], ""),
        value: numeric(row, &["Value", "value"]),
        audience: resolve_opt_text(row, AUDIENCE),
        quarter: resolve_opt_text(row, QUARTER),
        category: resolve_text(row, &["Feature", "Category", "category"], default_category),
    }
}

pub fn normalize_consideration(row: &RawRow) -> ConsiderationRecord {
    normalize_brand_metric(row, CONSIDERATION)
}

pub fn normalize_awareness(row: &RawRow) -> AwarenessRecord {
    normalize_brand_metric(row, UNAIDED_AWARENESS)
}

pub fn normalize_fts_recall(row: &RawRow) -> FtsRecallRecord {
    FtsRecallRecord {
        value: numeric(row, &["FTS Association (%)", "FTS Association", "value"]),
        audience: resolve_text(row, AUDIENCE, ""),
        quarter: resolve_text(row, QUARTER, ""),
        communication_recall: numeric(
            row,
            &[
                "Communication Recall (%)",
                "Communication Recall",
                "communicationRecall",
            ],
        ),
    }
}

pub fn normalize_price_worth(row: &RawRow) -> PriceWorthRecord {
    PriceWorthRecord {
        audience: resolve_text(row, AUDIENCE, ""),
        quarter: resolve_text(row, &["Trimestre", "Quarter", "quarter"], ""),
        hilton_price: percentage(row, &["Hilton Price", "hiltonPrice"]),
        marriott_price: percentage(row, &["Marriott Price", "marriottPrice"]),
        hilton_worth: percentage(row, &["Hilton Worth", "hiltonWorth"]),
        marriott_worth: percentage(row, &["Marriott Worth", "marriottWorth"]),
    }
}

/// `Percentage` holds 0-1 fractions unless the cell itself carries a `%`;
/// `Value`/`value` already hold 0-100 percentages.
fn proof_value(row: &RawRow) -> f64 {
    if let Some(cell) = row.get("Percentage") {
        let v = parse_numeric(Some(cell), NumericFormat::Plain);
        return match cell {
            Cell::Text(s) if s.contains('%') => v,
            _ => v * 100.0,
        };
    }
    numeric(row, &["Value", "value"])
}

pub fn normalize_proof_of_point(row: &RawRow) -> ProofOfPointRecord {
    ProofOfPointRecord {
        brand: resolve_text(row, &["Brand", "brand"], DEFAULT_PROOF_BRAND),
        value: proof_value(row),
        audience: resolve_opt_text(row, AUDIENCE),
        country: resolve_opt_text(row, &["Country Name", "Country", "country"]),
        category: resolve_opt_text(row, &["Category", "category"]),
        subcategory: resolve_opt_text(row, &["Subcategory", "subcategory"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    fn row(pairs: &[(&str, Cell)]) -> RawRow {
        pairs.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn reingest<T: Serialize>(record: &T) -> RawRow {
        RawRow::from_json(&serde_json::to_value(record).unwrap())
    }

    #[test]
    fn brand_spend_applies_source_defaults() {
        let r = normalize_brand_spend(&row(&[
            ("Brand", text("Hampton")),
            ("Spend", text("1,250,000")),
        ]));
        assert_eq!(r.brand, "Hampton");
        assert_eq!(r.spend, 1_250_000.0);
        assert_eq!(r.year, 2023);
        assert_eq!(r.quarter, "Q4");
        assert_eq!(r.category, "Marketing");
    }

    #[test]
    fn brand_spend_never_negative() {
        let r = normalize_brand_spend(&row(&[("Spend", Cell::Number(-20.0))]));
        assert_eq!(r.spend, 0.0);
        assert_eq!(r.brand, "");
    }

    #[test]
    fn brand_spend_reads_optional_period_columns() {
        let r = normalize_brand_spend(&row(&[
            ("brand", text("Conrad")),
            ("spend", Cell::Number(10.0)),
            ("Year", Cell::Number(2022.0)),
            ("Quarter", text("Q2")),
            ("Category", text("Digital")),
        ]));
        assert_eq!(r.year, 2022);
        assert_eq!(r.quarter, "Q2");
        assert_eq!(r.category, "Digital");
    }

    #[test]
    fn awareness_maps_hotel_and_feature() {
        let r = normalize_awareness(&row(&[
            ("Hotel", text("Hilton")),
            ("Value", text("29%")),
            ("Audience", text("Total")),
            ("Quarter", text("Q4 2023")),
            ("Feature", text("Unaided Awareness")),
        ]));
        assert_eq!(r.brand, "Hilton");
        assert_eq!(r.value, 29.0);
        assert_eq!(r.audience.as_deref(), Some("Total"));
        assert_eq!(r.quarter.as_deref(), Some("Q4 2023"));
        assert_eq!(r.category, UNAIDED_AWARENESS);
    }

    #[test]
    fn consideration_defaults_category_tag_only_when_missing() {
        let r = normalize_consideration(&row(&[("Hotel", text("Marriott"))]));
        assert_eq!(r.category, CONSIDERATION);
        assert_eq!(r.value, 0.0);
        assert_eq!(r.audience, None);

        // Present text is kept verbatim (case-sensitive), only trimmed.
        let r = normalize_consideration(&row(&[("Feature", text(" consideration "))]));
        assert_eq!(r.category, "consideration");
    }

    #[test]
    fn fts_recall_reads_percent_columns() {
        let r = normalize_fts_recall(&row(&[
            ("FTS Association (%)", text("19%")),
            ("Communication Recall (%)", Cell::Number(44.0)),
            ("Audience", text("Gen X")),
            ("Quarter", text("Q1 2023")),
        ]));
        assert_eq!(r.value, 19.0);
        assert_eq!(r.communication_recall, 44.0);
        assert_eq!(r.audience, "Gen X");
        assert_eq!(r.quarter, "Q1 2023");
    }

    #[test]
    fn price_worth_reads_trimestre_and_clamps() {
        let r = normalize_price_worth(&row(&[
            ("Audience", text("Millennials")),
            ("Trimestre", text("Q3 2023")),
            ("Hilton Price", text("61%")),
            ("Marriott Price", text("140")),
            ("Hilton Worth", text("-3")),
            ("Marriott Worth", text("garbled")),
        ]));
        assert_eq!(r.quarter, "Q3 2023");
        assert_eq!(r.hilton_price, 61.0);
        assert_eq!(r.marriott_price, 100.0);
        assert_eq!(r.hilton_worth, 0.0);
        assert_eq!(r.marriott_worth, 0.0);
    }

    #[test]
    fn proof_of_point_converts_fractions_to_percentages() {
        let r = normalize_proof_of_point(&row(&[
            ("Percentage", Cell::Number(0.41)),
            ("Country", text("Saudi Arabia")),
        ]));
        assert!((r.value - 41.0).abs() < 1e-9);
        assert_eq!(r.brand, "Hilton");
        assert_eq!(r.country.as_deref(), Some("Saudi Arabia"));

        let r = normalize_proof_of_point(&row(&[("Percentage", text("33%"))]));
        assert_eq!(r.value, 33.0);

        let r = normalize_proof_of_point(&row(&[("Value", Cell::Number(0.5))]));
        assert_eq!(r.value, 0.5);
    }

    #[test]
    fn proof_of_point_prefers_country_name() {
        let r = normalize_proof_of_point(&row(&[
            ("Country Name", text("India")),
            ("Country", text("IN")),
            ("Subcategory", text("Trust")),
        ]));
        assert_eq!(r.country.as_deref(), Some("India"));
        assert_eq!(r.subcategory.as_deref(), Some("Trust"));
        assert_eq!(r.category, None);
    }

    #[test]
    fn garbage_rows_normalize_instead_of_dropping() {
        let empty = RawRow::new();
        assert_eq!(normalize_fts_recall(&empty).value, 0.0);
        assert_eq!(normalize_price_worth(&empty).hilton_price, 0.0);
        assert_eq!(normalize_proof_of_point(&empty).value, 0.0);
        assert_eq!(normalize_awareness(&empty).brand, "");
    }

    #[test]
    fn canonical_records_round_trip() {
        let spend = normalize_brand_spend(&row(&[
            ("Brand", text("Hampton")),
            ("Spend", text("12,000.5")),
        ]));
        assert_eq!(normalize_brand_spend(&reingest(&spend)), spend);

        let awareness = normalize_awareness(&row(&[
            ("Hotel", text("Hilton")),
            ("Value", text("85%")),
            ("Quarter", text("Q4 2023")),
        ]));
        assert_eq!(normalize_awareness(&reingest(&awareness)), awareness);

        let consideration = normalize_consideration(&row(&[
            ("Hotel", text("Marriott")),
            ("Value", Cell::Number(56.0)),
            ("Audience", text("Total")),
        ]));
        assert_eq!(normalize_consideration(&reingest(&consideration)), consideration);

        let fts = normalize_fts_recall(&row(&[
            ("FTS Association (%)", text("19%")),
            ("Communication Recall (%)", text("44%")),
            ("Audience", text("Total")),
            ("Quarter", text("Q2 2023")),
        ]));
        assert_eq!(normalize_fts_recall(&reingest(&fts)), fts);

        let pw = normalize_price_worth(&row(&[
            ("Audience", text("Boomers")),
            ("Trimestre", text("Q1 2023")),
            ("Hilton Price", text("58.3%")),
            ("Marriott Worth", text("18.7%")),
        ]));
        assert_eq!(normalize_price_worth(&reingest(&pw)), pw);

        let pop = normalize_proof_of_point(&row(&[
            ("Percentage", Cell::Number(0.26)),
            ("Country", text("UK")),
            ("Category", text("Service")),
        ]));
        assert_eq!(normalize_proof_of_point(&reingest(&pop)), pop);
    }
}
