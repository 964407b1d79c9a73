use crate::loader::{DatasetKind, LoadOutcome};
use crate::metrics::{
    axis_domain, dated_quarters, distinct_quarters, group_average, qoq_delta, round_half_up,
    round_to, share_pct, top_n,
};
use crate::types::{
    AwarenessRecord, BrandMetricRecord, BrandSpendRecord, BrandTrend, BrandTrendRow,
    ConsiderationRecord, DatasetCountRow, FtsRecallRecord, FtsSummary, FunnelSummary,
    GroupAverageRow, KeyTrendRow, PriceWorthRecord, PriceWorthTrendRow, ProofOfPointRecord,
    SeriesPointRow, SeriesTrend, SpendRankRow, SpendStats, CONSIDERATION, UNAIDED_AWARENESS,
};
use crate::util::average;
use std::collections::BTreeMap;

pub const HILTON: &str = "Hilton";
pub const MARRIOTT: &str = "Marriott";
pub const TOTAL_AUDIENCE: &str = "Total";
pub const GENERATIONS: [&str; 3] = ["Millennials", "Gen X", "Boomers"];
const UNKNOWN_GROUP: &str = "Unknown";

// ---------------------------------------------------------------------------
// Brand spend
// ---------------------------------------------------------------------------

pub fn spend_key_statistics(data: &[BrandSpendRecord]) -> SpendStats {
    let total_spend: f64 = data.iter().map(|r| r.spend).sum();
    let sorted = top_n(data, data.len(), |r| r.spend);
    let top3 = &sorted[..sorted.len().min(3)];
    let top3_spend: f64 = top3.iter().map(|r| r.spend).sum();
    let active_brands = data.iter().filter(|r| r.spend > 0.0).count();
    SpendStats {
        total_spend,
        highest_brand: sorted.first().map(|r| r.brand.clone()),
        highest_spend: sorted.first().map(|r| r.spend).unwrap_or(0.0),
        top3_brands: top3.iter().map(|r| r.brand.clone()).collect(),
        top3_share_pct: share_pct(top3_spend, total_spend),
        avg_active_spend: if active_brands > 0 {
            total_spend / active_brands as f64
        } else {
            0.0
        },
        active_brands,
    }
}

fn rank_rows(ranked: Vec<(String, f64)>, total: f64) -> Vec<SpendRankRow> {
    ranked
        .into_iter()
        .enumerate()
        .map(|(idx, (brand, spend))| SpendRankRow {
            rank: idx + 1,
            brand,
            spend,
            share_pct: share_pct(spend, total),
        })
        .collect()
}

/// The `n` largest spend records, one row per record.
pub fn top_spenders(data: &[BrandSpendRecord], n: usize) -> Vec<SpendRankRow> {
    let total: f64 = data.iter().map(|r| r.spend).sum();
    let ranked = top_n(data, n, |r| r.spend)
        .into_iter()
        .map(|r| (r.brand, r.spend))
        .collect();
    rank_rows(ranked, total)
}

/// Spend summed per brand, the `n` largest brands.
pub fn spend_distribution(data: &[BrandSpendRecord], n: usize) -> Vec<SpendRankRow> {
    let mut by_brand: BTreeMap<&str, f64> = BTreeMap::new();
    for r in data {
        *by_brand.entry(r.brand.as_str()).or_insert(0.0) += r.spend;
    }
    let total: f64 = by_brand.values().sum();
    let summed: Vec<(String, f64)> = by_brand
        .into_iter()
        .map(|(brand, spend)| (brand.to_string(), spend))
        .collect();
    rank_rows(top_n(&summed, n, |r| r.1), total)
}

// ---------------------------------------------------------------------------
// Awareness and consideration
// ---------------------------------------------------------------------------

fn rounded_average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        round_half_up(average(values))
    }
}

fn brand_values<'a, I>(records: I, brand: &str) -> Vec<f64>
where
    I: IntoIterator<Item = &'a BrandMetricRecord>,
{
    records
        .into_iter()
        .filter(|r| r.brand == brand)
        .map(|r| r.value)
        .collect()
}

fn latest_quarter<'a, I>(quarters: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    dated_quarters(quarters).pop()
}

/// Awareness-to-consideration funnel for one quarter (latest when `None`).
pub fn funnel_summary(
    awareness: &[AwarenessRecord],
    consideration: &[ConsiderationRecord],
    quarter: Option<&str>,
) -> FunnelSummary {
    let quarter = match quarter {
        Some(q) => Some(q.to_string()),
        None => latest_quarter(
            awareness
                .iter()
                .chain(consideration.iter())
                .filter_map(|r| r.quarter.as_deref()),
        ),
    };
    let in_quarter = |r: &&BrandMetricRecord| r.quarter.as_deref() == quarter.as_deref();

    let aware: Vec<&AwarenessRecord> = awareness
        .iter()
        .filter(in_quarter)
        .filter(|r| r.category == UNAIDED_AWARENESS)
        .collect();
    let consider: Vec<&ConsiderationRecord> = consideration.iter().filter(in_quarter).collect();

    let hilton_awareness = rounded_average(&brand_values(aware.iter().copied(), HILTON));
    let hilton_consideration = rounded_average(&brand_values(consider.iter().copied(), HILTON));
    let marriott_awareness = rounded_average(&brand_values(aware.iter().copied(), MARRIOTT));
    let marriott_consideration =
        rounded_average(&brand_values(consider.iter().copied(), MARRIOTT));

    let conversion = |cons: f64, aw: f64| if aw > 0.0 { cons / aw * 100.0 } else { 0.0 };
    let conversion_hilton = conversion(hilton_consideration, hilton_awareness);
    let conversion_marriott = conversion(marriott_consideration, marriott_awareness);

    let mut highest_audience = None;
    let mut highest_value = 0.0;
    for r in aware.iter().filter(|r| r.brand == HILTON) {
        if let Some(audience) = &r.audience {
            if r.value > highest_value {
                highest_value = r.value;
                highest_audience = Some(audience.clone());
            }
        }
    }

    FunnelSummary {
        quarter,
        hilton_awareness,
        hilton_consideration,
        gap: hilton_consideration - hilton_awareness,
        conversion_hilton: round_to(conversion_hilton, 1),
        conversion_marriott: round_to(conversion_marriott, 1),
        difference: round_to(conversion_marriott - conversion_hilton, 1),
        highest_audience,
        highest_audience_value: round_half_up(highest_value),
    }
}

/// Quarterly awareness and consideration averages for one brand.
pub fn brand_metric_trend(
    awareness: &[AwarenessRecord],
    consideration: &[ConsiderationRecord],
    brand: &str,
) -> BrandTrend {
    let aware: Vec<&AwarenessRecord> = awareness
        .iter()
        .filter(|r| r.brand == brand && r.category == UNAIDED_AWARENESS)
        .collect();
    let consider: Vec<&ConsiderationRecord> = consideration
        .iter()
        .filter(|r| r.brand == brand && r.category == CONSIDERATION)
        .collect();

    let quarters = distinct_quarters(
        aware
            .iter()
            .chain(consider.iter())
            .filter_map(|r| r.quarter.as_deref()),
    );

    let quarter_average = |records: &[&BrandMetricRecord], quarter: &str| {
        let values: Vec<f64> = records
            .iter()
            .filter(|r| r.quarter.as_deref() == Some(quarter))
            .map(|r| r.value)
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(round_half_up(average(&values)))
        }
    };

    let rows: Vec<BrandTrendRow> = quarters
        .into_iter()
        .map(|quarter| BrandTrendRow {
            awareness: quarter_average(aware.as_slice(), quarter.as_str()),
            consideration: quarter_average(consider.as_slice(), quarter.as_str()),
            quarter,
        })
        .collect();
    let plotted: Vec<f64> = rows
        .iter()
        .flat_map(|r| [r.awareness, r.consideration])
        .flatten()
        .collect();

    BrandTrend {
        brand: brand.to_string(),
        domain: axis_domain(&plotted),
        rows,
    }
}

// ---------------------------------------------------------------------------
// FTS association and communication recall
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FtsMetric {
    Association,
    CommunicationRecall,
}

impl FtsMetric {
    fn of(self, r: &FtsRecallRecord) -> f64 {
        match self {
            FtsMetric::Association => r.value,
            FtsMetric::CommunicationRecall => r.communication_recall,
        }
    }

    fn title(self) -> &'static str {
        match self {
            FtsMetric::Association => "FTS association by audience",
            FtsMetric::CommunicationRecall => "Communication recall by audience",
        }
    }
}

pub fn fts_summary(data: &[FtsRecallRecord]) -> FtsSummary {
    let mut quarters = dated_quarters(data.iter().map(|r| r.quarter.as_str()));
    let latest_quarter = quarters.pop();
    let previous_quarter = quarters.pop();

    let totals: Vec<&FtsRecallRecord> = data
        .iter()
        .filter(|r| r.audience == TOTAL_AUDIENCE)
        .collect();
    let total_in = |quarter: &Option<String>| {
        quarter
            .as_deref()
            .and_then(|q| totals.iter().find(|r| r.quarter == q))
    };
    let latest = total_in(&latest_quarter);
    let previous = total_in(&previous_quarter);

    let latest_fts = latest.map(|r| r.value).unwrap_or(0.0);
    let previous_fts = previous.map(|r| r.value).unwrap_or(0.0);

    let mut best_audience = None;
    let mut best_value = 0.0;
    for r in data.iter().filter(|r| {
        Some(r.quarter.as_str()) == latest_quarter.as_deref() && r.audience != TOTAL_AUDIENCE
    }) {
        if r.value > best_value {
            best_value = r.value;
            best_audience = Some(r.audience.clone());
        }
    }

    FtsSummary {
        avg_fts: average(&totals.iter().map(|r| r.value).collect::<Vec<_>>()),
        avg_recall: average(&totals.iter().map(|r| r.communication_recall).collect::<Vec<_>>()),
        latest_fts,
        latest_recall: latest.map(|r| r.communication_recall).unwrap_or(0.0),
        quarterly_growth: qoq_delta(latest_fts, previous_fts),
        best_audience,
        best_audience_value: best_value,
        latest_quarter,
        previous_quarter,
    }
}

/// One series per audience, in the order given. When a quarter repeats an
/// audience the last row wins.
pub fn audience_trend(data: &[FtsRecallRecord], audiences: &[&str], metric: FtsMetric) -> SeriesTrend {
    let mut points: BTreeMap<(usize, &str), f64> = BTreeMap::new();
    for r in data {
        if let Some(pos) = audiences.iter().position(|a| *a == r.audience) {
            points.insert((pos, r.quarter.as_str()), metric.of(r));
        }
    }
    let quarters = distinct_quarters(points.keys().map(|(_, q)| *q));
    let mut rows = Vec::new();
    for quarter in &quarters {
        for (pos, audience) in audiences.iter().enumerate() {
            if let Some(v) = points.get(&(pos, quarter.as_str())) {
                rows.push(SeriesPointRow {
                    quarter: quarter.clone(),
                    series: audience.to_string(),
                    value: *v,
                });
            }
        }
    }
    let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
    SeriesTrend {
        title: metric.title().to_string(),
        domain: axis_domain(&values),
        rows,
    }
}

// ---------------------------------------------------------------------------
// Price / worth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceWorthMetric {
    Price,
    Worth,
}

/// Quarterly averages across audiences, plus worth-to-price ratios.
pub fn price_worth_trend(data: &[PriceWorthRecord]) -> Vec<PriceWorthTrendRow> {
    distinct_quarters(data.iter().map(|r| r.quarter.as_str()))
        .into_iter()
        .map(|quarter| {
            let rows: Vec<&PriceWorthRecord> =
                data.iter().filter(|r| r.quarter == quarter).collect();
            let avg = |f: fn(&PriceWorthRecord) -> f64| {
                average(&rows.iter().map(|&r| f(r)).collect::<Vec<_>>())
            };
            let hilton_price = avg(|r| r.hilton_price);
            let marriott_price = avg(|r| r.marriott_price);
            let hilton_worth = avg(|r| r.hilton_worth);
            let marriott_worth = avg(|r| r.marriott_worth);
            PriceWorthTrendRow {
                quarter,
                hilton_price,
                marriott_price,
                hilton_worth,
                marriott_worth,
                hilton_ratio: share_pct(hilton_worth, hilton_price),
                marriott_ratio: share_pct(marriott_worth, marriott_price),
            }
        })
        .collect()
}

/// Hilton price or worth perception per generation over time.
pub fn hilton_by_generation(data: &[PriceWorthRecord], metric: PriceWorthMetric) -> SeriesTrend {
    let mut rows = Vec::new();
    for quarter in distinct_quarters(data.iter().map(|r| r.quarter.as_str())) {
        for generation in GENERATIONS {
            let found = data
                .iter()
                .find(|r| r.quarter == quarter && r.audience == generation);
            if let Some(r) = found {
                rows.push(SeriesPointRow {
                    quarter: quarter.clone(),
                    series: generation.to_string(),
                    value: match metric {
                        PriceWorthMetric::Price => r.hilton_price,
                        PriceWorthMetric::Worth => r.hilton_worth,
                    },
                });
            }
        }
    }
    let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
    SeriesTrend {
        title: match metric {
            PriceWorthMetric::Price => "Hilton price perception by generation".to_string(),
            PriceWorthMetric::Worth => "Hilton worth perception by generation".to_string(),
        },
        domain: axis_domain(&values),
        rows,
    }
}

// ---------------------------------------------------------------------------
// Proof of point
// ---------------------------------------------------------------------------

fn group_label(field: &Option<String>) -> String {
    field.clone().unwrap_or_else(|| UNKNOWN_GROUP.to_string())
}

fn ranked_groups<K>(data: &[ProofOfPointRecord], key: K, n: usize) -> Vec<GroupAverageRow>
where
    K: Fn(&ProofOfPointRecord) -> String,
{
    let groups = group_average(data, key, |r| r.value);
    top_n(&groups, n, |g| g.average)
}

pub fn proof_top_countries(data: &[ProofOfPointRecord], n: usize) -> Vec<GroupAverageRow> {
    ranked_groups(data, |r| group_label(&r.country), n)
}

pub fn proof_by_category(data: &[ProofOfPointRecord]) -> Vec<GroupAverageRow> {
    ranked_groups(data, |r| group_label(&r.category), usize::MAX)
}

pub fn proof_by_audience(data: &[ProofOfPointRecord]) -> Vec<GroupAverageRow> {
    ranked_groups(data, |r| group_label(&r.audience), usize::MAX)
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

/// Hilton awareness, consideration and FTS association for the `Total`
/// audience, one row per quarter seen in any of the three datasets.
pub fn key_trends(
    awareness: &[AwarenessRecord],
    consideration: &[ConsiderationRecord],
    fts: &[FtsRecallRecord],
) -> Vec<KeyTrendRow> {
    let is_total = |audience: &Option<String>| audience.as_deref() == Some(TOTAL_AUDIENCE);
    let quarters = distinct_quarters(
        awareness
            .iter()
            .chain(consideration.iter())
            .filter_map(|r| r.quarter.as_deref())
            .chain(fts.iter().map(|r| r.quarter.as_str())),
    );

    quarters
        .into_iter()
        .map(|quarter| {
            let in_quarter = |r: &&BrandMetricRecord| {
                r.quarter.as_deref() == Some(quarter.as_str())
                    && r.brand == HILTON
                    && is_total(&r.audience)
            };
            let aware: Vec<f64> = awareness
                .iter()
                .filter(in_quarter)
                .filter(|r| r.category == UNAIDED_AWARENESS)
                .map(|r| r.value)
                .collect();
            let consider: Vec<f64> = consideration
                .iter()
                .filter(in_quarter)
                .map(|r| r.value)
                .collect();
            let fts_values: Vec<f64> = fts
                .iter()
                .filter(|r| r.quarter == quarter && r.audience == TOTAL_AUDIENCE)
                .map(|r| r.value)
                .collect();
            KeyTrendRow {
                awareness: round_half_up(average(&aware)),
                consideration: round_half_up(average(&consider)),
                fts: round_half_up(average(&fts_values)),
                quarter,
            }
        })
        .collect()
}

/// Record counts per dataset alongside whether its source loaded.
pub fn dataset_overview(outcome: &LoadOutcome) -> Vec<DatasetCountRow> {
    DatasetKind::ALL
        .iter()
        .map(|&kind| {
            let failed = outcome
                .sources
                .iter()
                .find(|s| s.kind == kind)
                .map(|s| s.error.is_some())
                .unwrap_or(true);
            DatasetCountRow {
                dataset: kind.label().to_string(),
                file_name: kind.file_name().to_string(),
                records: outcome.datasets.count(kind),
                status: if failed { "failed" } else { "loaded" }.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AxisDomain;

    fn spend(brand: &str, spend: f64) -> BrandSpendRecord {
        BrandSpendRecord {
            brand: brand.to_string(),
            spend,
            year: 2023,
            quarter: "Q4".to_string(),
            category: "Marketing".to_string(),
        }
    }

    fn metric(brand: &str, value: f64, audience: &str, quarter: &str, category: &str) -> BrandMetricRecord {
        BrandMetricRecord {
            brand: brand.to_string(),
            value,
            audience: Some(audience.to_string()),
            quarter: Some(quarter.to_string()),
            category: category.to_string(),
        }
    }

    fn fts(audience: &str, quarter: &str, value: f64, recall: f64) -> FtsRecallRecord {
        FtsRecallRecord {
            value,
            audience: audience.to_string(),
            quarter: quarter.to_string(),
            communication_recall: recall,
        }
    }

    fn pw(audience: &str, quarter: &str, hp: f64, mp: f64, hw: f64, mw: f64) -> PriceWorthRecord {
        PriceWorthRecord {
            audience: audience.to_string(),
            quarter: quarter.to_string(),
            hilton_price: hp,
            marriott_price: mp,
            hilton_worth: hw,
            marriott_worth: mw,
        }
    }

    fn proof(country: Option<&str>, category: &str, value: f64) -> ProofOfPointRecord {
        ProofOfPointRecord {
            brand: HILTON.to_string(),
            value,
            audience: None,
            country: country.map(str::to_string),
            category: Some(category.to_string()),
            subcategory: None,
        }
    }

    #[test]
    fn spend_statistics() {
        let data = vec![
            spend("Hampton", 400.0),
            spend("Conrad", 100.0),
            spend("Waldorf", 300.0),
            spend("Tru", 0.0),
            spend("Curio", 200.0),
        ];
        let stats = spend_key_statistics(&data);
        assert_eq!(stats.total_spend, 1000.0);
        assert_eq!(stats.highest_brand.as_deref(), Some("Hampton"));
        assert_eq!(stats.highest_spend, 400.0);
        assert_eq!(stats.top3_brands, vec!["Hampton", "Waldorf", "Curio"]);
        assert_eq!(stats.top3_share_pct, 90.0);
        assert_eq!(stats.active_brands, 4);
        assert_eq!(stats.avg_active_spend, 250.0);
    }

    #[test]
    fn spend_statistics_of_nothing() {
        let stats = spend_key_statistics(&[]);
        assert_eq!(stats.total_spend, 0.0);
        assert_eq!(stats.highest_brand, None);
        assert_eq!(stats.top3_share_pct, 0.0);
        assert_eq!(stats.avg_active_spend, 0.0);
    }

    #[test]
    fn spend_rankings() {
        let data = vec![
            spend("Hampton", 100.0),
            spend("Conrad", 50.0),
            spend("Hampton", 100.0),
            spend("Tru", 50.0),
        ];
        let top = top_spenders(&data, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].rank, 1);
        assert_eq!(top[0].brand, "Hampton");
        assert!((top[0].share_pct - 100.0 / 3.0).abs() < 1e-9);

        let dist = spend_distribution(&data, 8);
        assert_eq!(dist.len(), 3);
        assert_eq!(dist[0].brand, "Hampton");
        assert_eq!(dist[0].spend, 200.0);
        // Ties keep brand-name order.
        assert_eq!(dist[1].brand, "Conrad");
        assert_eq!(dist[2].brand, "Tru");
    }

    #[test]
    fn funnel_for_latest_quarter() {
        let awareness = vec![
            metric(HILTON, 84.0, "Total", "Q4 2023", UNAIDED_AWARENESS),
            metric(HILTON, 86.0, "Frequent Travelers", "Q4 2023", UNAIDED_AWARENESS),
            metric(MARRIOTT, 80.0, "Total", "Q4 2023", UNAIDED_AWARENESS),
            metric(HILTON, 99.0, "Total", "Q3 2023", UNAIDED_AWARENESS),
            metric(HILTON, 99.0, "Total", "Q4 2023", "Aided Awareness"),
        ];
        let consideration = vec![
            metric(HILTON, 72.0, "Total", "Q4 2023", CONSIDERATION),
            metric(MARRIOTT, 64.0, "Total", "Q4 2023", CONSIDERATION),
        ];
        let f = funnel_summary(&awareness, &consideration, None);
        assert_eq!(f.quarter.as_deref(), Some("Q4 2023"));
        assert_eq!(f.hilton_awareness, 85.0);
        assert_eq!(f.hilton_consideration, 72.0);
        assert_eq!(f.gap, -13.0);
        assert_eq!(f.conversion_hilton, 84.7);
        assert_eq!(f.conversion_marriott, 80.0);
        assert_eq!(f.difference, -4.7);
        assert_eq!(f.highest_audience.as_deref(), Some("Frequent Travelers"));
        assert_eq!(f.highest_audience_value, 86.0);
    }

    #[test]
    fn funnel_without_awareness_does_not_divide_by_zero() {
        let consideration = vec![metric(HILTON, 72.0, "Total", "Q4 2023", CONSIDERATION)];
        let f = funnel_summary(&[], &consideration, Some("Q4 2023"));
        assert_eq!(f.conversion_hilton, 0.0);
        assert_eq!(f.highest_audience, None);
    }

    #[test]
    fn brand_trend_orders_quarters_and_pads_domain() {
        let awareness = vec![
            metric(MARRIOTT, 30.0, "Total", "Q1 2023", UNAIDED_AWARENESS),
            metric(MARRIOTT, 31.0, "Gen X", "Q1 2023", UNAIDED_AWARENESS),
            metric(MARRIOTT, 28.0, "Total", "Q4 2022", UNAIDED_AWARENESS),
            metric(HILTON, 90.0, "Total", "Q4 2022", UNAIDED_AWARENESS),
        ];
        let consideration = vec![metric(MARRIOTT, 55.0, "Total", "Q1 2023", CONSIDERATION)];
        let t = brand_metric_trend(&awareness, &consideration, MARRIOTT);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0].quarter, "Q4 2022");
        assert_eq!(t.rows[0].awareness, Some(28.0));
        assert_eq!(t.rows[0].consideration, None);
        assert_eq!(t.rows[1].awareness, Some(31.0));
        assert_eq!(t.rows[1].consideration, Some(55.0));
        assert_eq!(t.domain, AxisDomain { min: 23.0, max: 60.0 });
    }

    #[test]
    fn fts_summary_growth_and_best_audience() {
        let data = vec![
            fts("Total", "Q4 2022", 50.0, 40.0),
            fts("Total", "Q1 2023", 60.0, 44.0),
            fts("Millennials", "Q1 2023", 65.0, 48.0),
            fts("Gen X", "Q1 2023", 58.0, 41.0),
            fts("Millennials", "Q4 2022", 90.0, 10.0),
        ];
        let s = fts_summary(&data);
        assert_eq!(s.latest_quarter.as_deref(), Some("Q1 2023"));
        assert_eq!(s.previous_quarter.as_deref(), Some("Q4 2022"));
        assert_eq!(s.avg_fts, 55.0);
        assert_eq!(s.avg_recall, 42.0);
        assert_eq!(s.latest_fts, 60.0);
        assert_eq!(s.latest_recall, 44.0);
        assert_eq!(s.quarterly_growth, 20.0);
        assert_eq!(s.best_audience.as_deref(), Some("Millennials"));
        assert_eq!(s.best_audience_value, 65.0);
    }

    #[test]
    fn fts_summary_of_single_quarter_has_no_growth() {
        let s = fts_summary(&[fts("Total", "Q1 2023", 60.0, 44.0)]);
        assert_eq!(s.previous_quarter, None);
        assert_eq!(s.quarterly_growth, 0.0);
        let empty = fts_summary(&[]);
        assert_eq!(empty.latest_quarter, None);
        assert_eq!(empty.avg_fts, 0.0);
    }

    #[test]
    fn audience_trend_follows_requested_order() {
        let data = vec![
            fts("Gen X", "Q1 2023", 20.0, 41.0),
            fts("Millennials", "Q1 2023", 30.0, 48.0),
            fts("Millennials", "Q4 2022", 25.0, 45.0),
            fts("Total", "Q4 2022", 22.0, 43.0),
        ];
        let t = audience_trend(&data, &["Millennials", "Gen X"], FtsMetric::CommunicationRecall);
        let labels: Vec<(&str, &str)> = t
            .rows
            .iter()
            .map(|r| (r.quarter.as_str(), r.series.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("Q4 2022", "Millennials"),
                ("Q1 2023", "Millennials"),
                ("Q1 2023", "Gen X"),
            ]
        );
        assert_eq!(t.domain, AxisDomain { min: 36.0, max: 53.0 });
    }

    #[test]
    fn price_worth_averages_and_ratios() {
        let data = vec![
            pw("Millennials", "Q1 2023", 60.0, 50.0, 20.0, 25.0),
            pw("Gen X", "Q1 2023", 40.0, 50.0, 20.0, 15.0),
            pw("Boomers", "Q4 2022", 0.0, 0.0, 10.0, 10.0),
        ];
        let trend = price_worth_trend(&data);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].quarter, "Q4 2022");
        assert_eq!(trend[0].hilton_ratio, 0.0);
        assert_eq!(trend[1].hilton_price, 50.0);
        assert_eq!(trend[1].hilton_worth, 20.0);
        assert_eq!(trend[1].hilton_ratio, 40.0);
        assert_eq!(trend[1].marriott_ratio, 40.0);
    }

    #[test]
    fn hilton_by_generation_series() {
        let data = vec![
            pw("Boomers", "Q1 2023", 61.0, 0.0, 25.0, 0.0),
            pw("Millennials", "Q1 2023", 58.0, 0.0, 19.0, 0.0),
            pw("Total", "Q1 2023", 99.0, 0.0, 99.0, 0.0),
            pw("Gen X", "Q4 2022", 63.0, 0.0, 22.0, 0.0),
        ];
        let t = hilton_by_generation(&data, PriceWorthMetric::Worth);
        let series: Vec<&str> = t.rows.iter().map(|r| r.series.as_str()).collect();
        assert_eq!(series, vec!["Gen X", "Millennials", "Boomers"]);
        assert_eq!(t.domain, AxisDomain { min: 14.0, max: 30.0 });
    }

    #[test]
    fn proof_groupings() {
        let data = vec![
            proof(Some("India"), "Service", 34.0),
            proof(Some("UK"), "Service", 26.0),
            proof(Some("Saudi Arabia"), "Trust", 41.0),
            proof(Some("India"), "Trust", 36.0),
            proof(None, "Trust", 10.0),
        ];
        let top = proof_top_countries(&data, 2);
        assert_eq!(top[0].group, "Saudi Arabia");
        assert_eq!(top[1].group, "India");
        assert_eq!(top[1].average, 35.0);
        assert_eq!(top[1].count, 2);

        let categories = proof_by_category(&data);
        assert_eq!(categories[0].group, "Service");
        assert_eq!(categories[0].average, 30.0);
        let audiences = proof_by_audience(&data);
        assert_eq!(audiences.len(), 1);
        assert_eq!(audiences[0].group, "Unknown");
    }

    #[test]
    fn key_trends_use_total_audience() {
        let awareness = vec![
            metric(HILTON, 84.6, "Total", "Q1 2023", UNAIDED_AWARENESS),
            metric(HILTON, 10.0, "Gen X", "Q1 2023", UNAIDED_AWARENESS),
        ];
        let consideration = vec![metric(HILTON, 71.0, "Total", "Q2 2023", CONSIDERATION)];
        let fts_data = vec![fts("Total", "Q1 2023", 19.0, 44.0)];
        let rows = key_trends(&awareness, &consideration, &fts_data);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].quarter, "Q1 2023");
        assert_eq!(rows[0].awareness, 85.0);
        assert_eq!(rows[0].consideration, 0.0);
        assert_eq!(rows[0].fts, 19.0);
        assert_eq!(rows[1].consideration, 71.0);
    }

    #[test]
    fn funnel_latest_quarter_skips_unparseable_labels() {
        let awareness = vec![
            metric(HILTON, 84.0, "Total", "Q4 2023", UNAIDED_AWARENESS),
            metric(HILTON, 56.0, "Total", "n/a", UNAIDED_AWARENESS),
        ];
        let f = funnel_summary(&awareness, &[], None);
        assert_eq!(f.quarter.as_deref(), Some("Q4 2023"));
        assert_eq!(f.hilton_awareness, 84.0);

        let garbled = vec![metric(HILTON, 56.0, "Total", "n/a", UNAIDED_AWARENESS)];
        assert_eq!(funnel_summary(&garbled, &[], None).quarter, None);
    }

    #[test]
    fn fts_summary_ignores_rows_with_blank_quarter() {
        let data = vec![
            fts(TOTAL_AUDIENCE, "Q3 2024", 40.0, 20.0),
            fts(TOTAL_AUDIENCE, "Q4 2024", 50.0, 25.0),
            fts("Gen X", "Q4 2024", 55.0, 30.0),
            fts("Gen Z", "", 12.0, 5.0),
        ];
        let s = fts_summary(&data);
        assert_eq!(s.latest_quarter.as_deref(), Some("Q4 2024"));
        assert_eq!(s.previous_quarter.as_deref(), Some("Q3 2024"));
        assert_eq!(s.latest_fts, 50.0);
        assert_eq!(s.quarterly_growth, 25.0);
        assert_eq!(s.best_audience.as_deref(), Some("Gen X"));

        let s = fts_summary(&[fts("Gen Z", "", 12.0, 5.0)]);
        assert_eq!(s.latest_quarter, None);
        assert_eq!(s.latest_fts, 0.0);
        assert_eq!(s.quarterly_growth, 0.0);
        assert_eq!(s.best_audience, None);
    }
}
