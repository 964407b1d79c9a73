// Entry point and high-level CLI flow.
//
// Loads all six survey exports once, then prints the figures each dashboard
// page is built from. With --out-dir the page tables and the normalized
// datasets are also written to disk.
use brand_tracker::config::{Args, Page};
use brand_tracker::loader::{LoadOutcome, LoadStatus, Session};
use brand_tracker::output::{preview_table, write_csv, write_json};
use brand_tracker::reports::{self, FtsMetric, PriceWorthMetric, GENERATIONS, HILTON, MARRIOTT};
use brand_tracker::util::{format_int, format_number};
use clap::Parser;
use log::info;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

fn export_csv<T: Serialize>(out_dir: Option<&Path>, file_name: &str, rows: &[T]) {
    if let Some(dir) = out_dir {
        let path = dir.join(file_name);
        match write_csv(&path, rows) {
            Ok(()) => info!("wrote {}", path.display()),
            Err(e) => eprintln!("Write error: {}", e),
        }
    }
}

fn handle_overview(outcome: &LoadOutcome, args: &Args, out_dir: Option<&Path>) {
    let d = &outcome.datasets;
    println!("== Overview ==\n");
    let counts = reports::dataset_overview(outcome);
    preview_table("Data sources", None, &counts, counts.len());

    let trends = reports::key_trends(&d.awareness, &d.consideration, &d.fts_recall);
    preview_table(
        "Key trends",
        Some("Hilton, audience Total"),
        &trends,
        args.preview_rows,
    );
    export_csv(out_dir, "overview_key_trends.csv", &trends);
}

fn handle_brand_spend(outcome: &LoadOutcome, args: &Args, out_dir: Option<&Path>) {
    let data = &outcome.datasets.brand_spend;
    println!("== Brand Spend ==\n");
    let stats = reports::spend_key_statistics(data);
    println!("Total marketing spend: ${}", format_number(stats.total_spend, 2));
    println!(
        "Highest spend: {} (${})",
        stats.highest_brand.as_deref().unwrap_or("-"),
        format_number(stats.highest_spend, 2)
    );
    println!(
        "Top 3 ({}): {}% of budget",
        stats.top3_brands.join(", "),
        format_number(stats.top3_share_pct, 0)
    );
    println!(
        "Average spend across {} active brands: ${}\n",
        format_int(stats.active_brands as u64),
        format_number(stats.avg_active_spend, 2)
    );

    let top = reports::top_spenders(data, 15);
    preview_table("Marketing budget", Some("Top 15 by spend"), &top, args.preview_rows);
    export_csv(out_dir, "brand_spend_top15.csv", &top);

    let dist = reports::spend_distribution(data, 8);
    preview_table("Spend distribution", Some("Top 8 brands"), &dist, args.preview_rows);
    export_csv(out_dir, "brand_spend_distribution.csv", &dist);
}

fn handle_awareness(outcome: &LoadOutcome, args: &Args, out_dir: Option<&Path>) {
    let d = &outcome.datasets;
    println!("== Awareness & Consideration ==\n");
    let f = reports::funnel_summary(&d.awareness, &d.consideration, None);
    println!(
        "{}: Hilton awareness {}%, consideration {}% (gap {})",
        f.quarter.as_deref().unwrap_or("-"),
        f.hilton_awareness,
        f.hilton_consideration,
        f.gap
    );
    println!(
        "Conversion: Hilton {}%, Marriott {}% (difference {} pts)",
        f.conversion_hilton, f.conversion_marriott, f.difference
    );
    if let Some(audience) = &f.highest_audience {
        println!("Highest Hilton awareness: {} ({}%)", audience, f.highest_audience_value);
    }
    println!();

    for brand in [HILTON, MARRIOTT] {
        let trend = reports::brand_metric_trend(&d.awareness, &d.consideration, brand);
        let note = format!("axis {} - {}", trend.domain.min, trend.domain.max);
        preview_table(
            &format!("{} awareness vs consideration", brand),
            Some(&note),
            &trend.rows,
            args.preview_rows,
        );
        export_csv(
            out_dir,
            &format!("{}_metrics_trend.csv", brand.to_lowercase()),
            &trend.rows,
        );
    }
}

fn handle_fts(outcome: &LoadOutcome, args: &Args, out_dir: Option<&Path>) {
    let data = &outcome.datasets.fts_recall;
    println!("== FTS Recall ==\n");
    let s = reports::fts_summary(data);
    println!(
        "{}: FTS association {}%, communication recall {}%",
        s.latest_quarter.as_deref().unwrap_or("-"),
        s.latest_fts,
        s.latest_recall
    );
    println!(
        "Change vs {}: {}%",
        s.previous_quarter.as_deref().unwrap_or("-"),
        format_number(s.quarterly_growth, 1)
    );
    println!(
        "Average across quarters: FTS {}%, recall {}%",
        format_number(s.avg_fts, 1),
        format_number(s.avg_recall, 1)
    );
    if let Some(audience) = &s.best_audience {
        println!("Best audience: {} ({}%)", audience, s.best_audience_value);
    }
    println!();

    for metric in [FtsMetric::Association, FtsMetric::CommunicationRecall] {
        let trend = reports::audience_trend(data, &GENERATIONS, metric);
        let note = format!("axis {} - {}", trend.domain.min, trend.domain.max);
        preview_table(&trend.title, Some(&note), &trend.rows, args.preview_rows);
        let file_name = match metric {
            FtsMetric::Association => "fts_association_by_audience.csv",
            FtsMetric::CommunicationRecall => "fts_recall_by_audience.csv",
        };
        export_csv(out_dir, file_name, &trend.rows);
    }
}

fn handle_price_worth(outcome: &LoadOutcome, args: &Args, out_dir: Option<&Path>) {
    let data = &outcome.datasets.price_worth;
    println!("== Price / Worth ==\n");
    let trend = reports::price_worth_trend(data);
    preview_table("Price/Worth trend by quarter", None, &trend, args.preview_rows);
    export_csv(out_dir, "price_worth_trend.csv", &trend);

    for metric in [PriceWorthMetric::Price, PriceWorthMetric::Worth] {
        let series = reports::hilton_by_generation(data, metric);
        let note = format!("axis {} - {}", series.domain.min, series.domain.max);
        preview_table(&series.title, Some(&note), &series.rows, args.preview_rows);
        let file_name = match metric {
            PriceWorthMetric::Price => "hilton_price_by_generation.csv",
            PriceWorthMetric::Worth => "hilton_worth_by_generation.csv",
        };
        export_csv(out_dir, file_name, &series.rows);
    }
}

fn handle_proof_of_point(outcome: &LoadOutcome, args: &Args, out_dir: Option<&Path>) {
    let data = &outcome.datasets.proof_of_point;
    println!("== Proof of Point ==\n");
    let countries = reports::proof_top_countries(data, 5);
    preview_table("Top performing countries", None, &countries, args.preview_rows);
    export_csv(out_dir, "proof_top_countries.csv", &countries);

    let categories = reports::proof_by_category(data);
    preview_table("Category performance", None, &categories, args.preview_rows);
    export_csv(out_dir, "proof_by_category.csv", &categories);

    let audiences = reports::proof_by_audience(data);
    preview_table("Audience performance", None, &audiences, args.preview_rows);
    export_csv(out_dir, "proof_by_audience.csv", &audiences);
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let session = Session::new(args.source());
    info!("status: {:?}", session.status());
    let outcome = session.load();
    if outcome.status == LoadStatus::Error {
        eprintln!(
            "{}",
            outcome.error.as_deref().unwrap_or("Failed to load data.")
        );
        return ExitCode::FAILURE;
    }

    let out_dir = args.out_dir.as_deref();
    if let Some(dir) = out_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Cannot create {}: {}", dir.display(), e);
            return ExitCode::FAILURE;
        }
        let path = dir.join("datasets.json");
        if let Err(e) = write_json(&path, &outcome.datasets) {
            eprintln!("Write error: {}", e);
        }
    }

    if args.shows(Page::Overview) {
        handle_overview(outcome, &args, out_dir);
    }
    if args.shows(Page::BrandSpend) {
        handle_brand_spend(outcome, &args, out_dir);
    }
    if args.shows(Page::Awareness) {
        handle_awareness(outcome, &args, out_dir);
    }
    if args.shows(Page::FtsRecall) {
        handle_fts(outcome, &args, out_dir);
    }
    if args.shows(Page::PriceWorth) {
        handle_price_worth(outcome, &args, out_dir);
    }
    if args.shows(Page::ProofOfPoint) {
        handle_proof_of_point(outcome, &args, out_dir);
    }
    ExitCode::SUCCESS
}
