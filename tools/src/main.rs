//! forecast-runner: headless scenario runner for the sales forecast
//! simulator.
//!
//! Usage:
//!   forecast-runner --product Widget --discount 10 --scenario +5
//!   forecast-runner --data rows.json --schema families.json --compare
//!   forecast-runner --seed 7 --compare --json
//!
//! With no --data, a deterministic synthetic November dataset is
//! generated from --seed, scored by a built-in demo price-pressure
//! model. The real deployment swaps in the trained model binding.

use anyhow::{Context as _, Result};
use chrono::{Datelike, NaiveDate};
use forecast_core::context::{ScenarioOutcome, SimContext};
use forecast_core::predictor::Predictor;
use forecast_core::scenario::{CompetitorScenario, ScenarioParams};
use forecast_core::schema::{columns, FeatureFamilies};
use forecast_core::skeleton::{Dataset, DayRow};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use std::env;
use std::fs;
use std::sync::Arc;

const SIM_YEAR: i32 = 2025;
const SIM_MONTH: u32 = 11;
const SIM_DAYS: u32 = 30;

const SYNTHETIC_PRODUCTS: [(&str, f64, f64); 3] = [
    ("Trail Runner", 120.0, 14.0),
    ("City Sneaker", 85.0, 22.0),
    ("Widget", 40.0, 9.0),
];

#[derive(serde::Serialize)]
struct RunSummary<'a> {
    product: &'a str,
    discount_pct: f64,
    outcomes: &'a [ScenarioOutcome],
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let discount = parse_arg(&args, "--discount", 0.0f64);
    let compare = args.iter().any(|a| a == "--compare");
    let json = args.iter().any(|a| a == "--json");
    let scenario = competitor_scenario(str_arg(&args, "--scenario").unwrap_or("0"))?;

    let dataset = match str_arg(&args, "--data") {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading dataset {path}"))?;
            Dataset::from_json(&json)?
        }
        None => {
            log::info!("runner: no --data given, generating synthetic month from seed {seed}");
            synthetic_dataset(seed)
        }
    };

    let families: FeatureFamilies = match str_arg(&args, "--schema") {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading schema {path}"))?;
            serde_json::from_str(&json)?
        }
        None => FeatureFamilies::default(),
    };

    let predictor = Arc::new(DemandCurve::new(&dataset));
    let ctx = SimContext::new(predictor, dataset, families)?;

    let products = ctx.products();
    let default_product = products
        .first()
        .cloned()
        .context("dataset contains no products")?;
    let product = str_arg(&args, "--product").unwrap_or(&default_product);

    let outcomes: Vec<ScenarioOutcome> = if compare {
        ctx.simulate_comparison(product, discount)?
    } else {
        let params = ScenarioParams::new(discount, scenario)?;
        vec![ctx.simulate(product, &params)?]
    };

    if json {
        let summary = RunSummary {
            product,
            discount_pct: discount,
            outcomes: &outcomes,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("sales forecast simulator");
    println!("  product:   {product}");
    println!("  discount:  {discount:+.1}%");
    println!("  month:     {SIM_YEAR}-{SIM_MONTH:02}");
    println!();

    if compare {
        print_comparison(&outcomes);
    } else {
        print_days(&outcomes[0]);
        print_kpis(&outcomes[0]);
    }

    Ok(())
}

// ── Output ─────────────────────────────────────────────────

fn print_days(outcome: &ScenarioOutcome) {
    println!(
        "{:<12} {:>9} {:>11} {:>8} {:>10}",
        "date", "price", "competitor", "ma7", "predicted"
    );
    for (row, predicted) in outcome.series.days() {
        println!(
            "{:<12} {:>9.2} {:>11.2} {:>8.2} {:>10.1}",
            row.date.to_string(),
            row.get(columns::SELLING_PRICE).unwrap_or(0.0),
            row.get(columns::COMPETITOR_PRICE).unwrap_or(0.0),
            row.get(columns::UNITS_MA7).unwrap_or(0.0),
            predicted,
        );
    }
    println!();
    for event in &outcome.series.fallbacks {
        println!(
            "  recovered: day {} ({}) fell back to {:.1} ({})",
            event.day + 1,
            event.date,
            event.value,
            event.reason
        );
    }
}

fn print_kpis(outcome: &ScenarioOutcome) {
    let m = &outcome.metrics;
    println!("scenario: {}", outcome.params.competitor.label());
    println!("  total units:   {:>10.0}", m.total_units);
    println!("  total revenue: {:>10.2}", m.total_revenue);
    println!("  avg price:     {:>10.2}", m.avg_price);
    println!("  avg discount:  {:>10.1}%", m.avg_discount);
}

fn print_comparison(outcomes: &[ScenarioOutcome]) {
    println!(
        "{:<18} {:>12} {:>14} {:>10}",
        "scenario", "units", "revenue", "avg price"
    );
    for outcome in outcomes {
        let m = &outcome.metrics;
        println!(
            "{:<18} {:>12.0} {:>14.2} {:>10.2}",
            outcome.params.competitor.label(),
            m.total_units,
            m.total_revenue,
            m.avg_price,
        );
    }
}

// ── Argument parsing ───────────────────────────────────────

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn competitor_scenario(arg: &str) -> Result<CompetitorScenario> {
    match arg {
        "-5" => Ok(CompetitorScenario::CompetitorsDown5),
        "0" => Ok(CompetitorScenario::Actual),
        "+5" | "5" => Ok(CompetitorScenario::CompetitorsUp5),
        other => anyhow::bail!("unknown --scenario '{other}' (expected -5, 0, or +5)"),
    }
}

// ── Synthetic data and demo model ──────────────────────────

fn slug(product: &str) -> String {
    product.to_lowercase().replace(' ', "_")
}

/// Deterministic synthetic skeleton for the simulated month. All
/// jitter comes from the seeded generator; nothing calls a platform
/// RNG.
fn synthetic_dataset(seed: u64) -> Dataset {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let mut rows = Vec::new();

    for (product, base_price, base_demand) in SYNTHETIC_PRODUCTS {
        for day in 1..=SIM_DAYS {
            let date = NaiveDate::from_ymd_opt(SIM_YEAR, SIM_MONTH, day).unwrap();
            let competitor = base_price * (0.92 + 0.16 * next_f64(&mut rng));
            let mut row = DayRow::new(product, date)
                .with(columns::DAY_OF_MONTH, day as f64)
                .with(
                    columns::DAY_OF_WEEK,
                    date.weekday().number_from_monday() as f64,
                )
                .with(columns::BASE_PRICE, base_price)
                .with(columns::SELLING_PRICE, base_price)
                .with(columns::COMPETITOR_PRICE, competitor)
                .with(columns::DISCOUNT_PCT, 0.0)
                .with(columns::PRICE_RATIO, base_price / competitor)
                .with(&format!("product_{}", slug(product)), 1.0);

            // Seed day one with plausible recent history; later days
            // get their lags from the forecaster.
            if day == 1 {
                let mut sum = 0.0;
                for d in 1..=7 {
                    let units = base_demand * (0.8 + 0.4 * next_f64(&mut rng));
                    row.set(&columns::lag(d), units);
                    sum += units;
                }
                row.set(columns::UNITS_MA7, sum / 7.0);
            }
            rows.push(row);
        }
    }

    Dataset::new(rows)
}

fn next_f64(rng: &mut Pcg64Mcg) -> f64 {
    use rand::RngCore;
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Demo stand-in for the trained model: demand persists through
/// yesterday's sales and the weekly average, and reacts to how our
/// price compares to the competition.
struct DemandCurve {
    names: Vec<String>,
    lag1: usize,
    ma7: usize,
    ratio: usize,
    product_offsets: Vec<(usize, f64)>,
}

impl DemandCurve {
    fn new(dataset: &Dataset) -> Self {
        let mut names = vec![
            columns::DAY_OF_MONTH.to_string(),
            columns::DAY_OF_WEEK.to_string(),
            columns::SELLING_PRICE.to_string(),
            columns::COMPETITOR_PRICE.to_string(),
            columns::PRICE_RATIO.to_string(),
            columns::DISCOUNT_PCT.to_string(),
        ];
        for d in 1..=7 {
            names.push(columns::lag(d));
        }
        names.push(columns::UNITS_MA7.to_string());
        for product in dataset.products() {
            names.push(format!("product_{}", slug(&product)));
        }

        let index = |name: &str| names.iter().position(|n| n == name).unwrap();
        let lag1 = index(&columns::lag(1));
        let ma7 = index(columns::UNITS_MA7);
        let ratio = index(columns::PRICE_RATIO);
        let product_offsets = dataset
            .products()
            .iter()
            .enumerate()
            .map(|(i, product)| (index(&format!("product_{}", slug(product))), 2.0 + i as f64))
            .collect();

        Self {
            names,
            lag1,
            ma7,
            ratio,
            product_offsets,
        }
    }
}

impl Predictor for DemandCurve {
    fn declared_feature_names(&self) -> &[String] {
        &self.names
    }

    fn predict(&self, features: &[f64]) -> anyhow::Result<f64> {
        let persistence = 0.45 * features[self.lag1] + 0.35 * features[self.ma7];
        let pressure = 12.0 * (1.1 - features[self.ratio]);
        let offset: f64 = self
            .product_offsets
            .iter()
            .map(|(idx, value)| features[*idx] * value)
            .sum();
        Ok(persistence + pressure + offset)
    }
}
