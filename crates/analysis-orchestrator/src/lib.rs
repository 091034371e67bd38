use analysis_core::{
    AnalysisError, AnalyzedProduct, Config, HistoryResponse, MarketAnalysis, ProductRecord,
};
use chrono::Utc;
use rayon::prelude::*;
use tracing::{info, warn};

/// Number of weekly windows the filter gate always evaluates against.
const FILTER_WEEK_COUNT: usize = 12;

/// Week-over-week growth percentages, most recent first, length <= 3.
fn compute_wow_growth(weeks: &[analysis_core::WeeklyMetrics]) -> Vec<f64> {
    let mut growth = Vec::new();
    for i in 0..3.min(weeks.len().saturating_sub(1)) {
        let current = weeks[i].total_sales as f64;
        let previous = weeks[i + 1].total_sales as f64;
        let pct = if previous == 0.0 {
            0.0
        } else {
            (current - previous) / previous * 100.0
        };
        growth.push(pct);
    }
    growth
}

/// Run the full per-product pipeline: decompose -> classify -> margin -> filter.
///
/// Never fails: a collaborator failure (represented by the caller passing an
/// empty history) degrades cleanly to a SIN_DATOS trend instead of
/// propagating an error, per the engine's two-strata error model.
pub fn analyze_product(
    product: &ProductRecord,
    history: &HistoryResponse,
    config: &Config,
) -> AnalyzedProduct {
    let weeks = weekly_decomposer::decompose(&history.history, FILTER_WEEK_COUNT);
    let wow_growth = compute_wow_growth(&weeks);

    let classified = trend_classifier::classify(&weeks, &wow_growth, &history.history, config);

    let total_sold: u32 = weeks.iter().map(|w| w.total_sales).sum();
    let total_days = history.history.len();

    let trend = analysis_core::TrendAnalysis {
        weeks,
        total_sold,
        total_days,
        wow_growth,
        pattern: classified.pattern,
        pattern_reason: classified.pattern_reason,
        alerts: classified.alerts,
        score: classified.score,
        peak_week: classified.peak_week,
        peak_vs_current: classified.peak_vs_current,
        weeks_with_threshold_sales: classified.weeks_with_threshold_sales,
        has_solid_history: classified.has_solid_history,
    };

    let margin = margin_calculator::compute_margin(product.provider_price, config);
    let filter = viability_filter::apply(product, &trend, &margin, config);

    AnalyzedProduct {
        product: product.clone(),
        trend,
        margin,
        filter,
        analyzed_at: Utc::now(),
    }
}

/// A collaborator-supplied history fetch failed or returned nothing usable.
/// Converted to a sentinel SIN_DATOS analysis rather than propagated — a
/// single product's ingest failure must never poison the batch.
pub fn degrade_to_sin_datos(product: &ProductRecord, cause: &AnalysisError, config: &Config) -> AnalyzedProduct {
    warn!(uuid = %product.uuid, cause = %cause, "ingest failure degraded to SIN_DATOS");
    let empty_history = HistoryResponse {
        created_at: None,
        category: None,
        provider_name: None,
        history: Vec::new(),
    };
    let mut analyzed = analyze_product(product, &empty_history, config);
    analyzed.trend.alerts.push(format!("collaborator failure: {cause}"));
    analyzed
}

/// Sequential map over a population. Each product's analysis is independent
/// and the only ordering guarantee needed downstream is the ranker's final
/// sort, so callers that want to overlap work should prefer `analyze_population_parallel`.
pub fn analyze_population(
    products: &[(ProductRecord, HistoryResponse)],
    config: &Config,
) -> Vec<AnalyzedProduct> {
    products
        .iter()
        .map(|(product, history)| {
            info!(uuid = %product.uuid, "analyzing product");
            analyze_product(product, history, config)
        })
        .collect()
}

/// Data-parallel map over a population using rayon. No cross-product
/// ordering is required; the ranker's stable sort is the only
/// synchronization point.
pub fn analyze_population_parallel(
    products: &[(ProductRecord, HistoryResponse)],
    config: &Config,
) -> Vec<AnalyzedProduct> {
    products
        .par_iter()
        .map(|(product, history)| analyze_product(product, history, config))
        .collect()
}

/// Aggregate a set of already-analyzed competitor snapshots into a market
/// verdict for a single product query.
pub fn analyze_market(query: &str, competitors: &[analysis_core::Competitor]) -> MarketAnalysis {
    market_aggregator::aggregate(query, competitors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::DailyPoint;
    use chrono::NaiveDate;

    fn product() -> ProductRecord {
        ProductRecord {
            uuid: "p1".to_string(),
            name: "Widget".to_string(),
            provider_price: 30_000,
            profit: 5_000,
            stock: 100,
            sales_7d: 60,
            sales_30d: 200,
        }
    }

    fn history_of(days: usize, sold_units: u32) -> HistoryResponse {
        let base = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        HistoryResponse {
            created_at: None,
            category: None,
            provider_name: None,
            history: (0..days)
                .map(|i| DailyPoint {
                    date: base + chrono::Duration::days(i as i64),
                    sold_units,
                    stock: None,
                    external_product_id: None,
                })
                .collect(),
        }
    }

    #[test]
    fn pipeline_runs_end_to_end_for_a_stable_seller() {
        let config = Config::default();
        let history = history_of(84, 8);
        let analyzed = analyze_product(&product(), &history, &config);
        assert!(analyzed.trend.score > 0);
        assert_eq!(analyzed.trend.weeks.len(), 12);
    }

    #[test]
    fn empty_history_degrades_cleanly_to_sin_datos() {
        let config = Config::default();
        let err = AnalysisError::IngestError("timeout".to_string());
        let analyzed = degrade_to_sin_datos(&product(), &err, &config);
        assert_eq!(analyzed.trend.pattern, analysis_core::PatternVariant::SinDatos);
        assert!(analyzed.trend.alerts.iter().any(|a| a.contains("collaborator failure")));
    }

    #[test]
    fn sequential_and_parallel_population_analysis_agree() {
        let config = Config::default();
        let products = vec![
            (product(), history_of(84, 8)),
            (
                ProductRecord { uuid: "p2".to_string(), ..product() },
                history_of(30, 2),
            ),
        ];
        let seq = analyze_population(&products, &config);
        let par = analyze_population_parallel(&products, &config);
        assert_eq!(seq.len(), par.len());
        for (a, b) in seq.iter().zip(par.iter()) {
            assert_eq!(a.trend.pattern, b.trend.pattern);
            assert_eq!(a.trend.score, b.trend.score);
        }
    }
}
