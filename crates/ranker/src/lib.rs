use analysis_core::{AnalyzedProduct, FilterStats, PatternGroup, PopulationSummary};

const TOP_NAMES_PER_PATTERN: usize = 5;

/// Order the passed products, group the whole population by pattern, and
/// produce the filter-stats histogram. The trend score IS the rank key —
/// no further derived "final score" is computed.
pub fn rank_and_summarize(
    population: &[AnalyzedProduct],
) -> (Vec<AnalyzedProduct>, FilterStats, PopulationSummary) {
    let mut ranked: Vec<AnalyzedProduct> = population
        .iter()
        .filter(|p| p.filter.passed)
        .cloned()
        .collect();
    ranked.sort_by(|a, b| b.trend.score.cmp(&a.trend.score));

    let stats = filter_stats(population);
    let summary = population_summary(population);

    (ranked, stats, summary)
}

fn filter_stats(population: &[AnalyzedProduct]) -> FilterStats {
    let total = population.len();
    let passed = population.iter().filter(|p| p.filter.passed).count();
    let discarded = total - passed;
    let discard_histogram =
        viability_filter::summarize_discard_reasons(population.iter().map(|p| &p.filter));

    FilterStats {
        total,
        passed,
        discarded,
        discard_histogram,
    }
}

fn population_summary(population: &[AnalyzedProduct]) -> PopulationSummary {
    let mut by_pattern: std::collections::HashMap<String, Vec<&AnalyzedProduct>> =
        std::collections::HashMap::new();

    for product in population {
        by_pattern
            .entry(product.trend.pattern.label().to_string())
            .or_default()
            .push(product);
    }

    let mut groups = std::collections::HashMap::new();
    for (pattern, mut products) in by_pattern {
        products.sort_by(|a, b| b.trend.score.cmp(&a.trend.score));
        let top_names = products
            .iter()
            .take(TOP_NAMES_PER_PATTERN)
            .map(|p| p.product.name.clone())
            .collect();
        groups.insert(
            pattern,
            PatternGroup {
                count: products.len(),
                top_names,
            },
        );
    }

    PopulationSummary { by_pattern: groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{FilterResult, MarginData, PatternVariant, ProductRecord, TrendAnalysis, WeeklyMetrics};
    use chrono::Utc;
    use std::collections::HashMap;

    fn product(name: &str, score: u8, passed: bool) -> AnalyzedProduct {
        let weeks: Vec<WeeklyMetrics> = (0..12)
            .map(|i| WeeklyMetrics {
                week_index: i,
                total_sales: 60,
                days_with_sales: 6,
                avg_daily: 60.0 / 7.0,
                max_daily: 12,
                min_daily: 5,
                consistency_pct: 85.0,
            })
            .collect();
        AnalyzedProduct {
            product: ProductRecord {
                uuid: name.to_string(),
                name: name.to_string(),
                provider_price: 30_000,
                profit: 10_000,
                stock: 50,
                sales_7d: 60,
                sales_30d: 200,
            },
            trend: TrendAnalysis {
                weeks,
                total_sold: 720,
                total_days: 84,
                wow_growth: vec![0.0, 0.0, 0.0],
                pattern: PatternVariant::Estable,
                pattern_reason: "stable".to_string(),
                alerts: vec![],
                score,
                peak_week: 0,
                peak_vs_current: 1.0,
                weeks_with_threshold_sales: 12,
                has_solid_history: true,
            },
            margin: MarginData {
                cost_price: 30_000,
                fixed_costs: 44_980,
                total_cost: 74_980,
                break_even_price: 119_016,
                optimal_price: 154_900,
                net_margin: 22_607,
                roi_pct: 30.1,
                used_default_cost: false,
            },
            filter: FilterResult {
                passed,
                discard_reasons: if passed {
                    Vec::new()
                } else {
                    vec!["Pocas ventas: 10 < 50".to_string()]
                },
                metrics: HashMap::new(),
            },
            analyzed_at: Utc::now(),
        }
    }

    #[test]
    fn ranking_is_stable_for_ties() {
        let population = vec![product("a", 70, true), product("b", 70, true), product("c", 70, true)];
        let (ranked, _, _) = rank_and_summarize(&population);
        assert_eq!(
            ranked.iter().map(|p| p.product.name.clone()).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn ranking_sorts_by_score_descending() {
        let population = vec![product("low", 40, true), product("high", 90, true)];
        let (ranked, _, _) = rank_and_summarize(&population);
        assert_eq!(ranked[0].product.name, "high");
    }

    #[test]
    fn discarded_products_are_excluded_from_ranking_but_counted_in_stats() {
        let population = vec![product("passed", 70, true), product("failed", 70, false)];
        let (ranked, stats, _) = rank_and_summarize(&population);
        assert_eq!(ranked.len(), 1);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.passed, 1);
        assert_eq!(stats.discarded, 1);
        assert_eq!(stats.discard_histogram.get("Pocas ventas"), Some(&1));
    }

    #[test]
    fn population_groups_by_pattern_with_top_names() {
        let population = vec![product("a", 70, true), product("b", 80, true)];
        let (_, _, summary) = rank_and_summarize(&population);
        let group = summary.by_pattern.get("ESTABLE").unwrap();
        assert_eq!(group.count, 2);
        assert_eq!(group.top_names[0], "b");
    }
}
