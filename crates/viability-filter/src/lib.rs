use analysis_core::{Config, FilterResult, MarginData, PatternVariant, ProductRecord, TrendAnalysis};
use std::collections::HashMap;

const BLACKLISTED_PATTERNS: [PatternVariant; 5] = [
    PatternVariant::PicoUnico,
    PatternVariant::ViralMuerto,
    PatternVariant::AparicionSubita,
    PatternVariant::SinDatos,
    PatternVariant::Inconsistente,
];

/// Apply every viability gate to a product. All gates are evaluated, none
/// short-circuits, so the caller sees every reason a product was discarded.
pub fn apply(
    product: &ProductRecord,
    trend: &TrendAnalysis,
    margin: &MarginData,
    config: &Config,
) -> FilterResult {
    let _ = product;
    let mut discard_reasons = Vec::new();
    let mut metrics = HashMap::new();

    let current_week = trend.weeks.first();
    let sales_7d = current_week.map(|w| w.total_sales).unwrap_or(0);
    let active_days = current_week.map(|w| w.days_with_sales).unwrap_or(0);
    let wow0 = trend.wow_growth.first().copied().unwrap_or(0.0);
    let cost_over_pvp = if margin.optimal_price == 0 {
        0.0
    } else {
        margin.cost_price as f64 / margin.optimal_price as f64
    };

    metrics.insert("sales_7d".to_string(), sales_7d as f64);
    metrics.insert("active_days".to_string(), active_days as f64);
    metrics.insert("wow_change_pct".to_string(), wow0);
    metrics.insert("roi_pct".to_string(), margin.roi_pct);
    metrics.insert("cost_over_pvp_ratio".to_string(), cost_over_pvp);
    metrics.insert(
        "weeks_with_threshold_sales".to_string(),
        trend.weeks_with_threshold_sales as f64,
    );
    metrics.insert("pattern".to_string(), trend.pattern as i32 as f64);

    if trend.weeks_with_threshold_sales < config.min_weeks_with_threshold_sales {
        discard_reasons.push(format!(
            "Sin historial {} sem ({}/{})",
            config.min_weeks_with_threshold_sales,
            trend.weeks_with_threshold_sales,
            config.min_weeks_with_threshold_sales
        ));
    }

    if BLACKLISTED_PATTERNS.contains(&trend.pattern) {
        discard_reasons.push(format!("Patrón descartado: {}", trend.pattern.label()));
    }

    if sales_7d < config.min_sales_7d {
        discard_reasons.push(format!("Pocas ventas: {} < {}", sales_7d, config.min_sales_7d));
    }

    if active_days < config.min_active_days {
        discard_reasons.push(format!(
            "Pocos días activos: {} < {}",
            active_days, config.min_active_days
        ));
    }

    if wow0 < config.max_wow_drop_pct {
        discard_reasons.push(format!(
            "Caída semanal: {:.1}% < {:.1}%",
            wow0, config.max_wow_drop_pct
        ));
    }

    if margin.roi_pct < config.min_roi_pct {
        discard_reasons.push(format!(
            "ROI bajo: {:.1}% < {:.1}%",
            margin.roi_pct, config.min_roi_pct
        ));
    }

    if cost_over_pvp > config.max_cost_over_pvp {
        discard_reasons.push(format!(
            "Costo muy alto frente al precio: {:.2} > {:.2}",
            cost_over_pvp, config.max_cost_over_pvp
        ));
    }

    let passed = discard_reasons.is_empty();

    FilterResult {
        passed,
        discard_reasons,
        metrics,
    }
}

/// Categorize a population's discard reasons into a gate-level histogram,
/// e.g. "Pocas ventas" -> 12, "ROI bajo" -> 4.
pub fn summarize_discard_reasons<'a>(
    results: impl IntoIterator<Item = &'a FilterResult>,
) -> HashMap<String, usize> {
    let mut histogram = HashMap::new();
    for result in results {
        for reason in &result.discard_reasons {
            let category = reason.split(':').next().unwrap_or(reason).trim().to_string();
            *histogram.entry(category).or_insert(0) += 1;
        }
    }
    histogram
}
