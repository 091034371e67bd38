use analysis_core::{Config, DailyPoint, PatternVariant, WeeklyMetrics};

/// Everything `classify` derives beyond the weekly series itself. The
/// caller composes this together with the weeks/wow_growth it already has
/// into a full `TrendAnalysis`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyOutput {
    pub pattern: PatternVariant,
    pub pattern_reason: String,
    pub alerts: Vec<String>,
    pub score: u8,
    pub peak_week: usize,
    pub peak_vs_current: f64,
    pub weeks_with_threshold_sales: u32,
    pub has_solid_history: bool,
}

/// Floor for non-negative values, truncation toward zero for negatives —
/// the asymmetric rounding the score formulas use.
fn signed_floor(x: f64) -> i64 {
    if x >= 0.0 {
        x.floor() as i64
    } else {
        x.trunc() as i64
    }
}

fn count_weeks_with_threshold_sales(weeks: &[WeeklyMetrics], threshold: u32) -> u32 {
    weeks.iter().filter(|w| w.total_sales >= threshold).count() as u32
}

fn find_peak(weeks: &[WeeklyMetrics]) -> (usize, u32) {
    weeks
        .iter()
        .enumerate()
        .max_by_key(|(_, w)| w.total_sales)
        .map(|(i, w)| (i, w.total_sales))
        .unwrap_or((0, 0))
}

/// Share of the highest single day within the most recent 14 observed days.
fn max_day_share(daily_sales: &[DailyPoint]) -> f64 {
    let mut sorted: Vec<&DailyPoint> = daily_sales.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    let window: Vec<u32> = sorted.iter().take(14).map(|d| d.sold_units).collect();
    let total: u32 = window.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let max_day = window.iter().copied().max().unwrap_or(0);
    max_day as f64 / total as f64 * 100.0
}

/// Apply the trend decision tree. Tried in order, first match wins — this
/// ordering is a safety priority: fraud/degenerate patterns are detected
/// before any growth claim. Pure function: missing inputs yield SIN_DATOS,
/// it never fails.
pub fn classify(
    weeks: &[WeeklyMetrics],
    wow_growth: &[f64],
    daily_sales: &[DailyPoint],
    config: &Config,
) -> ClassifyOutput {
    let mut alerts = Vec::new();

    let weeks_with_threshold_sales =
        count_weeks_with_threshold_sales(weeks, config.min_sales_per_week);
    let has_solid_history = weeks_with_threshold_sales >= config.min_weeks_with_threshold_sales;
    alerts.push(format!(
        "solid history: {}/{} weeks >= threshold",
        weeks_with_threshold_sales, config.min_weeks_with_threshold_sales
    ));

    let current_sales = weeks.first().map(|w| w.total_sales).unwrap_or(0);
    let consistency = weeks.first().map(|w| w.consistency_pct).unwrap_or(0.0);
    let (peak_week, peak_sales) = find_peak(weeks);
    let peak_vs_current = if current_sales == 0 {
        0.0
    } else {
        peak_sales as f64 / current_sales as f64
    };

    if weeks.is_empty() || current_sales == 0 {
        alerts.push("sin ventas en la semana actual".to_string());
        return ClassifyOutput {
            pattern: PatternVariant::SinDatos,
            pattern_reason: "no weeks observed or zero current sales".to_string(),
            alerts,
            score: 0,
            peak_week: 0,
            peak_vs_current: 0.0,
            weeks_with_threshold_sales,
            has_solid_history,
        };
    }

    let prior_sum = weeks.get(1).map(|w| w.total_sales).unwrap_or(0)
        + weeks.get(2).map(|w| w.total_sales).unwrap_or(0);
    if prior_sum <= 5 && current_sales > 20 {
        alerts.push(format!(
            "apareció de la nada: semanas -1/-2 suman {} ventas, esta semana {}",
            prior_sum, current_sales
        ));
        return ClassifyOutput {
            pattern: PatternVariant::AparicionSubita,
            pattern_reason: "current sales with no meaningful prior history".to_string(),
            alerts,
            score: 45,
            peak_week,
            peak_vs_current,
            weeks_with_threshold_sales,
            has_solid_history,
        };
    }

    if peak_week > 0 && peak_vs_current > 2.5 {
        alerts.push(format!(
            "pico en semana -{}: {} ventas vs {} actuales ({:.1}x)",
            peak_week, peak_sales, current_sales, peak_vs_current
        ));
        let score = (40 - peak_week as i64 * 10).max(10) as u8;
        return ClassifyOutput {
            pattern: PatternVariant::ViralMuerto,
            pattern_reason: format!("peak {:.1}x current, {} weeks ago", peak_vs_current, peak_week),
            alerts,
            score,
            peak_week,
            peak_vs_current,
            weeks_with_threshold_sales,
            has_solid_history,
        };
    }

    let share = max_day_share(daily_sales);
    if share > 50.0 {
        alerts.push(format!("un solo día concentra {:.1}% de las ventas recientes", share));
        return ClassifyOutput {
            pattern: PatternVariant::PicoUnico,
            pattern_reason: format!("single day carries {:.1}% of the last 14 days", share),
            alerts,
            score: 25,
            peak_week,
            peak_vs_current,
            weeks_with_threshold_sales,
            has_solid_history,
        };
    }

    let wow0 = wow_growth.first().copied().unwrap_or(0.0);
    let wow1 = wow_growth.get(1).copied();

    let real_prior_history = weeks[1..].iter().filter(|w| w.total_sales > 10).count() >= 2;
    if real_prior_history && wow0 > 20.0 && wow1.map(|w| w >= 0.0).unwrap_or(true) && consistency >= 50.0 {
        alerts.push(format!("crecimiento semanal {:.1}% con consistencia {:.1}%", wow0, consistency));
        let score = (70 + signed_floor(wow0 / 5.0) + signed_floor(consistency / 10.0)).clamp(0, 95) as u8;
        return ClassifyOutput {
            pattern: PatternVariant::Despegando,
            pattern_reason: format!("wow growth {:.1}% with prior history and consistency {:.1}%", wow0, consistency),
            alerts,
            score,
            peak_week,
            peak_vs_current,
            weeks_with_threshold_sales,
            has_solid_history,
        };
    }

    let prior_week_sales = weeks.get(1).map(|w| w.total_sales).unwrap_or(0);
    if prior_week_sales > 10 && wow0 > 10.0 && consistency >= 40.0 {
        alerts.push(format!("crecimiento sostenido {:.1}%", wow0));
        let score = (60 + signed_floor(wow0 / 3.0)).clamp(0, 85) as u8;
        return ClassifyOutput {
            pattern: PatternVariant::CrecimientoSostenido,
            pattern_reason: format!("wow growth {:.1}% on an established base", wow0),
            alerts,
            score,
            peak_week,
            peak_vs_current,
            weeks_with_threshold_sales,
            has_solid_history,
        };
    }

    if wow0.abs() <= 20.0 && consistency >= 40.0 {
        alerts.push(format!("ventas estables, variación {:.1}%", wow0));
        let score = (55 + signed_floor(consistency / 5.0)).max(0) as u8;
        return ClassifyOutput {
            pattern: PatternVariant::Estable,
            pattern_reason: format!("wow growth within +/-20% and consistency {:.1}%", consistency),
            alerts,
            score,
            peak_week,
            peak_vs_current,
            weeks_with_threshold_sales,
            has_solid_history,
        };
    }

    if wow0 < -20.0 {
        alerts.push(format!("caída semanal {:.1}%", wow0));
        let score = (50 + signed_floor(wow0 / 2.0)).max(20) as u8;
        return ClassifyOutput {
            pattern: PatternVariant::Decayendo,
            pattern_reason: format!("wow growth {:.1}% below -20%", wow0),
            alerts,
            score,
            peak_week,
            peak_vs_current,
            weeks_with_threshold_sales,
            has_solid_history,
        };
    }

    if wow0.abs() > 60.0 && consistency < 50.0 {
        alerts.push(format!("variación errática {:.1}% sin dirección clara", wow0));
        return ClassifyOutput {
            pattern: PatternVariant::Volatil,
            pattern_reason: "large swing with low consistency".to_string(),
            alerts,
            score: 35,
            peak_week,
            peak_vs_current,
            weeks_with_threshold_sales,
            has_solid_history,
        };
    }

    if consistency < 30.0 {
        alerts.push(format!("consistencia baja: {:.1}%", consistency));
        return ClassifyOutput {
            pattern: PatternVariant::Inconsistente,
            pattern_reason: format!("consistency {:.1}% below 30%", consistency),
            alerts,
            score: 35,
            peak_week,
            peak_vs_current,
            weeks_with_threshold_sales,
            has_solid_history,
        };
    }

    alerts.push("no encaja en ningún patrón conocido, requiere evaluación manual".to_string());
    let score = (50 + signed_floor(consistency / 4.0)).max(0) as u8;
    ClassifyOutput {
        pattern: PatternVariant::Evaluar,
        pattern_reason: "no branch matched, falling back to manual evaluation".to_string(),
        alerts,
        score,
        peak_week,
        peak_vs_current,
        weeks_with_threshold_sales,
        has_solid_history,
    }
}
