use analysis_core::{DailyPoint, WeeklyMetrics};

/// Minimum number of observed days within a 7-day chunk for it to count as
/// a full week; a shorter tail chunk is reported as an empty week instead.
const MIN_OBSERVED_DAYS_PER_WEEK: usize = 5;

/// Split a daily series into `num_weeks` fixed 7-day windows, most-recent
/// first. Deterministic: identical input always yields identical output.
pub fn decompose(daily_series: &[DailyPoint], num_weeks: usize) -> Vec<WeeklyMetrics> {
    let mut sorted: Vec<DailyPoint> = daily_series.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    (0..num_weeks)
        .map(|week_index| {
            let start = week_index * 7;
            let end = (start + 7).min(sorted.len());
            if start >= sorted.len() {
                return WeeklyMetrics::empty(week_index);
            }
            decompose_week(week_index, &sorted[start..end])
        })
        .collect()
}

fn decompose_week(week_index: usize, chunk: &[DailyPoint]) -> WeeklyMetrics {
    let observed_days = chunk.len();
    if observed_days < MIN_OBSERVED_DAYS_PER_WEEK {
        return WeeklyMetrics::empty(week_index);
    }

    let sales: Vec<u32> = chunk.iter().map(|d| d.sold_units).collect();
    let total_sales: u32 = sales.iter().sum();
    let days_with_sales = sales.iter().filter(|&&s| s > 0).count() as u8;
    let max_daily = sales.iter().copied().max().unwrap_or(0);
    let min_daily = sales.iter().copied().min().unwrap_or(0);
    let avg_daily = total_sales as f64 / sales.len() as f64;
    let consistency_pct = days_with_sales as f64 / observed_days as f64 * 100.0;

    WeeklyMetrics {
        week_index,
        total_sales,
        days_with_sales,
        avg_daily,
        max_daily,
        min_daily,
        consistency_pct,
    }
}
