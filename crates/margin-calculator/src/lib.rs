use analysis_core::{Config, MarginData};

/// Round a price up to the nearest thousand plus 900 — the market's
/// conventional "XX,900" price point.
fn round_to_price_ending(x: f64) -> i64 {
    let thousands = (x / 1000.0).floor() as i64;
    thousands * 1000 + 900
}

/// Unit-economics for a single cost price under the configured cost model.
///
/// Pure function: `cost_price <= 0` substitutes `config.default_cost_when_missing`
/// and the substitution is recorded on `MarginData::used_default_cost` rather
/// than surfaced as an error.
pub fn compute_margin(cost_price: i64, config: &Config) -> MarginData {
    let fixed_costs = config.country.shipping_cost
        + config.country.cpa
        + (config.country.shipping_cost as f64 * config.return_rate * config.return_shipping_fraction) as i64;

    let used_default_cost = cost_price <= 0;
    let effective_cost_price = if used_default_cost {
        config.default_cost_when_missing
    } else {
        cost_price
    };

    let total_cost = effective_cost_price + fixed_costs;

    let break_even_price = if total_cost == 0 {
        0
    } else {
        ((total_cost as f64) / config.effective_rate).ceil() as i64
    };

    let optimal_price = round_to_price_ending(break_even_price as f64 * 1.30);
    debug_assert!(optimal_price >= break_even_price, "optimal price must not undercut break-even");

    let effective_revenue = (optimal_price as f64) * config.effective_rate;
    let net_margin = (effective_revenue - total_cost as f64).round() as i64;

    let roi_pct = if total_cost == 0 {
        0.0
    } else {
        net_margin as f64 / total_cost as f64 * 100.0
    };

    MarginData {
        cost_price: effective_cost_price,
        fixed_costs,
        total_cost,
        break_even_price,
        optimal_price,
        net_margin,
        roi_pct,
        used_default_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_ending_is_always_xx900() {
        let config = Config::default();
        for cost in [0, 1_000, 15_000, 30_000, 120_000] {
            let margin = compute_margin(cost, &config);
            assert_eq!(margin.optimal_price % 1000, 900);
        }
    }

    #[test]
    fn zero_or_negative_cost_uses_default_and_flags_it() {
        let config = Config::default();
        let margin = compute_margin(0, &config);
        assert!(margin.used_default_cost);
        assert_eq!(margin.cost_price, config.default_cost_when_missing);

        let margin_neg = compute_margin(-500, &config);
        assert!(margin_neg.used_default_cost);
    }

    #[test]
    fn margin_is_monotonic_in_cost_price() {
        let config = Config::default();
        let low = compute_margin(20_000, &config);
        let high = compute_margin(60_000, &config);
        assert!(low.optimal_price <= high.optimal_price);
        assert!(low.roi_pct >= high.roi_pct);
    }

    #[test]
    fn optimal_price_never_undercuts_break_even() {
        let config = Config::default();
        for cost in [0, 5_000, 30_000, 100_000] {
            let margin = compute_margin(cost, &config);
            assert!(margin.optimal_price >= margin.break_even_price);
        }
    }

    #[test]
    fn stable_seller_scenario_roi_is_about_35_percent() {
        let config = Config::default();
        let margin = compute_margin(30_000, &config);
        assert!(margin.roi_pct > 25.0 && margin.roi_pct < 45.0, "roi_pct = {}", margin.roi_pct);
    }
}
