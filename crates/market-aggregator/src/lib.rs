use analysis_core::{Competitor, MarketAnalysis, MarketTrend, MarketVerdict};

/// Projects one week of sales onto a 30-day month. Idiosyncratic but kept
/// verbatim for compatibility with the figures the source produced.
const WEEK_TO_MONTH_FACTOR: f64 = 4.28;

/// Combine per-competitor sales + trend snapshots into a market-level
/// verdict for a single product query.
pub fn aggregate(query: &str, competitors: &[Competitor]) -> MarketAnalysis {
    if competitors.is_empty() {
        return MarketAnalysis {
            query: query.to_string(),
            total_sales_7d: 0,
            total_sales_30d: 0,
            competitor_count: 0,
            competitors: Vec::new(),
            leader_share_pct: 0.0,
            market_growth_pct: 0.0,
            market_trend: MarketTrend::Estable,
            verdict: MarketVerdict::SinDatos,
            verdict_reason: "no competitors supplied".to_string(),
        };
    }

    let total_sales_7d: u32 = competitors.iter().map(|c| c.sales_7d).sum();
    let total_sales_30d: u32 = competitors.iter().map(|c| c.sales_30d).sum();
    let competitor_count = competitors.iter().filter(|c| c.sales_7d > 0).count();

    let mut ranked: Vec<Competitor> = competitors
        .iter()
        .cloned()
        .map(|mut c| {
            c.market_share_pct = if total_sales_7d == 0 {
                0.0
            } else {
                c.sales_7d as f64 / total_sales_7d as f64 * 100.0
            };
            c
        })
        .collect();
    ranked.sort_by(|a, b| b.sales_7d.cmp(&a.sales_7d));

    let leader_share_pct = ranked.first().map(|c| c.market_share_pct).unwrap_or(0.0);

    let market_growth_pct = if total_sales_30d == 0 {
        0.0
    } else {
        (total_sales_7d as f64 * WEEK_TO_MONTH_FACTOR - total_sales_30d as f64) / total_sales_30d as f64
            * 100.0
    };

    let market_trend = if market_growth_pct > 15.0 {
        MarketTrend::Creciendo
    } else if market_growth_pct < -15.0 {
        MarketTrend::Decayendo
    } else {
        MarketTrend::Estable
    };

    let (verdict, verdict_reason) =
        decide_verdict(competitor_count, market_growth_pct, leader_share_pct);

    MarketAnalysis {
        query: query.to_string(),
        total_sales_7d,
        total_sales_30d,
        competitor_count,
        competitors: ranked,
        leader_share_pct,
        market_growth_pct,
        market_trend,
        verdict,
        verdict_reason,
    }
}

fn decide_verdict(competitor_count: usize, growth: f64, leader_share: f64) -> (MarketVerdict, String) {
    if growth < -40.0 {
        return (
            MarketVerdict::Decayendo,
            format!("market growth {:.1}% below -40%", growth),
        );
    }

    if competitor_count <= 2 {
        return (
            MarketVerdict::OportunidadAlta,
            format!("only {} active competitor(s)", competitor_count),
        );
    }

    if competitor_count <= 4 {
        return if growth > 10.0 {
            (
                MarketVerdict::OportunidadAlta,
                format!("{} competitors, growth {:.1}% > 10%", competitor_count, growth),
            )
        } else if growth > -15.0 {
            (
                MarketVerdict::OportunidadMedia,
                format!("{} competitors, growth {:.1}%", competitor_count, growth),
            )
        } else {
            (
                MarketVerdict::Decayendo,
                format!("{} competitors, growth {:.1}% <= -15%", competitor_count, growth),
            )
        };
    }

    if competitor_count <= 7 {
        return if leader_share > 50.0 {
            (
                MarketVerdict::Dominado,
                format!("leader holds {:.1}% of {} competitors", leader_share, competitor_count),
            )
        } else if growth > 0.0 {
            (
                MarketVerdict::OportunidadMedia,
                format!("{} competitors, growth {:.1}% > 0%", competitor_count, growth),
            )
        } else {
            (
                MarketVerdict::Saturado,
                format!("{} competitors, no growth, no dominant leader", competitor_count),
            )
        };
    }

    if leader_share > 40.0 {
        (
            MarketVerdict::Dominado,
            format!("leader holds {:.1}% across {} competitors", leader_share, competitor_count),
        )
    } else {
        (
            MarketVerdict::Saturado,
            format!("{} competitors, no dominant leader", competitor_count),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn competitor(id: &str, sales_7d: u32, sales_30d: u32) -> Competitor {
        Competitor {
            identifier: id.to_string(),
            provider_name: id.to_string(),
            sales_7d,
            sales_30d,
            price: 30_000,
            stock: 50,
            trend: None,
            market_share_pct: 0.0,
        }
    }

    #[test]
    fn market_shares_sum_to_100_when_sales_present() {
        let competitors = vec![competitor("a", 60, 200), competitor("b", 40, 150)];
        let analysis = aggregate("widget", &competitors);
        let sum: f64 = analysis.competitors.iter().map(|c| c.market_share_pct).sum();
        assert!((sum - 100.0).abs() < 0.1);
    }

    #[test]
    fn empty_competitor_list_is_sin_datos() {
        let analysis = aggregate("widget", &[]);
        assert_eq!(analysis.verdict, MarketVerdict::SinDatos);
    }

    #[test]
    fn single_competitor_with_growth_is_oportunidad_alta() {
        let competitors = vec![competitor("a", 400, 1122)];
        let analysis = aggregate("widget", &competitors);
        assert!(analysis.market_growth_pct > 15.0, "growth = {}", analysis.market_growth_pct);
        assert_eq!(analysis.verdict, MarketVerdict::OportunidadAlta);
    }

    #[test]
    fn ten_competitors_with_dominant_leader_is_dominado() {
        let mut competitors = vec![competitor("leader", 620, 2000)];
        for i in 0..9 {
            competitors.push(competitor(&format!("c{i}"), 38, 120));
        }
        let analysis = aggregate("widget", &competitors);
        assert!(analysis.leader_share_pct > 60.0, "leader_share = {}", analysis.leader_share_pct);
        assert_eq!(analysis.verdict, MarketVerdict::Dominado);
    }

    #[test]
    fn six_competitors_declining_is_decayendo() {
        let competitors: Vec<Competitor> = (0..6).map(|i| competitor(&format!("c{i}"), 10, 100)).collect();
        let analysis = aggregate("widget", &competitors);
        assert!(analysis.market_growth_pct < -40.0, "growth = {}", analysis.market_growth_pct);
        assert_eq!(analysis.verdict, MarketVerdict::Decayendo);
    }

    #[test]
    fn competitors_sorted_by_sales_7d_descending() {
        let competitors = vec![competitor("low", 10, 40), competitor("high", 90, 300)];
        let analysis = aggregate("widget", &competitors);
        assert_eq!(analysis.competitors[0].identifier, "high");
    }
}
