use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One day of observed sales for a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub sold_units: u32,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub external_product_id: Option<u64>,
}

/// Aggregated metrics for a single 7-day window. Week 0 is the most recent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMetrics {
    pub week_index: usize,
    pub total_sales: u32,
    pub days_with_sales: u8,
    pub avg_daily: f64,
    pub max_daily: u32,
    pub min_daily: u32,
    pub consistency_pct: f64,
}

impl WeeklyMetrics {
    /// A zeroed placeholder for a short tail chunk that didn't reach the
    /// minimum observed-day count to count as a full week.
    pub fn empty(week_index: usize) -> Self {
        Self {
            week_index,
            total_sales: 0,
            days_with_sales: 0,
            avg_daily: 0.0,
            max_daily: 0,
            min_daily: 0,
            consistency_pct: 0.0,
        }
    }
}

/// Closed set of trend pattern classifications. Mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternVariant {
    Despegando,
    CrecimientoSostenido,
    Estable,
    Decayendo,
    ViralMuerto,
    PicoUnico,
    AparicionSubita,
    Inconsistente,
    Volatil,
    SinDatos,
    Evaluar,
}

impl PatternVariant {
    pub fn label(&self) -> &'static str {
        match self {
            PatternVariant::Despegando => "DESPEGANDO",
            PatternVariant::CrecimientoSostenido => "CRECIMIENTO_SOSTENIDO",
            PatternVariant::Estable => "ESTABLE",
            PatternVariant::Decayendo => "DECAYENDO",
            PatternVariant::ViralMuerto => "VIRAL_MUERTO",
            PatternVariant::PicoUnico => "PICO_UNICO",
            PatternVariant::AparicionSubita => "APARICION_SUBITA",
            PatternVariant::Inconsistente => "INCONSISTENTE",
            PatternVariant::Volatil => "VOLATIL",
            PatternVariant::SinDatos => "SIN_DATOS",
            PatternVariant::Evaluar => "EVALUAR",
        }
    }
}

/// Result of classifying a product's weekly series into a pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub weeks: Vec<WeeklyMetrics>,
    pub total_sold: u32,
    pub total_days: usize,
    pub wow_growth: Vec<f64>,
    pub pattern: PatternVariant,
    pub pattern_reason: String,
    pub alerts: Vec<String>,
    pub score: u8,
    pub peak_week: usize,
    pub peak_vs_current: f64,
    pub weeks_with_threshold_sales: u32,
    pub has_solid_history: bool,
}

/// Unit-economics for a single cost price under a fixed cost model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginData {
    pub cost_price: i64,
    pub fixed_costs: i64,
    pub total_cost: i64,
    pub break_even_price: i64,
    pub optimal_price: i64,
    pub net_margin: i64,
    pub roi_pct: f64,
    /// True when `cost_price` was missing/non-positive and a configured
    /// default was substituted.
    pub used_default_cost: bool,
}

/// Outcome of applying the conjunctive viability gates to a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterResult {
    pub passed: bool,
    pub discard_reasons: Vec<String>,
    pub metrics: HashMap<String, f64>,
}

/// A single competing supplier's snapshot for a given product query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub identifier: String,
    pub provider_name: String,
    pub sales_7d: u32,
    pub sales_30d: u32,
    pub price: i64,
    pub stock: u32,
    #[serde(default)]
    pub trend: Option<TrendAnalysis>,
    pub market_share_pct: f64,
}

/// Trend direction for an aggregated market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketTrend {
    Creciendo,
    Estable,
    Decayendo,
}

/// Closed set of market-level verdicts for a product query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketVerdict {
    OportunidadAlta,
    OportunidadMedia,
    Saturado,
    Dominado,
    Decayendo,
    SinDatos,
}

/// Aggregated competitive landscape for a single product query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub query: String,
    pub total_sales_7d: u32,
    pub total_sales_30d: u32,
    pub competitor_count: usize,
    pub competitors: Vec<Competitor>,
    pub leader_share_pct: f64,
    pub market_growth_pct: f64,
    pub market_trend: MarketTrend,
    pub verdict: MarketVerdict,
    pub verdict_reason: String,
}

/// Ingest contract: a single product as handed over by the scraping
/// collaborator (out of scope here — see the ingest adapter contract).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub uuid: String,
    pub name: String,
    pub provider_price: i64,
    pub profit: i64,
    pub stock: u32,
    pub sales_7d: u32,
    pub sales_30d: u32,
}

/// Ingest contract: the daily history paired to a `ProductRecord` by uuid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub provider_name: Option<String>,
    pub history: Vec<DailyPoint>,
}

/// Pure composition of a product with its computed analysis. Replaces the
/// pattern of mutating the original record in place as analysis progresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedProduct {
    pub product: ProductRecord,
    pub trend: TrendAnalysis,
    pub margin: MarginData,
    pub filter: FilterResult,
    pub analyzed_at: DateTime<Utc>,
}

/// Population-level filter outcome: totals plus a discard-reason histogram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterStats {
    pub total: usize,
    pub passed: usize,
    pub discarded: usize,
    pub discard_histogram: HashMap<String, usize>,
}

/// Population-level grouping by pattern for the summary report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationSummary {
    pub by_pattern: HashMap<String, PatternGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternGroup {
    pub count: usize,
    pub top_names: Vec<String>,
}

/// Per-country shipping/acquisition-cost overrides (the source models
/// Colombia/Mexico/Ecuador separately; defaults reflect Colombia).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub shipping_cost: i64,
    pub cpa: i64,
}

impl Default for Country {
    fn default() -> Self {
        Self {
            shipping_cost: 18_000,
            cpa: 25_000,
        }
    }
}

/// Tuning thresholds for the whole engine. Read-only for the lifetime of a
/// run; never carries secrets or environment globals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_return_rate")]
    pub return_rate: f64,
    #[serde(default = "Config::default_cancel_rate")]
    pub cancel_rate: f64,
    #[serde(default = "Config::default_return_shipping_fraction")]
    pub return_shipping_fraction: f64,
    #[serde(default = "Config::default_effective_rate")]
    pub effective_rate: f64,
    #[serde(default = "Config::default_cost_when_missing")]
    pub default_cost_when_missing: i64,

    #[serde(default = "Config::default_min_weeks_with_threshold_sales")]
    pub min_weeks_with_threshold_sales: u32,
    #[serde(default = "Config::default_min_sales_per_week")]
    pub min_sales_per_week: u32,
    #[serde(default = "Config::default_min_sales_7d")]
    pub min_sales_7d: u32,
    #[serde(default = "Config::default_min_active_days")]
    pub min_active_days: u8,
    #[serde(default = "Config::default_max_wow_drop_pct")]
    pub max_wow_drop_pct: f64,
    #[serde(default = "Config::default_min_roi_pct")]
    pub min_roi_pct: f64,
    #[serde(default = "Config::default_max_cost_over_pvp")]
    pub max_cost_over_pvp: f64,

    /// Per-country shipping/acquisition-cost override. `compute_margin`
    /// reads `country.shipping_cost`/`country.cpa` directly — there is no
    /// separate flat shipping_cost/cpa field to fall out of sync with it.
    #[serde(default)]
    pub country: Country,
}

impl Config {
    fn default_return_rate() -> f64 {
        0.22
    }
    fn default_cancel_rate() -> f64 {
        0.15
    }
    fn default_return_shipping_fraction() -> f64 {
        0.5
    }
    fn default_effective_rate() -> f64 {
        0.63
    }
    fn default_cost_when_missing() -> i64 {
        35_000
    }
    fn default_min_weeks_with_threshold_sales() -> u32 {
        12
    }
    fn default_min_sales_per_week() -> u32 {
        50
    }
    fn default_min_sales_7d() -> u32 {
        50
    }
    fn default_min_active_days() -> u8 {
        4
    }
    fn default_max_wow_drop_pct() -> f64 {
        -30.0
    }
    fn default_min_roi_pct() -> f64 {
        20.0
    }
    fn default_max_cost_over_pvp() -> f64 {
        0.40
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            return_rate: Self::default_return_rate(),
            cancel_rate: Self::default_cancel_rate(),
            return_shipping_fraction: Self::default_return_shipping_fraction(),
            effective_rate: Self::default_effective_rate(),
            default_cost_when_missing: Self::default_cost_when_missing(),
            min_weeks_with_threshold_sales: Self::default_min_weeks_with_threshold_sales(),
            min_sales_per_week: Self::default_min_sales_per_week(),
            min_sales_7d: Self::default_min_sales_7d(),
            min_active_days: Self::default_min_active_days(),
            max_wow_drop_pct: Self::default_max_wow_drop_pct(),
            min_roi_pct: Self::default_min_roi_pct(),
            max_cost_over_pvp: Self::default_max_cost_over_pvp(),
            country: Country::default(),
        }
    }
}
