use serde::{Deserialize, Serialize};

// One portfolio position. Value is always derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub shares: f64,
    pub cost: f64,
}

impl Holding {
    pub fn new(symbol: impl Into<String>, shares: f64, cost: f64) -> Self {
        Self {
            symbol: symbol.into(),
            shares,
            cost,
        }
    }

    pub fn value(&self) -> f64 {
        self.shares * self.cost
    }
}

// Largest position by value, absent for an empty portfolio
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopHolding {
    pub symbol: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub position_count: usize,
    pub top_holding: Option<TopHolding>,
    pub average_cost: f64,
}

// Per-position row for the holdings table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingBreakdown {
    pub symbol: String,
    pub shares: f64,
    pub cost: f64,
    pub value: f64,
    pub allocation_percent: f64,
}

// Projected value band derived from total value by fixed multipliers.
// A display heuristic, not a model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRange {
    pub expected: f64,
    pub high: f64,
    pub low: f64,
}

/// Generated advisory prose, one sentence per entry. The renderer joins
/// sentences with single spaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Narrative {
    pub sentences: Vec<String>,
}

impl Narrative {
    pub fn text(&self) -> String {
        self.sentences.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioAnalysis {
    pub summary: PortfolioSummary,
    pub positions: Vec<HoldingBreakdown>,
    pub forecast: ForecastRange,
    pub narrative: Narrative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub summary: String,
    pub source: String,
}
