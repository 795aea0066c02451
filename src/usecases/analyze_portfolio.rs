use crate::domain::models::{
    ForecastRange, Holding, HoldingBreakdown, Narrative, PortfolioAnalysis, PortfolioSummary,
    TopHolding,
};
use crate::locale::format_eur;

// Fixed heuristics, given behavior rather than derived from data.
pub const FORECAST_EXPECTED_FACTOR: f64 = 1.05;
pub const FORECAST_HIGH_FACTOR: f64 = 1.15;
pub const FORECAST_LOW_FACTOR: f64 = 0.85;
pub const CONCENTRATION_WARNING_PERCENT: f64 = 35.0;

/// Computes aggregates, forecast band and narrative for a portfolio.
///
/// Total over its domain: the empty portfolio and the zero-value portfolio
/// map to zero/absent values and a prompt narrative, never to an error.
pub fn analyze(holdings: &[Holding]) -> PortfolioAnalysis {
    let mut total_value = 0.0;
    let mut total_shares = 0.0;
    for holding in holdings {
        total_value += holding.value();
        total_shares += holding.shares;
    }

    // Strict > keeps the first-seen maximum, so ties resolve to input order
    // without relying on any sort's stability.
    let mut top: Option<&Holding> = None;
    for holding in holdings {
        if top.map_or(true, |t| holding.value() > t.value()) {
            top = Some(holding);
        }
    }

    let average_cost = if total_shares > 0.0 {
        total_value / total_shares
    } else {
        0.0
    };

    let positions = holdings
        .iter()
        .map(|holding| {
            let value = holding.value();
            let allocation_percent = if total_value > 0.0 {
                value / total_value * 100.0
            } else {
                0.0
            };
            HoldingBreakdown {
                symbol: holding.symbol.clone(),
                shares: holding.shares,
                cost: holding.cost,
                value,
                allocation_percent,
            }
        })
        .collect();

    let expected = total_value * FORECAST_EXPECTED_FACTOR;
    let forecast = ForecastRange {
        expected,
        high: expected * FORECAST_HIGH_FACTOR,
        low: expected * FORECAST_LOW_FACTOR,
    };

    let narrative = build_narrative(holdings.len(), total_value, top);

    PortfolioAnalysis {
        summary: PortfolioSummary {
            total_value,
            position_count: holdings.len(),
            top_holding: top.map(|t| TopHolding {
                symbol: t.symbol.clone(),
                value: t.value(),
            }),
            average_cost,
        },
        positions,
        forecast,
        narrative,
    }
}

fn build_narrative(position_count: usize, total_value: f64, top: Option<&Holding>) -> Narrative {
    if total_value == 0.0 {
        return Narrative {
            sentences: vec![
                "Lade dein Portfolio hoch, um einen Zukunftsausblick zu sehen.".to_string(),
            ],
        };
    }

    let concentration = top.map_or(0.0, |t| t.value() / total_value * 100.0);

    let composition = format!(
        "Dein Portfolio umfasst {} Positionen mit einem Gesamtwert von {}.",
        position_count,
        format_eur(total_value)
    );
    let dominance = match top {
        Some(t) => format!(
            "Die größte Position ist {} und macht rund {:.1}% aus.",
            t.symbol, concentration
        ),
        None => "Es gibt aktuell keine dominante Position.".to_string(),
    };
    let assessment = if concentration > CONCENTRATION_WARNING_PERCENT {
        "Die Konzentration ist relativ hoch. Eventuell lohnt sich eine breitere Streuung."
    } else {
        "Die Allokation wirkt ausgewogen, prüfe dennoch regelmäßig deine Gewichtungen."
    };

    Narrative {
        sentences: vec![composition, dominance, assessment.to_string()],
    }
}
