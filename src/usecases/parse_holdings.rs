use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::domain::models::Holding;

/// Parses row-oriented `SYMBOL,SHARES,COST` text into holdings.
///
/// Tolerant by contract: malformed rows are dropped silently and the rest of
/// the batch survives. This never fails; an empty result is the caller's
/// signal that the input was unusable, and the caller decides whether that
/// counts as a load failure.
pub fn parse_holdings(text: &str) -> Vec<Holding> {
    // Plain comma splitting: quotes carry no meaning in this format, so a
    // stray `"` cannot merge lines or smuggle a comma into a field.
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    let mut holdings = Vec::new();
    for result in rdr.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, "skipping unreadable row");
                continue;
            }
        };
        // First three fields are symbol, shares, cost; trailing extras are ignored.
        let (symbol, shares, cost) = match (record.get(0), record.get(1), record.get(2)) {
            (Some(s), Some(sh), Some(c)) if !s.is_empty() && !sh.is_empty() && !c.is_empty() => {
                (s, sh, c)
            }
            _ => continue,
        };
        let shares = match shares.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => continue,
        };
        let cost = match cost.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => continue,
        };
        holdings.push(Holding::new(symbol.to_uppercase(), shares, cost));
    }
    holdings
}
