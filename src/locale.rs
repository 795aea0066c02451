//! Display formatting for the fixed de-DE / EUR configuration. The analysis
//! core hands out raw numbers; only rendered output goes through here.

/// Renders a value the way `Intl.NumberFormat("de-DE", { currency: "EUR" })`
/// does: dot-grouped thousands, comma decimals, non-breaking space before the
/// euro sign, e.g. `1.234,56 €`.
pub fn format_eur(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{fraction:02}\u{a0}€")
}
