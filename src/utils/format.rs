use chrono::{DateTime, FixedOffset};
use rust_decimal::{Decimal, RoundingStrategy};

use super::time::jakarta_offset;

/// Render a moment as "12 June 2024" in the presentation timezone.
pub fn format_date(moment: DateTime<FixedOffset>) -> String {
    moment
        .with_timezone(&jakarta_offset())
        .format("%-d %B %Y")
        .to_string()
}

/// Render a moment as "08:00" in the presentation timezone.
pub fn format_time(moment: DateTime<FixedOffset>) -> String {
    moment
        .with_timezone(&jakarta_offset())
        .format("%H:%M")
        .to_string()
}

/// Render an amount as "Rp 1.500.000", whole rupiah with dotted thousands.
pub fn format_price(amount: Decimal) -> String {
    let whole = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = whole.abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if whole.is_sign_negative() {
        format!("Rp -{}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}
