//! Amount and count parsing.
//!
//! Peso amounts use Chilean notation (`8.153.962`, `33.177,00`); FOB, freight
//! and insurance on a DIN are printed in US notation (`30,150.00`). Every
//! parsed amount is rescaled to two decimals.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a Chilean-formatted amount: `.` groups thousands, `,` is decimal.
pub fn parse_chilean_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    to_money(&cleaned.replace('.', "").replace(',', "."))
}

/// Parse a US-formatted amount: `,` groups thousands, `.` is decimal.
pub fn parse_us_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    to_money(&cleaned)
}

/// Parse a package count, ignoring thousands separators.
pub fn parse_count(s: &str) -> Option<u32> {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn to_money(s: &str) -> Option<Decimal> {
    if !s.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let mut amount = Decimal::from_str(s).ok()?;
    amount.rescale(2);
    Some(amount)
}

/// Format an amount in Chilean style (`8.153.962,00`).
pub fn format_chilean_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount);
    let Some((integer_part, decimal_part)) = s.split_once('.') else {
        return s;
    };

    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part),
    };

    let chars: Vec<char> = digits.chars().collect();
    let mut formatted = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{sign}{formatted},{decimal_part}")
}
