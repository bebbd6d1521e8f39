//! Formatting helpers for presenting transactions and summaries
//!
//! Everything here is pure: no I/O, no clock access unless the caller
//! passes the reference year in.

use rust_decimal::{Decimal, RoundingStrategy};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Insert a separator every three digits of an unsigned digit string
pub fn group_thousands(digits: &str, separator: &str) -> String {
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push_str(&separator.chars().rev().collect::<String>());
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    result.chars().rev().collect()
}

/// Format a decimal with a fixed number of places and custom separators.
///
/// Rounds half away from zero, so `2.345` with two places becomes `2.35`.
pub fn format_decimal(
    value: Decimal,
    decimal_places: u32,
    thousands_separator: &str,
    decimal_separator: &str,
) -> String {
    let rounded = value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = format!("{:.*}", decimal_places as usize, rounded.abs());

    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part, thousands_separator));
    if let Some(frac) = frac_part {
        out.push_str(decimal_separator);
        out.push_str(frac);
    }
    out
}

/// Attach a currency symbol before or after an already formatted number
pub fn with_symbol(formatted: &str, symbol: &str, symbol_before: bool) -> String {
    if symbol.is_empty() {
        formatted.to_string()
    } else if symbol_before {
        format!("{} {}", symbol, formatted)
    } else {
        format!("{} {}", formatted, symbol)
    }
}

/// English month name for 1-12
pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_NAMES.get(index as usize).copied())
}

/// Years offered by a selector centred on `current_year`, ascending
pub fn year_window(current_year: i32, before: u32, after: u32) -> Vec<i32> {
    let start = current_year.saturating_sub(before as i32);
    let end = current_year.saturating_add(after as i32);
    (start..=end).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1", ","), "1");
        assert_eq!(group_thousands("1000", ","), "1,000");
        assert_eq!(group_thousands("1234567", "."), "1.234.567");
        assert_eq!(group_thousands("123456", ""), "123456");
    }

    #[test]
    fn test_format_decimal_two_places() {
        assert_eq!(format_decimal(dec("1000"), 2, ",", "."), "1,000.00");
        assert_eq!(format_decimal(dec("1234.5"), 2, ".", ","), "1.234,50");
        assert_eq!(format_decimal(dec("2.345"), 2, ",", "."), "2.35");
        assert_eq!(format_decimal(dec("0"), 2, ",", "."), "0.00");
    }

    #[test]
    fn test_format_decimal_negative() {
        assert_eq!(format_decimal(dec("-1500.1"), 2, ",", "."), "-1,500.10");
        assert_eq!(format_decimal(dec("-0.001"), 2, ",", "."), "0.00");
    }

    #[test]
    fn test_format_decimal_no_places() {
        assert_eq!(format_decimal(dec("1999.5"), 0, ",", "."), "2,000");
    }

    #[test]
    fn test_with_symbol() {
        assert_eq!(with_symbol("10.00", "R$", true), "R$ 10.00");
        assert_eq!(with_symbol("10.00", "EUR", false), "10.00 EUR");
        assert_eq!(with_symbol("10.00", "", true), "10.00");
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn test_year_window() {
        assert_eq!(year_window(2024, 3, 3), vec![2021, 2022, 2023, 2024, 2025, 2026, 2027]);
        assert_eq!(year_window(2024, 0, 0), vec![2024]);
    }
}
