//! Utility functions for formatting amounts in console previews
//!
//! US conventions: `,` groups thousands, `.` separates decimals, and the
//! sign goes before the currency symbol.

use rust_decimal::Decimal;

/// Format as US dollars: "$1,234.56"
///
/// # Examples
/// ```
/// use stockrev::utils::format_usd;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_usd(dec!(24578)), "$24,578.00");
/// assert_eq!(format_usd(dec!(-500)), "-$500.00");
/// ```
pub fn format_usd(value: Decimal) -> String {
    let sign = if value < Decimal::ZERO { "-" } else { "" };
    let formatted = format!("{:.2}", value.abs());
    let (integer_part, decimal_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let digits: Vec<char> = integer_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    format!("{}${}.{}", sign, grouped, decimal_part)
}
