//! Dollar formatting and percentage rounding helpers.

/// Formats a dollar amount with thousands separators.
///
/// Whole-dollar amounts print without decimals; fractional amounts keep up
/// to two decimals with trailing zeros dropped.
///
/// # Examples
/// ```
/// use captable_core::money::format_currency;
///
/// assert_eq!(format_currency(1_000_000.0), "$1,000,000");
/// assert_eq!(format_currency(2_346_666.666), "$2,346,666.67");
/// assert_eq!(format_currency(-1_500.5), "-$1,500.5");
/// ```
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("${}", value);
    }
    let cents = (value.abs() * 100.0).round() as u128;
    let whole = cents / 100;
    let frac = cents % 100;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac {
        0 => format!("{}${}", sign, grouped),
        f if f % 10 == 0 => format!("{}${}.{}", sign, grouped, f / 10),
        f => format!("{}${}.{:02}", sign, grouped, f),
    }
}

/// Percentage of `whole` represented by `part`, rounded to two decimals.
///
/// Returns zero when `whole` is zero.
///
/// # Examples
/// ```
/// use captable_core::money::round_percentage;
///
/// assert_eq!(round_percentage(1.0, 3.0), 33.33);
/// assert_eq!(round_percentage(5.0, 0.0), 0.0);
/// ```
pub fn round_percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    (part / whole * 10_000.0).round() / 100.0
}
