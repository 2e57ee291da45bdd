//! Human-readable number formatting for summaries.

/// Format as dollars with thousands separators and cents, e.g. `$1,234,567.89`.
pub fn format_usd(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u128;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, frac)
}

/// Format as millions with one decimal, e.g. `$12.3M`.
pub fn format_millions(value: f64) -> String {
    format!("${:.1}M", value / 1e6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(999.5), "$999.50");
        assert_eq!(format_usd(1000.0), "$1,000.00");
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
        assert_eq!(format_usd(-2500.25), "-$2,500.25");
    }

    #[test]
    fn test_format_millions() {
        assert_eq!(format_millions(12_345_678.0), "$12.3M");
        assert_eq!(format_millions(0.0), "$0.0M");
    }
}
