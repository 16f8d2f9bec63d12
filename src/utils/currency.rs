/// Currency helpers for pound sterling.
///
/// Monetary values are stored in pence (1 GBP = 100 pence) to avoid
/// floating-point drift when summing earnings.

/// Largest amount accepted from user input, in pounds.
pub const MAX_AMOUNT_POUNDS: f64 = 1_000_000_000.0;

/// Convert pounds to pence (multiply by 100)
pub fn pounds_to_pence(pounds: f64) -> i64 {
    (pounds * 100.0).round() as i64
}

/// Convert pence to pounds (divide by 100)
pub fn pence_to_pounds(pence: i64) -> f64 {
    pence as f64 / 100.0
}

/// Format pence as a pound string with 2 decimal places
pub fn format_pence(pence: i64) -> String {
    format!("£{:.2}", pence_to_pounds(pence))
}

/// Parse a display amount such as `"£30.50"` or `"120"` into pence
pub fn parse_amount_to_pence(amount_str: &str) -> Result<i64, String> {
    amount_str
        .trim()
        .replace('£', "")
        .replace(',', "")
        .parse::<f64>()
        .map_err(|_| "Invalid amount format".to_string())
        .and_then(|amount| {
            if !amount.is_finite() {
                Err("Invalid amount format".to_string())
            } else if amount < 0.0 {
                Err("Amount cannot be negative".to_string())
            } else if amount > MAX_AMOUNT_POUNDS {
                Err("Amount is too large".to_string())
            } else {
                Ok(pounds_to_pence(amount))
            }
        })
}

/// Sums pence amounts, saturating instead of overflowing.
pub fn sum_pence(amounts: impl IntoIterator<Item = i64>) -> i64 {
    amounts.into_iter().fold(0, i64::saturating_add)
}

/// Format a percentage with exactly one decimal place
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pounds_to_pence() {
        assert_eq!(pounds_to_pence(100.0), 10000);
        assert_eq!(pounds_to_pence(0.50), 50);
        assert_eq!(pounds_to_pence(30.50), 3050);
    }

    #[test]
    fn test_format_pence() {
        assert_eq!(format_pence(96000), "£960.00");
        assert_eq!(format_pence(8050), "£80.50");
        assert_eq!(format_pence(0), "£0.00");
    }

    #[test]
    fn test_parse_amount_to_pence() {
        assert_eq!(parse_amount_to_pence("£50"), Ok(5000));
        assert_eq!(parse_amount_to_pence("£30.50"), Ok(3050));
        assert_eq!(parse_amount_to_pence("£1,200.00"), Ok(120000));
        assert_eq!(parse_amount_to_pence("£0.00"), Ok(0));
        assert_eq!(parse_amount_to_pence("-5"), Err("Amount cannot be negative".to_string()));
        assert_eq!(parse_amount_to_pence("abc"), Err("Invalid amount format".to_string()));
    }

    #[test]
    fn test_parse_rejects_non_finite_and_huge_amounts() {
        assert_eq!(parse_amount_to_pence("£inf"), Err("Invalid amount format".to_string()));
        assert_eq!(parse_amount_to_pence("NaN"), Err("Invalid amount format".to_string()));
        assert_eq!(parse_amount_to_pence("1e300"), Err("Amount is too large".to_string()));
        assert_eq!(parse_amount_to_pence("£1,000,000,000"), Ok(100_000_000_000));
    }

    #[test]
    fn test_sum_pence_saturates() {
        assert_eq!(sum_pence([5000, 3050]), 8050);
        assert_eq!(sum_pence([i64::MAX, 96_000]), i64::MAX);
        assert_eq!(sum_pence(Vec::new()), 0);
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(6.0), "6.0%");
        assert_eq!(format_rate(12.5), "12.5%");
    }
}
