use chrono::NaiveDate;
use rust_decimal::Decimal;

pub fn fmt_money(d: &Decimal) -> String {
    d.round_dp(2).to_string()
}

/// Short human date for table rows, e.g. "Mar 14, 2025".
pub fn fmt_date_short(d: &NaiveDate) -> String {
    d.format("%b %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn money_rounds_to_cents() {
        assert_eq!(fmt_money(&Decimal::from_str("12.005").unwrap()), "12.00");
        assert_eq!(fmt_money(&Decimal::from_str("3.1").unwrap()), "3.1");
    }

    #[test]
    fn short_date() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(fmt_date_short(&d), "Mar 14, 2025");
    }
}
