//! Display Formatting
//!
//! Pure functions turning payroll amounts into the strings shown on stat
//! cards, chart labels, tooltips, and table cells.

use std::fmt;

/// Number of fraction digits used by [`format_currency_full`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// `$1,235`
    Whole,
    /// `$1,234.56`
    Cents,
}

impl Precision {
    fn digits(self) -> usize {
        match self {
            Precision::Whole => 0,
            Precision::Cents => 2,
        }
    }
}

/// Insert `,` separators into a run of ASCII digits
fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Format a non-negative value with thousands separators and a fixed number
/// of fraction digits
fn group_decimal(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value);
    match fixed.split_once('.') {
        Some((int, frac)) => format!("{}.{}", group_digits(int), frac),
        None => group_digits(&fixed),
    }
}

fn sign_of(value: f64) -> &'static str {
    if value < 0.0 {
        "-"
    } else {
        ""
    }
}

/// Thousands-grouped integer: `22451` becomes `22,451`
pub fn format_count(value: u64) -> String {
    group_digits(&value.to_string())
}

/// Compact currency used on stat cards and chart labels.
///
/// - `>= 1,000,000` renders as `$X.XM`
/// - `>= 1,000` renders as `$XK`
/// - anything smaller renders as a grouped whole-dollar amount
pub fn format_currency(value: f64) -> String {
    let sign = sign_of(value);
    let abs = value.abs();

    if abs >= 1_000_000.0 {
        let millions = (abs / 1_000_000.0 * 10.0).round() / 10.0;
        format!("{}${:.1}M", sign, millions)
    } else if abs >= 1_000.0 {
        format!("{}${:.0}K", sign, (abs / 1_000.0).round())
    } else {
        format!("{}${}", sign, group_decimal(abs.round(), 0))
    }
}

/// Full currency used in table cells and tooltips
pub fn format_currency_full(value: f64, precision: Precision) -> String {
    format!(
        "{}${}",
        sign_of(value),
        group_decimal(value.abs(), precision.digits())
    )
}

/// One-decimal percentage: `61.234` becomes `61.2%`
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Direction of a year-over-year change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Unchanged,
}

impl Direction {
    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Up => "▲",
            Direction::Down => "▼",
            Direction::Unchanged => "–",
        }
    }
}

/// A formatted change against the prior period
#[derive(Debug, Clone, PartialEq)]
pub struct Variance {
    pub direction: Direction,
    /// Absolute difference, formatted by the magnitude of the current value
    pub difference: String,
    /// Absolute percentage change, one decimal, without the `%` sign
    pub percent: String,
}

impl fmt::Display for Variance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}%)",
            self.direction.arrow(),
            self.difference,
            self.percent
        )
    }
}

/// Compare `current` against `prior`.
///
/// Returns `None` when there is nothing to compare against: a missing or zero
/// prior value.
pub fn variance(current: f64, prior: Option<f64>) -> Option<Variance> {
    let prior = prior.filter(|p| *p != 0.0)?;
    let diff = current - prior;

    let direction = if diff > 0.0 {
        Direction::Up
    } else if diff < 0.0 {
        Direction::Down
    } else {
        Direction::Unchanged
    };

    let magnitude = current.abs();
    let abs_diff = diff.abs();
    let difference = if magnitude >= 1_000_000.0 {
        format_currency(abs_diff)
    } else if magnitude >= 1_000.0 {
        group_decimal(abs_diff.round(), 0)
    } else {
        group_decimal(abs_diff, 2)
    };

    let percent = format!("{:.1}", (diff / prior * 100.0).abs());

    Some(Variance {
        direction,
        difference,
        percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_millions() {
        assert_eq!(format_currency(1_000_000.0), "$1.0M");
        assert_eq!(format_currency(2_345_678.0), "$2.3M");
        assert_eq!(format_currency(1_250_000.0), "$1.3M");
        assert_eq!(format_currency(987_654_321.0), "$987.7M");
    }

    #[test]
    fn test_compact_millions_matches_rounded_quotient() {
        for v in [1_000_000.0, 1_049_999.0, 1_050_000.0, 12_345_678.9, 450_000_000.0] {
            let expected = format!("${:.1}M", (v / 1e6 * 10.0_f64).round() / 10.0);
            assert_eq!(format_currency(v), expected);
        }
    }

    #[test]
    fn test_compact_thousands() {
        assert_eq!(format_currency(1_000.0), "$1K");
        assert_eq!(format_currency(1_499.0), "$1K");
        assert_eq!(format_currency(1_500.0), "$2K");
        assert_eq!(format_currency(85_432.1), "$85K");
        assert_eq!(format_currency(999_499.0), "$999K");
    }

    #[test]
    fn test_compact_small_values() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(523.45), "$523");
        assert_eq!(format_currency(999.0), "$999");
    }

    #[test]
    fn test_compact_negative() {
        assert_eq!(format_currency(-2_500_000.0), "-$2.5M");
        assert_eq!(format_currency(-12.0), "-$12");
    }

    #[test]
    fn test_full_currency() {
        assert_eq!(format_currency_full(1234.5, Precision::Cents), "$1,234.50");
        assert_eq!(format_currency_full(98765.432, Precision::Cents), "$98,765.43");
        assert_eq!(format_currency_full(1234567.0, Precision::Whole), "$1,234,567");
        assert_eq!(format_currency_full(0.0, Precision::Cents), "$0.00");
        assert_eq!(format_currency_full(-42.0, Precision::Cents), "-$42.00");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(22451), "22,451");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(61.26), "61.3%");
        assert_eq!(format_percent(0.0), "0.0%");
    }

    #[test]
    fn test_variance_without_prior() {
        for current in [0.0, 12.5, 4_000.0, 9_000_000.0, -3.0] {
            assert!(variance(current, None).is_none());
            assert!(variance(current, Some(0.0)).is_none());
        }
    }

    #[test]
    fn test_variance_millions() {
        let v = variance(2_200_000_000.0, Some(2_000_000_000.0)).unwrap();
        assert_eq!(v.direction, Direction::Up);
        assert_eq!(v.difference, "$200.0M");
        assert_eq!(v.percent, "10.0");
        assert_eq!(v.to_string(), "▲ $200.0M (10.0%)");
    }

    #[test]
    fn test_variance_thousands() {
        let v = variance(21_000.0, Some(22_234.0)).unwrap();
        assert_eq!(v.direction, Direction::Down);
        assert_eq!(v.difference, "1,234");
        assert_eq!(v.percent, "5.6");
    }

    #[test]
    fn test_variance_small_values() {
        let v = variance(12.5, Some(10.0)).unwrap();
        assert_eq!(v.direction, Direction::Up);
        assert_eq!(v.difference, "2.50");
        assert_eq!(v.percent, "25.0");
    }

    #[test]
    fn test_variance_unchanged() {
        let v = variance(500.0, Some(500.0)).unwrap();
        assert_eq!(v.direction, Direction::Unchanged);
        assert_eq!(v.to_string(), "– 0.00 (0.0%)");
    }
}
