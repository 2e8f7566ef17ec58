use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ConfigError;

static INTERVAL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\[\(]\s*[-+]?(inf|\d*\.?\d+)\s*,\s*[-+]?(inf|\d*\.?\d+)\s*[\]\)]$")
        .expect("interval pattern is valid")
});

/// Numeric interval with independently open/closed endpoints.
///
/// Parsed from the grammar
/// `<left_bracket> <number | ±inf> , <number | ±inf> <right_bracket>`
/// where `[`/`]` close an endpoint and `(`/`)` leave it open:
///
/// | interval         | comparison                |
/// |------------------|---------------------------|
/// | `[lower, upper]` | `lower <= x <= upper`     |
/// | `(lower, upper]` | `lower <  x <= upper`     |
/// | `[lower, upper)` | `lower <= x <  upper`     |
/// | `(lower, upper)` | `lower <  x <  upper`     |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
    pub lower_closed: bool,
    pub upper_closed: bool,
}

impl Interval {
    /// Whether `value` satisfies both endpoint comparisons.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.satisfies_lower(value) && self.satisfies_upper(value)
    }

    pub(crate) fn satisfies_lower(&self, value: f64) -> bool {
        if self.lower_closed {
            value >= self.lower
        } else {
            value > self.lower
        }
    }

    pub(crate) fn satisfies_upper(&self, value: f64) -> bool {
        if self.upper_closed {
            value <= self.upper
        } else {
            value < self.upper
        }
    }
}

impl FromStr for Interval {
    type Err = ConfigError;

    fn from_str(interval: &str) -> Result<Self, Self::Err> {
        if !INTERVAL_PATTERN.is_match(interval) {
            return Err(ConfigError::BadIntervalFormat(interval.to_string()));
        }

        let lower_closed = interval.starts_with('[');
        let upper_closed = interval.ends_with(']');
        let inner = &interval[1..interval.len() - 1];
        let (lower_str, upper_str) = inner
            .split_once(',')
            .ok_or_else(|| ConfigError::BadIntervalFormat(interval.to_string()))?;

        let lower = parse_endpoint(lower_str)
            .ok_or_else(|| ConfigError::BadIntervalFormat(interval.to_string()))?;
        let upper = parse_endpoint(upper_str)
            .ok_or_else(|| ConfigError::BadIntervalFormat(interval.to_string()))?;

        if lower > upper {
            return Err(ConfigError::InvertedBounds { lower, upper });
        }

        Ok(Self {
            lower,
            upper,
            lower_closed,
            upper_closed,
        })
    }
}

fn parse_endpoint(raw: &str) -> Option<f64> {
    match raw.trim() {
        "inf" | "+inf" => Some(f64::INFINITY),
        "-inf" => Some(f64::NEG_INFINITY),
        value => value.parse().ok(),
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let left = if self.lower_closed { '[' } else { '(' };
        let right = if self.upper_closed { ']' } else { ')' };
        write!(f, "{left}{}, {}{right}", self.lower, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_bracket_combinations() {
        let closed: Interval = "[0.0, 1.0]".parse().unwrap();
        assert!(closed.lower_closed && closed.upper_closed);

        let open: Interval = "(0.0, 1.0)".parse().unwrap();
        assert!(!open.lower_closed && !open.upper_closed);

        let half: Interval = "[ 0.0 , 1.0 )".parse().unwrap();
        assert!(half.lower_closed && !half.upper_closed);
    }

    #[test]
    fn half_open_comparisons_match_the_bracket_table() {
        let interval: Interval = "[0.0, 1.0)".parse().unwrap();
        assert!(interval.contains(0.0));
        assert!(interval.contains(0.999));
        assert!(!interval.contains(1.0));
        assert!(!interval.contains(-0.01));

        let interval: Interval = "(0.0, 1.0]".parse().unwrap();
        assert!(!interval.contains(0.0));
        assert!(interval.contains(1.0));
    }

    #[test]
    fn infinite_endpoints_are_accepted() {
        let interval: Interval = "[0, +inf]".parse().unwrap();
        assert!(interval.contains(1e300));
        assert!(!interval.contains(-0.5));

        let interval: Interval = "(-inf, 0)".parse().unwrap();
        assert!(interval.contains(-1e300));
        assert!(!interval.contains(0.0));
    }

    #[test]
    fn malformed_strings_fail_before_any_comparison() {
        for bad in ["0.0,1.0", "[0.0 1.0]", "[a, b]", "", "[0.0, 1.0", "0.0, 1.0)"] {
            assert!(
                matches!(bad.parse::<Interval>(), Err(ConfigError::BadIntervalFormat(_))),
                "{bad:?} should be rejected as badly formatted"
            );
        }
    }

    #[test]
    fn inverted_bounds_are_a_range_error() {
        assert!(matches!(
            "[5, 1]".parse::<Interval>(),
            Err(ConfigError::InvertedBounds { .. })
        ));
    }

    #[test]
    fn display_renders_the_human_readable_form() {
        let interval: Interval = "[0.0, 1.0)".parse().unwrap();
        assert_eq!(interval.to_string(), "[0, 1)");
    }
}
