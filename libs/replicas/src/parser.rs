//! Resolution of replica specifications into absolute counts.

use crate::{ReplicaSpec, SpecError};

/// Resolves a [`ReplicaSpec`] against a workload total.
///
/// Implementations must be deterministic and free of side effects: the
/// allocator may call them once per subset on every allocation.
pub trait ReplicaSpecParser {
    /// Returns the absolute replica count for `spec`, in `[0, total]`.
    fn parse(&self, total: u32, spec: &ReplicaSpec) -> Result<u32, SpecError>;
}

/// The default parser: absolute counts and `N%` percentages.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardParser;

impl StandardParser {
    fn parse_count(total: u32, count: i64) -> Result<u32, SpecError> {
        if count < 0 {
            return Err(SpecError::Negative(count));
        }
        if count > i64::from(total) {
            return Err(SpecError::OutOfRange { count, total });
        }
        Ok(count as u32)
    }

    fn parse_percent(total: u32, text: &str) -> Result<u32, SpecError> {
        let trimmed = text.trim();
        let Some(number) = trimmed.strip_suffix('%') else {
            return Err(SpecError::MissingPercent(text.to_string()));
        };

        let percent: i64 = number
            .parse()
            .map_err(|_| SpecError::InvalidPercent(text.to_string()))?;
        if !(0..=100).contains(&percent) {
            return Err(SpecError::PercentOutOfRange(text.to_string()));
        }

        // Round half up; the result never exceeds total since percent <= 100.
        let resolved = (u64::from(total) * percent as u64 + 50) / 100;
        Ok(resolved as u32)
    }
}

impl ReplicaSpecParser for StandardParser {
    fn parse(&self, total: u32, spec: &ReplicaSpec) -> Result<u32, SpecError> {
        match spec {
            ReplicaSpec::Count(count) => Self::parse_count(total, *count),
            ReplicaSpec::Text(text) => Self::parse_percent(total, text),
        }
    }
}

impl<F> ReplicaSpecParser for F
where
    F: Fn(u32, &ReplicaSpec) -> Result<u32, SpecError>,
{
    fn parse(&self, total: u32, spec: &ReplicaSpec) -> Result<u32, SpecError> {
        self(total, spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse(total: u32, spec: impl Into<ReplicaSpec>) -> Result<u32, SpecError> {
        StandardParser.parse(total, &spec.into())
    }

    #[test]
    fn test_absolute_counts() {
        assert_eq!(parse(10, 0i64), Ok(0));
        assert_eq!(parse(10, 7i64), Ok(7));
        assert_eq!(parse(10, 10i64), Ok(10));

        assert_eq!(parse(10, -1i64), Err(SpecError::Negative(-1)));
        assert_eq!(
            parse(10, 11i64),
            Err(SpecError::OutOfRange {
                count: 11,
                total: 10
            })
        );
    }

    #[test]
    fn test_percentages_round_half_up() {
        assert_eq!(parse(10, "30%"), Ok(3));
        assert_eq!(parse(5, "50%"), Ok(3));
        assert_eq!(parse(5, "10%"), Ok(1));
        assert_eq!(parse(3, "33%"), Ok(1));
        assert_eq!(parse(0, "100%"), Ok(0));
        assert_eq!(parse(7, "100%"), Ok(7));
        assert_eq!(parse(7, " 0% "), Ok(0));
    }

    #[test]
    fn test_percent_errors() {
        let missing = parse(10, "30").unwrap_err();
        assert_eq!(missing, SpecError::MissingPercent("30".to_string()));
        assert!(missing.is_percent_error());

        assert_eq!(
            parse(10, "abc%"),
            Err(SpecError::InvalidPercent("abc%".to_string()))
        );
        assert_eq!(
            parse(10, "%"),
            Err(SpecError::InvalidPercent("%".to_string()))
        );
        assert_eq!(
            parse(10, " 50 %"),
            Err(SpecError::InvalidPercent(" 50 %".to_string()))
        );
        assert_eq!(
            parse(10, "101%"),
            Err(SpecError::PercentOutOfRange("101%".to_string()))
        );
        assert_eq!(
            parse(10, "-5%"),
            Err(SpecError::PercentOutOfRange("-5%".to_string()))
        );

        assert!(!SpecError::Negative(-1).is_percent_error());
    }

    #[test]
    fn test_closure_parser() {
        let fixed = |_total: u32, _spec: &ReplicaSpec| -> Result<u32, SpecError> { Ok(2) };
        assert_eq!(fixed.parse(10, &ReplicaSpec::text("anything")), Ok(2));
    }

    proptest! {
        #[test]
        fn percent_always_within_total(total in 0u32..100_000, percent in 0i64..=100) {
            let resolved = parse(total, format!("{}%", percent)).unwrap();
            prop_assert!(resolved <= total);
        }

        #[test]
        fn in_range_counts_are_identity(total in 0u32..10_000, pick in 0u32..10_000) {
            let count = pick % (total + 1);
            prop_assert_eq!(parse(total, i64::from(count)), Ok(count));
        }
    }
}
