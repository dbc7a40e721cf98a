//! Duration string parsing for token TTL configuration

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::AuthError;

static DURATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d+)([smhd])?$").expect("duration pattern is a valid regex"));

/// Parse a duration of the form `<integer><unit>` into seconds.
///
/// Unit is one of `s`, `m`, `h`, `d` (case-insensitive) and defaults to
/// seconds when omitted. Any other shape is a configuration error.
pub fn parse_duration(value: &str) -> Result<u64, AuthError> {
    let captures = DURATION_PATTERN.captures(value).ok_or_else(|| {
        AuthError::configuration(format!(
            "Invalid duration '{value}': expected <integer><unit> with unit s, m, h or d"
        ))
    })?;

    let amount: u64 = captures[1]
        .parse()
        .map_err(|_| AuthError::configuration(format!("Duration '{value}' is out of range")))?;

    let multiplier = match captures
        .get(2)
        .and_then(|m| m.as_str().chars().next())
        .map(|c| c.to_ascii_lowercase())
    {
        None | Some('s') => 1,
        Some('m') => 60,
        Some('h') => 60 * 60,
        Some('d') => 60 * 60 * 24,
        Some(other) => {
            return Err(AuthError::configuration(format!(
                "Unknown duration unit '{other}'"
            )))
        }
    };

    amount
        .checked_mul(multiplier)
        .ok_or_else(|| AuthError::configuration(format!("Duration '{value}' is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_integer_is_seconds() {
        assert_eq!(parse_duration("90").unwrap(), 90);
        assert_eq!(parse_duration("0").unwrap(), 0);
    }

    #[test]
    fn test_units() {
        assert_eq!(parse_duration("30s").unwrap(), 30);
        assert_eq!(parse_duration("15m").unwrap(), 900);
        assert_eq!(parse_duration("2h").unwrap(), 7_200);
        assert_eq!(parse_duration("7d").unwrap(), 604_800);
    }

    #[test]
    fn test_units_are_case_insensitive() {
        assert_eq!(parse_duration("15M").unwrap(), 900);
        assert_eq!(parse_duration("7D").unwrap(), 604_800);
    }

    #[test]
    fn test_rejects_malformed_input() {
        for value in ["", "m", "1.5h", "10 m", "-5s", "5w", "h5", "5hh"] {
            let result = parse_duration(value);
            assert!(
                matches!(result, Err(AuthError::Configuration { .. })),
                "'{value}' should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_overflow() {
        let result = parse_duration("99999999999999999999d");
        assert!(matches!(result, Err(AuthError::Configuration { .. })));
    }
}
