use chrono::{Local, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

use crate::models::field::{FieldKind, FieldSpec, ValidationResult};

pub const REQUIRED_MESSAGE: &str = "field is mandatory.";
pub const EMAIL_MESSAGE: &str = "enter a valid email address.";
pub const PLATE_MESSAGE: &str = "plate must look like ABC-123.";
pub const NUMBER_MESSAGE: &str = "must be a whole number.";
pub const DATE_MESSAGE: &str = "enter a valid date.";
pub const PAST_DATE_MESSAGE: &str = "date must be in the future.";

/// Default national phone numbering plan: nine digits.
pub const DEFAULT_PHONE_DIGITS: usize = 9;

/// Alphanumerics in a plate once the separator is removed.
const PLATE_CHARS: usize = 6;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PLATE_RE: OnceLock<Regex> = OnceLock::new();

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"))
}

fn plate_re() -> &'static Regex {
    PLATE_RE.get_or_init(|| Regex::new(r"^[A-Z]{3}-[0-9]{3}$").expect("plate pattern"))
}

/// Rules that vary per deployment rather than per field.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationPolicy {
    pub phone_digits: usize,
    /// Fixed clock for date checks; `None` reads the local wall clock.
    pub now: Option<NaiveDateTime>,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            phone_digits: DEFAULT_PHONE_DIGITS,
            now: None,
        }
    }
}

impl ValidationPolicy {
    fn now(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(|| Local::now().naive_local())
    }
}

/// Single validator for every form input, parameterized by [`FieldSpec`].
#[derive(Debug, Clone, Default)]
pub struct Validator {
    policy: ValidationPolicy,
}

impl Validator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Decide whether `raw` is acceptable for `spec` and normalize it.
    ///
    /// Empty optional inputs are accepted without running kind checks.
    pub fn validate(&self, spec: &FieldSpec, raw: &str) -> ValidationResult {
        let value = raw.trim();
        if value.is_empty() {
            return if spec.required {
                ValidationResult::rejected("", REQUIRED_MESSAGE)
            } else {
                ValidationResult::accepted("")
            };
        }

        match spec.kind {
            FieldKind::Text => ValidationResult::accepted(value),
            FieldKind::Email => validate_email(value),
            FieldKind::Tel => validate_phone(value, self.policy.phone_digits),
            FieldKind::Number => validate_number(value, spec.min, spec.max),
            FieldKind::Plate => validate_plate(value),
            FieldKind::DateTime => validate_future_datetime(value, self.policy.now()),
        }
    }
}

fn validate_email(value: &str) -> ValidationResult {
    if email_re().is_match(value) {
        ValidationResult::accepted(value)
    } else {
        ValidationResult::rejected(value, EMAIL_MESSAGE)
    }
}

fn validate_phone(value: &str, digits: usize) -> ValidationResult {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() == digits && compact.chars().all(|c| c.is_ascii_digit()) {
        ValidationResult::accepted(compact)
    } else {
        ValidationResult::rejected(
            compact,
            format!("phone number must have exactly {} digits.", digits),
        )
    }
}

fn validate_number(value: &str, min: Option<i64>, max: Option<i64>) -> ValidationResult {
    let Ok(number) = value.parse::<i64>() else {
        return ValidationResult::rejected(value, NUMBER_MESSAGE);
    };

    match (min, max) {
        (Some(min), _) if number < min => {
            ValidationResult::rejected(value, format!("must be at least {}.", min))
        }
        (_, Some(max)) if number > max => {
            ValidationResult::rejected(value, format!("must be at most {}.", max))
        }
        _ => ValidationResult::accepted(number.to_string()),
    }
}

fn validate_plate(value: &str) -> ValidationResult {
    let compact = plate_chars(value);
    let normalized = if compact.len() == PLATE_CHARS {
        format!("{}-{}", &compact[..3], &compact[3..])
    } else {
        compact
    };

    if plate_re().is_match(&normalized) {
        ValidationResult::accepted(normalized)
    } else {
        ValidationResult::rejected(normalized, PLATE_MESSAGE)
    }
}

fn validate_future_datetime(value: &str, now: NaiveDateTime) -> ValidationResult {
    let Some(when) = parse_datetime(value) else {
        return ValidationResult::rejected(value, DATE_MESSAGE);
    };

    let normalized = when.format("%Y-%m-%dT%H:%M").to_string();
    if when <= now {
        ValidationResult::rejected(normalized, PAST_DATE_MESSAGE)
    } else {
        ValidationResult::accepted(normalized)
    }
}

/// Accepts `datetime-local` input values and bare dates (read as midnight).
fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Uppercased ASCII alphanumerics of a plate, separators dropped.
fn plate_chars(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

// ── Input formatters ─────────────────────────────────────────────────
// Applied on every input change, independently of validation.

/// Group up to `digits` phone digits in threes: "987654321" → "987 654 321".
pub fn format_phone(raw: &str, digits: usize) -> String {
    let kept: Vec<char> = raw
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(digits)
        .collect();

    kept.chunks(3)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercase, keep up to six alphanumerics, separate after the third:
/// "abc123" → "ABC-123".
pub fn format_plate(raw: &str) -> String {
    let kept: String = plate_chars(raw).chars().take(PLATE_CHARS).collect();
    if kept.len() > 3 {
        format!("{}-{}", &kept[..3], &kept[3..])
    } else {
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field::FieldDecoration;

    fn validator() -> Validator {
        Validator::new(ValidationPolicy {
            phone_digits: 9,
            now: NaiveDate::from_ymd_opt(2026, 3, 10).and_then(|d| d.and_hms_opt(12, 0, 0)),
        })
    }

    fn spec(kind: FieldKind) -> FieldSpec {
        FieldSpec::required("field", "Field", kind)
    }

    #[test]
    fn test_required_empty_rejected_for_every_kind() {
        let v = validator();
        for kind in [
            FieldKind::Text,
            FieldKind::Email,
            FieldKind::Tel,
            FieldKind::Number,
            FieldKind::Plate,
            FieldKind::DateTime,
        ] {
            for raw in ["", "   ", "\t\n"] {
                let result = v.validate(&spec(kind), raw);
                assert!(!result.valid, "{kind} accepted {raw:?}");
                assert_eq!(result.message.as_deref(), Some(REQUIRED_MESSAGE));
            }
        }
    }

    #[test]
    fn test_phone_rules() {
        let v = validator();
        let tel = spec(FieldKind::Tel);
        assert!(v.validate(&tel, "987654321").valid);
        assert!(!v.validate(&tel, "12345").valid);

        let spaced = v.validate(&tel, "987 654 321");
        assert!(spaced.valid);
        assert_eq!(spaced.normalized_value, "987654321");

        assert!(!v.validate(&tel, "98765432a").valid);
        assert!(!v.validate(&tel, "9876543210").valid);
    }

    #[test]
    fn test_phone_digit_count_is_policy() {
        let v = Validator::new(ValidationPolicy {
            phone_digits: 10,
            now: None,
        });
        let tel = spec(FieldKind::Tel);
        assert!(v.validate(&tel, "5551234567").valid);
        let result = v.validate(&tel, "987654321");
        assert_eq!(
            result.message.as_deref(),
            Some("phone number must have exactly 10 digits.")
        );
    }

    #[test]
    fn test_email_rules() {
        let v = validator();
        assert!(v.validate(&spec(FieldKind::Email), "a@b.co").valid);
        assert!(!v.validate(&spec(FieldKind::Email), "a@b").valid);
        assert!(!v.validate(&spec(FieldKind::Email), "a b@c.de").valid);
        assert!(!v.validate(&spec(FieldKind::Email), "a@@b.co").valid);

        let optional = FieldSpec::optional("email", "Email", FieldKind::Email);
        let empty = v.validate(&optional, "");
        assert!(empty.valid);
        assert_eq!(empty.message, None);
        assert_eq!(empty.decoration(), FieldDecoration::Neutral);
    }

    #[test]
    fn test_number_bounds_inclusive() {
        let v = validator();
        let year = spec(FieldKind::Number).with_bounds(Some(1950), Some(2027));
        assert!(v.validate(&year, "1950").valid);
        assert!(v.validate(&year, "2027").valid);
        assert_eq!(
            v.validate(&year, "1949").message.as_deref(),
            Some("must be at least 1950.")
        );
        assert_eq!(
            v.validate(&year, "2028").message.as_deref(),
            Some("must be at most 2027.")
        );
        assert_eq!(
            v.validate(&year, "20x8").message.as_deref(),
            Some(NUMBER_MESSAGE)
        );
    }

    #[test]
    fn test_plate_normalization() {
        let v = validator();
        let plate = spec(FieldKind::Plate);
        let result = v.validate(&plate, "abc123");
        assert!(result.valid);
        assert_eq!(result.normalized_value, "ABC-123");

        assert!(v.validate(&plate, "abc 123").valid);
        assert!(v.validate(&plate, "ABC-123").valid);
        assert!(!v.validate(&plate, "AB12").valid);
        assert!(!v.validate(&plate, "123ABC").valid);
        assert!(!v.validate(&plate, "ABC1234").valid);
    }

    #[test]
    fn test_datetime_must_be_future() {
        let v = validator();
        let when = spec(FieldKind::DateTime);
        let ok = v.validate(&when, "2026-03-11T09:30");
        assert!(ok.valid);
        assert_eq!(ok.normalized_value, "2026-03-11T09:30");

        assert_eq!(
            v.validate(&when, "2026-03-10T12:00").message.as_deref(),
            Some(PAST_DATE_MESSAGE)
        );
        assert_eq!(
            v.validate(&when, "2026-03-10").message.as_deref(),
            Some(PAST_DATE_MESSAGE)
        );
        assert_eq!(
            v.validate(&when, "next tuesday").message.as_deref(),
            Some(DATE_MESSAGE)
        );
    }

    #[test]
    fn test_text_is_trimmed() {
        let result = validator().validate(&spec(FieldKind::Text), "  Corolla ");
        assert_eq!(result.normalized_value, "Corolla");
        assert_eq!(result.decoration(), FieldDecoration::Success);
    }

    #[test]
    fn test_formatters() {
        assert_eq!(format_phone("987654321", 9), "987 654 321");
        assert_eq!(format_phone("98765", 9), "987 65");
        assert_eq!(format_phone("(987) 654-321 99", 9), "987 654 321");
        assert_eq!(format_plate("abc123"), "ABC-123");
        assert_eq!(format_plate("ab"), "AB");
        assert_eq!(format_plate("abc1234"), "ABC-123");
    }

    #[test]
    fn test_formatters_idempotent() {
        for raw in ["987654321", "98 76", "", "(01) 234"] {
            let once = format_phone(raw, 9);
            assert_eq!(format_phone(&once, 9), once);
        }
        for raw in ["abc123", "a-b", "xyz9", "ABC-123"] {
            let once = format_plate(raw);
            assert_eq!(format_plate(&once), once);
        }
    }

    #[test]
    fn test_formatted_plate_passes_validation() {
        let formatted = format_plate("abc123");
        assert!(validator().validate(&spec(FieldKind::Plate), &formatted).valid);
    }
}
