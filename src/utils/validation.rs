use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::models::FieldError;
use crate::utils::time::current_age;

/// Inclusive age range accepted for minor registration
pub const MIN_MINOR_AGE: i32 = 5;
pub const MAX_MINOR_AGE: i32 = 17;

lazy_static! {
    /// Letters (including accented Latin letters and ñ/ü) and whitespace
    /// only. Anything else, markup characters in particular, is rejected.
    pub static ref NAME_PATTERN: Regex =
        Regex::new(r"^[A-Za-zÁÉÍÓÚáéíóúÑñÜü\s]+$").expect("invalid name pattern");

    /// Alphanumeric plus hyphen. Blocks SQL metacharacters such as quotes
    /// and semicolons from ever reaching a query.
    pub static ref DNI_PATTERN: Regex =
        Regex::new(r"^[A-Za-z0-9-]+$").expect("invalid dni pattern");

    /// Digits, spaces, hyphens, parentheses and a leading plus
    pub static ref PHONE_PATTERN: Regex =
        Regex::new(r"^[0-9\s\-()+]+$").expect("invalid phone pattern");
}

/// Sex must be exactly "M" or "F"
pub fn validate_sex(value: &str) -> Result<(), ValidationError> {
    if value == "M" || value == "F" {
        Ok(())
    } else {
        Err(ValidationError::new("sex"))
    }
}

/// Parental authorization must be explicitly granted
pub fn validate_parental_authorization(value: &bool) -> Result<(), ValidationError> {
    if *value {
        Ok(())
    } else {
        Err(ValidationError::new("parental_authorization"))
    }
}

/// Computed age must fall within the minor range at validation time
pub fn validate_minor_age(birth_date: &NaiveDate) -> Result<(), ValidationError> {
    let age = current_age(*birth_date);
    if (MIN_MINOR_AGE..=MAX_MINOR_AGE).contains(&age) {
        Ok(())
    } else {
        Err(ValidationError::new("age_range"))
    }
}

/// Flatten `ValidationErrors` into the ordered field-error list the API
/// reports. Nested errors are prefixed with their parent field
/// (`representative.email`), and the result is sorted by field path so a
/// caller always sees every failing field in a stable order.
pub fn collect_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut collected = Vec::new();
    flatten_errors(errors, "", &mut collected);
    collected.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.kind.cmp(&b.kind)));
    collected
}

fn flatten_errors(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    out.push(FieldError {
                        field: path.clone(),
                        message: error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid value for field '{}'", path)),
                        kind: error.code.to_string(),
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                flatten_errors(nested, &path, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    flatten_errors(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_pattern_accepts_accented_names() {
        assert!(NAME_PATTERN.is_match("Juan Carlos"));
        assert!(NAME_PATTERN.is_match("Pérez López"));
        assert!(NAME_PATTERN.is_match("Muñoz Güell"));
    }

    #[test]
    fn name_pattern_rejects_markup() {
        assert!(!NAME_PATTERN.is_match("<script>alert(1)</script>"));
        assert!(!NAME_PATTERN.is_match("Juan<img>"));
        assert!(!NAME_PATTERN.is_match("Juan; DROP TABLE athletes"));
    }

    #[test]
    fn dni_pattern_rejects_sql_metacharacters() {
        assert!(DNI_PATTERN.is_match("12345678"));
        assert!(DNI_PATTERN.is_match("X-1234567-A"));
        assert!(!DNI_PATTERN.is_match("' OR '1'='1"));
        assert!(!DNI_PATTERN.is_match("1234;5678"));
    }

    #[test]
    fn phone_pattern_rejects_letters_and_semicolons() {
        assert!(PHONE_PATTERN.is_match("+593 (07) 123-4567"));
        assert!(!PHONE_PATTERN.is_match("call me"));
        assert!(!PHONE_PATTERN.is_match("0991234567;"));
    }

    #[test]
    fn sex_accepts_only_m_or_f() {
        assert!(validate_sex("M").is_ok());
        assert!(validate_sex("F").is_ok());
        assert!(validate_sex("X").is_err());
        assert!(validate_sex("m").is_err());
        assert!(validate_sex("").is_err());
    }

    #[test]
    fn parental_authorization_must_be_true() {
        assert!(validate_parental_authorization(&true).is_ok());
        assert!(validate_parental_authorization(&false).is_err());
    }

    #[test]
    fn minor_age_bounds_are_inclusive() {
        let today = chrono::Utc::now().date_naive();

        let five_years_ago = today - chrono::Duration::days(365 * 5 + 30);
        assert!(validate_minor_age(&five_years_ago).is_ok());

        let too_young = today - chrono::Duration::days(365 * 3);
        assert!(validate_minor_age(&too_young).is_err());

        let adult = today - chrono::Duration::days(365 * 20);
        assert!(validate_minor_age(&adult).is_err());
    }

    /// Same month/day N years before today. Falls back to Feb 28 when
    /// today is Feb 29 of a leap year.
    fn years_before_today(years: i32) -> NaiveDate {
        let today = chrono::Utc::now().date_naive();
        use chrono::Datelike;
        NaiveDate::from_ymd_opt(today.year() - years, today.month(), today.day())
            .unwrap_or_else(|| {
                NaiveDate::from_ymd_opt(today.year() - years, today.month(), 28).unwrap()
            })
    }

    #[test]
    fn turning_eighteen_today_is_rejected() {
        let birth = years_before_today(18);
        assert!(validate_minor_age(&birth).is_err());
    }

    #[test]
    fn one_day_short_of_eighteen_is_accepted() {
        // Month/day-aware computation, not year subtraction: born one day
        // after today's date 18 years ago, the athlete is still 17.
        let birth = years_before_today(18).succ_opt().unwrap();
        assert!(validate_minor_age(&birth).is_ok());
    }

    #[test]
    fn collect_field_errors_is_sorted_by_field_path() {
        let mut errors = ValidationErrors::new();
        errors.add("phone", ValidationError::new("regex"));
        errors.add("dni", ValidationError::new("length"));

        let collected = collect_field_errors(&errors);
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].field, "dni");
        assert_eq!(collected[1].field, "phone");
    }
}
