//! Step-scoped validation of wizard fields.
//!
//! Rules are plain data: each [`FieldRule`] names a field and an ordered list
//! of [`Check`]s. The rules active for a step are the always-active set
//! followed by [`ValidationEngine::rules_for`] that step, so no rule ever
//! inspects ambient state to decide whether it applies.

use enroll_types::{ErrorMap, FieldName, FieldSet, Step};
use once_cell::sync::Lazy;
use regex::Regex;

/// HTML-living-standard email syntax, the same shape browsers accept.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email regex should compile")
});

const MIN_PASSWORD_LENGTH: usize = 5;

/// A single check applied to a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// The value must be non-empty.
    Required { message: &'static str },
    /// A non-empty value must be a syntactically valid email address.
    Email { message: &'static str },
    /// A non-empty value must have at least `min` characters.
    MinLength { min: usize, message: &'static str },
    /// The value must equal the current value of another field.
    MatchesField { other: FieldName, message: &'static str },
}

impl Check {
    /// Evaluate against `value`, reading siblings from `values` when needed.
    fn evaluate(&self, value: &str, values: &FieldSet) -> Option<&'static str> {
        match *self {
            Check::Required { message } => value.is_empty().then_some(message),
            Check::Email { message } => (!value.is_empty() && !EMAIL_REGEX.is_match(value)).then_some(message),
            Check::MinLength { min, message } => {
                (!value.is_empty() && value.chars().count() < min).then_some(message)
            }
            Check::MatchesField { other, message } => (value != values.value(other)).then_some(message),
        }
    }
}

/// The checks for one field, evaluated in order; the first failure wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: FieldName,
    pub checks: &'static [Check],
}

/// Rules active at every step.
const ALWAYS_ACTIVE: &[FieldRule] = &[
    FieldRule {
        field: FieldName::Email,
        checks: &[
            Check::Required { message: "Email is required!" },
            Check::Email { message: "Invalid Email" },
        ],
    },
    FieldRule {
        field: FieldName::FirstName,
        checks: &[Check::Required { message: "First Name is required!" }],
    },
    FieldRule {
        field: FieldName::LastName,
        checks: &[Check::Required { message: "Last Name is required!" }],
    },
    FieldRule {
        field: FieldName::ConfirmPassword,
        checks: &[Check::MatchesField {
            other: FieldName::Password,
            message: "Passwords must match",
        }],
    },
    FieldRule {
        field: FieldName::Password,
        checks: &[
            Check::Required { message: "Password is required!" },
            Check::MinLength {
                min: MIN_PASSWORD_LENGTH,
                message: "Minimum of 5 characters",
            },
        ],
    },
];

/// Rules that only apply while the second step is active.
const SECOND_STEP: &[FieldRule] = &[
    FieldRule {
        field: FieldName::Type,
        checks: &[Check::Required { message: "Type is required!" }],
    },
    FieldRule {
        field: FieldName::Company,
        checks: &[Check::Required { message: "Company is required!" }],
    },
    FieldRule {
        field: FieldName::Address,
        checks: &[Check::Required { message: "Address is required!" }],
    },
    FieldRule {
        field: FieldName::City,
        checks: &[Check::Required { message: "City is required!" }],
    },
    FieldRule {
        field: FieldName::State,
        checks: &[Check::Required { message: "State is required!" }],
    },
    FieldRule {
        field: FieldName::Zip,
        checks: &[Check::Required { message: "Zip is required!" }],
    },
    FieldRule {
        field: FieldName::Country,
        checks: &[Check::Required { message: "Country is required!" }],
    },
];

/// Pure validator for wizard field sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationEngine;

impl ValidationEngine {
    /// Rules that switch on for `step`, in addition to the always-active set.
    pub fn rules_for(step: Step) -> &'static [FieldRule] {
        match step {
            Step::First => &[],
            Step::Second => SECOND_STEP,
        }
    }

    /// Every rule evaluated when validating at `step`.
    pub fn active_rules(step: Step) -> impl Iterator<Item = &'static FieldRule> {
        ALWAYS_ACTIVE.iter().chain(Self::rules_for(step))
    }

    /// Validate `values` at `step`.
    ///
    /// Fields whose rules are not active at `step` are never reported. A
    /// missing key is validated as the empty string.
    pub fn validate(values: &FieldSet, step: Step) -> ErrorMap {
        let mut errors = ErrorMap::new();
        for rule in Self::active_rules(step) {
            let value = values.value(rule.field);
            if let Some(message) = rule.checks.iter().find_map(|check| check.evaluate(value, values)) {
                errors.insert(rule.field, message);
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_one() -> FieldSet {
        FieldSet::new()
            .with(FieldName::Email, "a@b.com")
            .with(FieldName::FirstName, "A")
            .with(FieldName::LastName, "B")
            .with(FieldName::Password, "abcde")
            .with(FieldName::ConfirmPassword, "abcde")
    }

    fn both_steps() -> FieldSet {
        step_one()
            .with(FieldName::Type, "dealer")
            .with(FieldName::Company, "Acme")
            .with(FieldName::Address, "1 Main St")
            .with(FieldName::City, "Springfield")
            .with(FieldName::State, "IL")
            .with(FieldName::Zip, "62701")
            .with(FieldName::Country, "US")
    }

    #[test]
    fn valid_step_one_has_no_errors_at_first() {
        assert!(ValidationEngine::validate(&step_one(), Step::First).is_empty());
    }

    #[test]
    fn each_empty_credential_is_reported() {
        let cases = [
            (FieldName::Email, "Email is required!"),
            (FieldName::FirstName, "First Name is required!"),
            (FieldName::LastName, "Last Name is required!"),
        ];
        for (field, message) in cases {
            let values = step_one().with(field, "");
            let errors = ValidationEngine::validate(&values, Step::First);
            assert_eq!(errors.get(field), Some(message), "{field}");
            assert_eq!(errors.len(), 1, "{field}");
        }
    }

    #[test]
    fn empty_password_reports_required_and_mismatch() {
        let values = step_one().with(FieldName::Password, "");
        let errors = ValidationEngine::validate(&values, Step::First);
        assert_eq!(errors.get(FieldName::Password), Some("Password is required!"));
        assert_eq!(errors.get(FieldName::ConfirmPassword), Some("Passwords must match"));
    }

    #[test]
    fn short_password_reports_minimum_length() {
        let values = step_one()
            .with(FieldName::Password, "abcd")
            .with(FieldName::ConfirmPassword, "abcd");
        let errors = ValidationEngine::validate(&values, Step::First);
        assert_eq!(errors.get(FieldName::Password), Some("Minimum of 5 characters"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn password_length_counts_characters_not_bytes() {
        let values = step_one()
            .with(FieldName::Password, "ééééé")
            .with(FieldName::ConfirmPassword, "ééééé");
        assert!(ValidationEngine::validate(&values, Step::First).is_empty());
    }

    #[test]
    fn astral_characters_count_once_each() {
        let values = step_one()
            .with(FieldName::Password, "😀😀😀")
            .with(FieldName::ConfirmPassword, "😀😀😀");
        let errors = ValidationEngine::validate(&values, Step::First);
        assert_eq!(errors.get(FieldName::Password), Some("Minimum of 5 characters"));
    }

    #[test]
    fn malformed_email_is_invalid() {
        for email in ["plain", "a@", "@b.com", "a b@c.com", "a@-b.com"] {
            let values = step_one().with(FieldName::Email, email);
            let errors = ValidationEngine::validate(&values, Step::First);
            assert_eq!(errors.get(FieldName::Email), Some("Invalid Email"), "{email}");
        }
        for email in ["a@b.com", "first.last+tag@sub.example.org", "x@localhost"] {
            let values = step_one().with(FieldName::Email, email);
            assert!(ValidationEngine::validate(&values, Step::First).is_empty(), "{email}");
        }
    }

    #[test]
    fn confirm_password_tracks_live_password() {
        for password in ["", "abcde", "longer-password", "ünïcødé"] {
            let matching = step_one()
                .with(FieldName::Password, password)
                .with(FieldName::ConfirmPassword, password);
            let errors = ValidationEngine::validate(&matching, Step::First);
            assert!(!errors.contains(FieldName::ConfirmPassword), "{password}");

            let other = format!("{password}x");
            let mismatched = matching.clone().with(FieldName::ConfirmPassword, other);
            let errors = ValidationEngine::validate(&mismatched, Step::First);
            assert_eq!(errors.get(FieldName::ConfirmPassword), Some("Passwords must match"));
            assert_eq!(errors.fields().filter(|f| *f == FieldName::ConfirmPassword).count(), 1);
        }
    }

    #[test]
    fn second_step_fields_are_ignored_at_first() {
        let errors = ValidationEngine::validate(&step_one(), Step::First);
        for field in Step::Second.visible_fields() {
            assert!(!errors.contains(*field));
        }
    }

    #[test]
    fn missing_second_step_fields_are_reported_exactly_at_second() {
        for missing in Step::Second.visible_fields() {
            let mut values = both_steps();
            values.remove(missing.as_str());
            let errors = ValidationEngine::validate(&values, Step::Second);
            assert_eq!(errors.fields().collect::<Vec<_>>(), vec![*missing]);
        }

        let errors = ValidationEngine::validate(&step_one(), Step::Second);
        assert_eq!(errors.len(), Step::Second.visible_fields().len());
        assert_eq!(errors.get(FieldName::Zip), Some("Zip is required!"));
    }

    #[test]
    fn step_one_fields_still_validated_at_second() {
        let values = both_steps().with(FieldName::Email, "");
        let errors = ValidationEngine::validate(&values, Step::Second);
        assert_eq!(errors.get(FieldName::Email), Some("Email is required!"));
    }

    #[test]
    fn active_rules_compose_always_and_step_rules() {
        assert_eq!(ValidationEngine::active_rules(Step::First).count(), ALWAYS_ACTIVE.len());
        assert_eq!(
            ValidationEngine::active_rules(Step::Second).count(),
            ALWAYS_ACTIVE.len() + SECOND_STEP.len()
        );
    }
}
