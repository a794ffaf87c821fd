use std::fmt;

use serde::{Deserialize, Serialize};

use crate::FieldName;

/// One of the two sequential pages of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Step {
    /// Account credentials.
    #[default]
    First,
    /// Address and business details.
    Second,
}

impl Step {
    /// One-based position used by the step tracker and the step indicator.
    pub fn number(self) -> u8 {
        match self {
            Step::First => 1,
            Step::Second => 2,
        }
    }

    /// Heading shown by the step indicator.
    pub fn title(self) -> &'static str {
        match self {
            Step::First => "Step One",
            Step::Second => "Step Two",
        }
    }

    /// Whether this is the last step, where advancing means submitting.
    pub fn is_last(self) -> bool {
        matches!(self, Step::Second)
    }

    /// Fields the user edits while this step is active, in display order.
    pub fn visible_fields(self) -> &'static [FieldName] {
        match self {
            Step::First => &[
                FieldName::FirstName,
                FieldName::LastName,
                FieldName::Email,
                FieldName::Password,
                FieldName::ConfirmPassword,
            ],
            Step::Second => &[
                FieldName::Type,
                FieldName::Company,
                FieldName::Address,
                FieldName::City,
                FieldName::State,
                FieldName::Zip,
                FieldName::Country,
            ],
        }
    }

    /// All steps in order.
    pub fn all() -> [Step; 2] {
        [Step::First, Step::Second]
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
