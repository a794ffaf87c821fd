use serde::{Deserialize, Serialize};

use crate::{FieldName, FieldSet};

/// Exact JSON body sent to the registration service.
///
/// The struct has no slot for `confirmPassword` or the step tracker, so a
/// payload built from any [`FieldSet`] can never carry them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub company: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub user_type: String,
}

impl SubmissionPayload {
    /// Build the payload from merged wizard values, dropping transient keys.
    pub fn from_fields(fields: &FieldSet) -> Self {
        let value = |field: FieldName| fields.value(field).to_string();
        Self {
            email: value(FieldName::Email),
            first_name: value(FieldName::FirstName),
            last_name: value(FieldName::LastName),
            password: value(FieldName::Password),
            kind: value(FieldName::Type),
            company: value(FieldName::Company),
            address: value(FieldName::Address),
            city: value(FieldName::City),
            state: value(FieldName::State),
            zip: value(FieldName::Zip),
            country: value(FieldName::Country),
            user_type: value(FieldName::UserType),
        }
    }
}

/// Body returned by the registration service.
///
/// Both keys are optional on the wire: an absent `success` counts as a
/// logical failure and an absent `msg` as an empty message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl RegistrationResponse {
    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }

    pub fn message(&self) -> &str {
        self.msg.as_deref().unwrap_or_default()
    }
}
