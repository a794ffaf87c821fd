use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key under which the input surface tracks the active step number.
///
/// It lives alongside the real fields in a [`FieldSet`] but is never sent to
/// the registration service.
pub const STEP_TRACKER_KEY: &str = "currentStep";

/// Names of the fields known to the registration wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    Email,
    FirstName,
    LastName,
    Password,
    ConfirmPassword,
    Type,
    Company,
    Address,
    City,
    State,
    Zip,
    Country,
    /// Hidden field pinned to a constant; never shown to the user.
    UserType,
}

impl FieldName {
    /// Every field the user can edit, across both steps.
    pub const EDITABLE: [FieldName; 12] = [
        FieldName::Email,
        FieldName::FirstName,
        FieldName::LastName,
        FieldName::Password,
        FieldName::ConfirmPassword,
        FieldName::Type,
        FieldName::Company,
        FieldName::Address,
        FieldName::City,
        FieldName::State,
        FieldName::Zip,
        FieldName::Country,
    ];

    /// The wire/key name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Email => "email",
            FieldName::FirstName => "firstName",
            FieldName::LastName => "lastName",
            FieldName::Password => "password",
            FieldName::ConfirmPassword => "confirmPassword",
            FieldName::Type => "type",
            FieldName::Company => "company",
            FieldName::Address => "address",
            FieldName::City => "city",
            FieldName::State => "state",
            FieldName::Zip => "zip",
            FieldName::Country => "country",
            FieldName::UserType => "userType",
        }
    }

    /// Human-readable label used by input widgets and messages.
    pub fn label(self) -> &'static str {
        match self {
            FieldName::Email => "Email",
            FieldName::FirstName => "First Name",
            FieldName::LastName => "Last Name",
            FieldName::Password => "Password",
            FieldName::ConfirmPassword => "Confirm Password",
            FieldName::Type => "Type",
            FieldName::Company => "Company",
            FieldName::Address => "Address",
            FieldName::City => "City",
            FieldName::State => "State",
            FieldName::Zip => "Zip",
            FieldName::Country => "Country",
            FieldName::UserType => "User Type",
        }
    }

    /// Whether the input should be masked when rendered.
    pub fn is_secret(self) -> bool {
        matches!(self, FieldName::Password | FieldName::ConfirmPassword)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseFieldNameError;

impl fmt::Display for ParseFieldNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown registration field name")
    }
}

impl std::error::Error for ParseFieldNameError {}

impl FromStr for FieldName {
    type Err = ParseFieldNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldName::EDITABLE
            .into_iter()
            .chain([FieldName::UserType])
            .find(|field| field.as_str() == s)
            .ok_or(ParseFieldNameError)
    }
}

/// Ordered mapping from field name to its current string value.
///
/// Keys are plain strings so the set can also carry non-field keys such as
/// the [`STEP_TRACKER_KEY`]. A missing key reads as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet(IndexMap<String, String>);

impl FieldSet {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Raw lookup by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value of a known field, or `""` when absent.
    pub fn value(&self, field: FieldName) -> &str {
        self.get(field.as_str()).unwrap_or_default()
    }

    /// Insert or overwrite a value, keeping the original key position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Set a known field.
    pub fn set_field(&mut self, field: FieldName, value: impl Into<String>) {
        self.set(field.as_str(), value);
    }

    /// Builder-style variant of [`FieldSet::set_field`].
    pub fn with(mut self, field: FieldName, value: impl Into<String>) -> Self {
        self.set_field(field, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for FieldSet {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl IntoIterator for FieldSet {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Validation messages keyed by field. An absent key means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorMap(IndexMap<FieldName, String>);

impl ErrorMap {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn insert(&mut self, field: FieldName, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.0.contains_key(&field)
    }

    /// Drop the message for a single field, e.g. once the user edits it.
    pub fn clear_field(&mut self, field: FieldName) {
        self.0.shift_remove(&field);
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ErrorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl<M: Into<String>> FromIterator<(FieldName, M)> for ErrorMap {
    fn from_iter<I: IntoIterator<Item = (FieldName, M)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(field, message)| (field, message.into())).collect())
    }
}
