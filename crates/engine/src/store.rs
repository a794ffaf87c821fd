//! Accumulated wizard values and the defaults derived from them.

use enroll_types::{FieldName, FieldSet, STEP_TRACKER_KEY, Step};

/// Pure helpers over captured field values.
///
/// The store itself holds no state; [`crate::WizardState`] owns the captured
/// values and the controller calls into these derivations after each
/// mutation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormDataStore;

impl FormDataStore {
    /// Values the input surface is rebound to for `step`.
    ///
    /// Every editable field is present, taken from `captured` when it holds a
    /// non-empty value and `""` otherwise. `userType` is pinned to
    /// `user_type` whatever was captured, and the step tracker records the
    /// step number.
    pub fn defaults(step: Step, captured: &FieldSet, user_type: &str) -> FieldSet {
        let mut fields: FieldSet = FieldName::EDITABLE
            .iter()
            .map(|field| {
                let value = captured.get(field.as_str()).filter(|value| !value.is_empty()).unwrap_or_default();
                (field.as_str(), value)
            })
            .collect();
        fields.set_field(FieldName::UserType, user_type);
        fields.set(STEP_TRACKER_KEY, step.number().to_string());
        fields
    }

    /// Right-biased shallow merge: keys in `incoming` win, keys only in
    /// `previous` are kept.
    pub fn merge(previous: &FieldSet, incoming: &FieldSet) -> FieldSet {
        let mut merged = previous.clone();
        merged.extend(incoming.iter());
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_field_with_empty_fallbacks() {
        let defaults = FormDataStore::defaults(Step::First, &FieldSet::new(), "admin");
        for field in FieldName::EDITABLE {
            assert_eq!(defaults.get(field.as_str()), Some(""), "{field}");
        }
        assert_eq!(defaults.value(FieldName::UserType), "admin");
        assert_eq!(defaults.get(STEP_TRACKER_KEY), Some("1"));
    }

    #[test]
    fn defaults_layer_captured_values() {
        let captured = FieldSet::new()
            .with(FieldName::Email, "a@b.com")
            .with(FieldName::City, "")
            .with(FieldName::UserType, "someone-else");
        let defaults = FormDataStore::defaults(Step::Second, &captured, "admin");
        assert_eq!(defaults.value(FieldName::Email), "a@b.com");
        assert_eq!(defaults.get("city"), Some(""));
        assert_eq!(defaults.value(FieldName::UserType), "admin");
        assert_eq!(defaults.get(STEP_TRACKER_KEY), Some("2"));
    }

    #[test]
    fn merge_is_right_biased_and_keeps_left_only_keys() {
        let previous = FieldSet::new()
            .with(FieldName::Email, "old@b.com")
            .with(FieldName::FirstName, "A");
        let incoming = FieldSet::new()
            .with(FieldName::Email, "new@b.com")
            .with(FieldName::Zip, "62701");
        let merged = FormDataStore::merge(&previous, &incoming);
        assert_eq!(merged.value(FieldName::Email), "new@b.com");
        assert_eq!(merged.value(FieldName::FirstName), "A");
        assert_eq!(merged.value(FieldName::Zip), "62701");
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn merging_empty_incoming_is_identity() {
        let previous = FieldSet::new().with(FieldName::Email, "a@b.com");
        assert_eq!(FormDataStore::merge(&previous, &FieldSet::new()), previous);
    }
}
