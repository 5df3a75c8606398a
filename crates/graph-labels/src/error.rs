/// Why a label or a label matcher was rejected.
///
/// Only the string parsers produce these. Matching works on values that were already validated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelError {
    #[error("The label `{0}` is missing the `=` separating its key and value.")]
    MissingSeparator(String),
    #[error("The label `{0}` has an empty key.")]
    EmptyKey(String),
    #[error("The label `{0}` has an empty value.")]
    EmptyValue(String),
    #[error("The label `{label}` contains the invalid character `{character}`. Only alphanumeric characters, `-`, `_` and `.` are allowed.")]
    InvalidCharacter { label: String, character: char },
    #[error("A label matcher must contain at least one label.")]
    EmptyMatcher,
}
