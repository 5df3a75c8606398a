#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldSetError {
    #[error("could not parse the field set as a selection set: {0}")]
    Parse(String),
    #[error("the field set must contain exactly one selection set")]
    NotASelectionSet,
    #[error("fragment spreads are not allowed in a field set")]
    FragmentSpread,
    #[error("inline fragments in a field set must have a type condition")]
    MissingTypeCondition,
    #[error("variables are not allowed in a field set")]
    Variable,
}
