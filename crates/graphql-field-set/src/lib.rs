//! Canonical text for GraphQL selection sets.
//!
//! Two selection sets that only differ in field order, formatting or repeated fields render to
//! the same string, so they can be compared and stored without parsing them again:
//!
//! ```
//! let one = graphql_field_set::normalize_selection_set("{ b, a { y x } }").unwrap();
//! let other = graphql_field_set::normalize_selection_set("{ a { x, y } b }").unwrap();
//!
//! assert_eq!(one, "{ a { x y } b }");
//! assert_eq!(one, other);
//! ```

mod error;
mod parse;
mod render;
mod tree;

pub use self::{
    error::FieldSetError,
    tree::{Argument, Directive, Field, InlineFragment, Selection, SelectionSet, Value},
};

/// Normalize a selection set, keeping the outer braces: `{ a { x y } b }`.
///
/// The outer braces are optional in the input.
pub fn normalize_selection_set(source: &str) -> Result<String, FieldSetError> {
    SelectionSet::parse(source).map(|selection_set| selection_set.normalize())
}

/// Normalize a field set as written in `@key(fields: ...)`, without the outer braces: `a { x y } b`.
///
/// The outer braces are optional in the input.
pub fn normalize_field_set(source: &str) -> Result<String, FieldSetError> {
    SelectionSet::parse(source).map(|selection_set| selection_set.normalize_fields())
}
