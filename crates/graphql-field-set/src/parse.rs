use cynic_parser::{ConstValue, executable as ast};

use crate::{Argument, Directive, Field, FieldSetError, InlineFragment, Selection, SelectionSet, Value};

impl SelectionSet {
    /// Parse a selection set, with or without its outer braces.
    pub fn parse(source: &str) -> Result<Self, FieldSetError> {
        let source = if source.trim_start().starts_with('{') {
            source.to_owned()
        } else {
            format!("{{ {source} }}")
        };

        // cynic-parser panics on some valid input, such as integers overflowing an i64 or some
        // block strings. Those surface as parse errors.
        std::panic::catch_unwind(|| parse_document(&source)).unwrap_or_else(|_| {
            Err(FieldSetError::Parse(String::from(
                "the parser could not handle this field set",
            )))
        })
    }
}

fn parse_document(source: &str) -> Result<SelectionSet, FieldSetError> {
    let parsed = cynic_parser::parse_executable_document(source).map_err(|err| FieldSetError::Parse(err.to_string()))?;

    let mut operations = parsed.operations();

    let (Some(operation), None) = (operations.next(), operations.next()) else {
        return Err(FieldSetError::NotASelectionSet);
    };

    if parsed.fragments().next().is_some() {
        return Err(FieldSetError::NotASelectionSet);
    }

    build_selection_set(operation.selection_set())
}

fn build_selection_set<'a>(
    selections: impl Iterator<Item = ast::Selection<'a>>,
) -> Result<SelectionSet, FieldSetError> {
    let selections = selections
        .map(|selection| match selection {
            ast::Selection::Field(item) => Ok(Selection::Field(Field {
                alias: item.alias().map(str::to_owned),
                name: item.name().to_owned(),
                arguments: build_arguments(item.arguments())?,
                directives: build_directives(item.directives())?,
                selection_set: build_selection_set(item.selection_set())?,
            })),
            ast::Selection::InlineFragment(fragment) => {
                let type_condition = fragment
                    .type_condition()
                    .ok_or(FieldSetError::MissingTypeCondition)?;

                Ok(Selection::InlineFragment(InlineFragment {
                    type_condition: type_condition.to_owned(),
                    directives: build_directives(fragment.directives())?,
                    selection_set: build_selection_set(fragment.selection_set())?,
                }))
            }
            _ => Err(FieldSetError::FragmentSpread),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SelectionSet { selections })
}

fn build_arguments<'a>(arguments: impl Iterator<Item = ast::Argument<'a>>) -> Result<Vec<Argument>, FieldSetError> {
    arguments
        .map(|argument| {
            let value = ConstValue::try_from(argument.value()).map_err(|_| FieldSetError::Variable)?;

            Ok(Argument {
                name: argument.name().to_owned(),
                value: const_value_to_value(value),
            })
        })
        .collect()
}

fn build_directives<'a>(
    directives: impl Iterator<Item = ast::Directive<'a>>,
) -> Result<Vec<Directive>, FieldSetError> {
    directives
        .map(|directive| {
            Ok(Directive {
                name: directive.name().to_owned(),
                arguments: build_arguments(directive.arguments())?,
            })
        })
        .collect()
}

fn const_value_to_value(value: ConstValue<'_>) -> Value {
    match value {
        ConstValue::Null(_) => Value::Null,
        ConstValue::Int(n) => Value::Int(n.as_i64()),
        ConstValue::Float(n) => Value::Float(n.as_f64()),
        ConstValue::String(s) => Value::String(s.as_str().to_owned()),
        ConstValue::Boolean(b) => Value::Boolean(b.value()),
        ConstValue::Enum(e) => Value::Enum(e.name().to_owned()),
        ConstValue::List(l) => Value::List(l.items().map(const_value_to_value).collect()),
        ConstValue::Object(o) => Value::Object(
            o.fields()
                .map(|field| (field.name().to_owned(), const_value_to_value(field.value())))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn field(selection: &Selection) -> &Field {
        match selection {
            Selection::Field(field) => field,
            Selection::InlineFragment(fragment) => unreachable!("expected a field, got a fragment on {}", fragment.type_condition),
        }
    }

    #[test]
    fn braces_are_optional() {
        let with_braces = SelectionSet::parse("{ id nested { name } }").unwrap();
        let without_braces = SelectionSet::parse("id nested { name }").unwrap();

        assert_eq!(with_braces, without_braces);
        assert_eq!(2, with_braces.selections().len());
    }

    #[test]
    fn builds_an_owned_tree() {
        let selection_set = SelectionSet::parse(r#"{ renamed: product(id: 1, tags: ["a"]) { sku } }"#).unwrap();

        let product = field(&selection_set.selections()[0]);
        assert_eq!(Some("renamed"), product.alias());
        assert_eq!("product", product.name());
        assert_eq!("renamed", product.response_key());
        assert_eq!(
            vec![
                Argument {
                    name: "id".to_owned(),
                    value: Value::Int(1)
                },
                Argument {
                    name: "tags".to_owned(),
                    value: Value::List(vec![Value::String("a".to_owned())])
                },
            ],
            product.arguments()
        );

        let sku = field(&product.selection_set().selections()[0]);
        assert_eq!("sku", sku.response_key());
        assert!(sku.selection_set().is_empty());
    }

    #[test]
    fn rejects_fragment_spreads() {
        assert_eq!(
            Err(FieldSetError::FragmentSpread),
            SelectionSet::parse("id ...ProductFields")
        );
    }

    #[test]
    fn rejects_inline_fragments_without_type_condition() {
        assert_eq!(
            Err(FieldSetError::MissingTypeCondition),
            SelectionSet::parse("id ... { name }")
        );
    }

    #[test]
    fn rejects_variables() {
        assert_eq!(Err(FieldSetError::Variable), SelectionSet::parse("product(id: $id) { sku }"));
    }

    #[test]
    fn rejects_several_selection_sets() {
        assert_eq!(
            Err(FieldSetError::NotASelectionSet),
            SelectionSet::parse("{ id } { name }")
        );
    }

    #[test]
    fn integers_overflowing_i64_are_rejected() {
        let err = SelectionSet::parse("f(a: 99999999999999999999999)").unwrap_err();

        assert!(matches!(err, FieldSetError::Parse(_)), "{err:?}");
    }

    #[test]
    fn block_strings_never_panic() {
        for source in [
            "f(a: \"\"\"x\ny\"\"\")",
            r#"f(a: """x\ny""")"#,
            r#"f(a: """""")"#,
        ] {
            match SelectionSet::parse(source) {
                Ok(selection_set) => assert_eq!(1, selection_set.selections().len()),
                Err(err) => assert!(matches!(err, FieldSetError::Parse(_)), "{err:?}"),
            }
        }
    }

    #[test]
    fn reports_syntax_errors() {
        let err = SelectionSet::parse("id nested {").unwrap_err();

        assert!(matches!(err, FieldSetError::Parse(_)), "{err:?}");
    }
}
