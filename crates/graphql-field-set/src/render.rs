use std::{cmp::Ordering, fmt::Write};

use crate::{Argument, Directive, Field, InlineFragment, Selection, SelectionSet, Value};

impl SelectionSet {
    /// The canonical form of this selection set, wrapped in braces: `{ a { x y } b }`.
    pub fn normalize(&self) -> String {
        let fields = self.normalize_fields();

        if fields.is_empty() {
            return String::from("{}");
        }

        format!("{{ {fields} }}")
    }

    /// The canonical form of this selection set without the outer braces: `a { x y } b`.
    ///
    /// Siblings are sorted (fields by response key, then name, then the rest of their rendering;
    /// inline fragments after the fields, by type condition) and exact duplicates are removed.
    pub fn normalize_fields(&self) -> String {
        let mut rendered: Vec<Rendered<'_>> = self.selections.iter().map(Rendered::new).collect();

        rendered.sort_by(Rendered::canonical_order);
        rendered.dedup_by(|one, other| one.text == other.text);

        let mut out = String::new();

        for (idx, selection) in rendered.iter().enumerate() {
            if idx > 0 {
                out.push(' ');
            }
            out.push_str(&selection.text);
        }

        out
    }
}

/// A selection already rendered in canonical form, with what it sorts on.
struct Rendered<'a> {
    kind: SelectionKind,
    primary: &'a str,
    secondary: &'a str,
    text: String,
}

#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum SelectionKind {
    Field,
    InlineFragment,
}

impl<'a> Rendered<'a> {
    fn new(selection: &'a Selection) -> Self {
        match selection {
            Selection::Field(field) => Rendered {
                kind: SelectionKind::Field,
                primary: field.response_key(),
                secondary: field.name(),
                text: render_field(field),
            },
            Selection::InlineFragment(fragment) => Rendered {
                kind: SelectionKind::InlineFragment,
                primary: fragment.type_condition(),
                secondary: "",
                text: render_inline_fragment(fragment),
            },
        }
    }

    fn canonical_order(&self, other: &Self) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then_with(|| self.primary.cmp(other.primary))
            .then_with(|| self.secondary.cmp(other.secondary))
            .then_with(|| self.text.cmp(&other.text))
    }
}

fn render_field(field: &Field) -> String {
    let mut out = String::new();

    if let Some(alias) = field.alias() {
        out.push_str(alias);
        out.push_str(": ");
    }

    out.push_str(field.name());
    render_arguments(&mut out, field.arguments());
    render_directives(&mut out, field.directives());
    render_subselection(&mut out, field.selection_set());

    out
}

fn render_inline_fragment(fragment: &InlineFragment) -> String {
    let mut out = String::from("... on ");

    out.push_str(fragment.type_condition());
    render_directives(&mut out, fragment.directives());
    render_subselection(&mut out, fragment.selection_set());

    out
}

fn render_subselection(out: &mut String, selection_set: &SelectionSet) {
    if selection_set.is_empty() {
        return;
    }

    out.push(' ');
    out.push_str(&selection_set.normalize());
}

// Argument order carries no meaning, directive order does.
fn render_arguments(out: &mut String, arguments: &[Argument]) {
    if arguments.is_empty() {
        return;
    }

    let mut arguments: Vec<&Argument> = arguments.iter().collect();
    arguments.sort_by(|one, other| one.name.cmp(&other.name));

    out.push('(');

    for (idx, argument) in arguments.into_iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }

        out.push_str(&argument.name);
        out.push_str(": ");
        render_value(out, &argument.value);
    }

    out.push(')');
}

fn render_directives(out: &mut String, directives: &[Directive]) {
    for directive in directives {
        out.push_str(" @");
        out.push_str(&directive.name);
        render_arguments(out, &directive.arguments);
    }
}

fn render_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Int(n) => {
            write!(out, "{n}").ok();
        }
        Value::Float(n) => {
            write!(out, "{n:?}").ok();
        }
        Value::String(s) => render_string(out, s),
        Value::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Enum(e) => out.push_str(e),
        Value::List(items) => {
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                render_value(out, item);
            }
            out.push(']');
        }
        Value::Object(fields) => {
            let mut fields: Vec<&(String, Value)> = fields.iter().collect();
            fields.sort_by(|(one, _), (other, _)| one.cmp(other));

            out.push('{');
            for (idx, (name, value)) in fields.into_iter().enumerate() {
                out.push_str(if idx > 0 { ", " } else { " " });
                out.push_str(name);
                out.push_str(": ");
                render_value(out, value);
            }
            out.push_str(if out.ends_with('{') { "}" } else { " }" });
        }
    }
}

fn render_string(out: &mut String, s: &str) {
    out.push('"');

    for character in s.chars() {
        match character {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            character if character.is_control() => {
                write!(out, "\\u{:04X}", u32::from(character)).ok();
            }
            character => out.push(character),
        }
    }

    out.push('"');
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use crate::{normalize_field_set, normalize_selection_set};

    #[test]
    fn deeply_nested_field_set() {
        let source = indoc! {"
            {
              field { one two, three {
              innerField {

              innerField2 innerField1


              },},four}

            }

        "};

        insta::assert_snapshot!(
            normalize_field_set(source).unwrap(),
            @"field { four one three { innerField { innerField1 innerField2 } } two }"
        );
    }

    #[test]
    fn order_and_whitespace_do_not_matter() {
        let one = normalize_selection_set("{ b, a { y x } }").unwrap();
        let other = normalize_selection_set("{ a { x, y } b }").unwrap();

        assert_eq!("{ a { x y } b }", one);
        assert_eq!(one, other);
    }

    #[rstest::rstest]
    #[case::single_field("id", "{ id }")]
    #[case::duplicates("id id name id", "{ id name }")]
    #[case::nested_duplicates("a { x } a { x } a { y }", "{ a { x } a { y } }")]
    #[case::duplicates_after_normalization("a { y x } a { x y }", "{ a { x y } }")]
    #[case::aliases_sort_by_response_key("b: z a: y", "{ a: y b: z }")]
    #[case::alias_and_name_tie("id renamed: id", "{ id renamed: id }")]
    #[case::code_point_order("b B a A _", "{ A B _ a b }")]
    #[case::arguments_sorted("f(b: 2, a: 1)", "{ f(a: 1, b: 2) }")]
    #[case::argument_values(
        r#"f(s: "x y", e: RED, l: [1, 2.5, null, true], o: { z: 1, a: false })"#,
        r#"{ f(e: RED, l: [1, 2.5, null, true], o: { a: false, z: 1 }, s: "x y") }"#
    )]
    #[case::empty_object_argument("f(o: {})", "{ f(o: {}) }")]
    #[case::directives_keep_their_order("id @b @a(if: true)", "{ id @b @a(if: true) }")]
    #[case::inline_fragments_after_fields(
        "... on User { name id } id ... on Admin { role }",
        "{ id ... on Admin { role } ... on User { id name } }"
    )]
    fn normalized_selection_sets(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(expected, normalize_selection_set(source).unwrap());
    }

    #[rstest::rstest]
    #[case("{ b, a { y x } }")]
    #[case("id nested { deeper { z y x } name } other: id")]
    #[case(r#"product(id: 1, filter: { b: "two words", a: [ONE, TWO] }) @skip(if: false) { sku }"#)]
    #[case("... on User { id } ... on User { id } name")]
    fn normalization_is_idempotent(#[case] source: &str) {
        let once = normalize_selection_set(source).unwrap();
        let twice = normalize_selection_set(&once).unwrap();

        assert_eq!(once, twice);
        assert_eq!(normalize_field_set(source).unwrap(), normalize_field_set(&once).unwrap());
    }

    #[test]
    fn field_set_form_has_no_outer_braces() {
        assert_eq!("a { x y } b", normalize_field_set("{ b a { y x } }").unwrap());
        assert_eq!("a { x y } b", normalize_field_set("b a { y x }").unwrap());
    }
}
