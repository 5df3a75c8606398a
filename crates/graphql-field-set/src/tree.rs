/// A parsed selection set. Each node owns its children; selection sets are trees.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionSet {
    pub(crate) selections: Vec<Selection>,
}

impl SelectionSet {
    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    Field(Field),
    InlineFragment(InlineFragment),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub(crate) alias: Option<String>,
    pub(crate) name: String,
    pub(crate) arguments: Vec<Argument>,
    pub(crate) directives: Vec<Directive>,
    pub(crate) selection_set: SelectionSet,
}

impl Field {
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The key of this field in a response: the alias if there is one, the name otherwise.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn selection_set(&self) -> &SelectionSet {
        &self.selection_set
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InlineFragment {
    pub(crate) type_condition: String,
    pub(crate) directives: Vec<Directive>,
    pub(crate) selection_set: SelectionSet,
}

impl InlineFragment {
    pub fn type_condition(&self) -> &str {
        &self.type_condition
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn selection_set(&self) -> &SelectionSet {
        &self.selection_set
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub name: String,
    pub value: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Directive {
    pub name: String,
    pub arguments: Vec<Argument>,
}

/// A constant argument value. Field sets cannot reference variables.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    List(Vec<Value>),
    Object(Vec<(String, Value)>),
}
