/// What a composition attempt is made of: a federated graph and its members.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositionInput {
    pub namespace: String,
    pub federated_graph: String,
    /// Members sorted by name.
    pub subgraphs: Vec<SubgraphInput>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubgraphInput {
    pub name: String,
    pub schema: Option<String>,
}

/// The result of merging the schemas of a [`CompositionInput`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComposeOutput {
    pub composed_schema: Option<String>,
    pub errors: Vec<String>,
}

impl ComposeOutput {
    pub fn success(composed_schema: impl Into<String>) -> Self {
        ComposeOutput {
            composed_schema: Some(composed_schema.into()),
            errors: Vec::new(),
        }
    }

    pub fn failure(errors: impl IntoIterator<Item = String>) -> Self {
        ComposeOutput {
            composed_schema: None,
            errors: errors.into_iter().collect(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty() && self.composed_schema.is_some()
    }
}

/// The schema composition algorithm. Implementations own their timeouts and retries; errors
/// they report end up unchanged in the composition record.
#[async_trait::async_trait]
pub trait Composer: Send + Sync {
    async fn compose(&self, input: &CompositionInput) -> ComposeOutput;
}
