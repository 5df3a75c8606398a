use graph_labels::{LabelSet, MatcherSet};

use crate::records::CompositionRecord;
use crate::trigger::DirtyGraphs;

// A `None` namespace means the configured default namespace.

#[derive(Clone, Debug, Default)]
pub struct CreateFederatedGraph {
    pub namespace: Option<String>,
    pub name: String,
    pub label_matchers: MatcherSet,
    pub is_contract: bool,
}

#[derive(Clone, Debug, Default)]
pub struct CreateSubgraph {
    pub namespace: Option<String>,
    pub name: String,
    pub labels: LabelSet,
}

#[derive(Clone, Debug, Default)]
pub struct UpdateSubgraph {
    pub namespace: Option<String>,
    pub name: String,
    /// Replaces all the labels of the subgraph.
    pub labels: Option<LabelSet>,
    /// Removes all the labels of the subgraph. Takes precedence over `labels`.
    pub unset_labels: bool,
    /// A new schema to publish in the same mutation.
    pub schema: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct PublishSubgraph {
    pub namespace: Option<String>,
    pub name: String,
    pub schema: String,
}

#[derive(Clone, Debug, Default)]
pub struct UpdateFederatedGraph {
    pub namespace: Option<String>,
    pub name: String,
    /// Empty means "leave the matchers alone", unless `unset_label_matchers` is set.
    pub label_matchers: MatcherSet,
    pub unset_label_matchers: bool,
}

#[derive(Clone, Debug, Default)]
pub struct DeleteSubgraph {
    pub namespace: Option<String>,
    pub name: String,
}

/// What a request changed: the federated graphs it made dirty, and one composition record per
/// dirty graph, sorted by graph name.
#[derive(Clone, Debug, Default)]
pub struct MutationOutcome {
    pub dirty: DirtyGraphs,
    pub compositions: Vec<CompositionRecord>,
}

impl MutationOutcome {
    /// True unless one of the composition attempts failed.
    pub fn is_success(&self) -> bool {
        self.compositions.iter().all(CompositionRecord::is_success)
    }

    pub fn composition_errors(&self) -> impl Iterator<Item = &str> {
        self.compositions
            .iter()
            .flat_map(|record| record.errors.iter().map(String::as_str))
    }
}
