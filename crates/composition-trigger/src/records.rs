use std::collections::{BTreeMap, BTreeSet};

use graph_labels::{LabelSet, MatcherSet};
use ulid::Ulid;

/// The message of the composition error recorded when a federated graph has no subgraph left.
pub const EMPTY_MEMBERSHIP_ERROR: &str = "At least one subgraph is required for federation.";

/// Recorded when the composer reports neither errors nor a composed schema.
pub const MISSING_SCHEMA_ERROR: &str = "Composition did not produce a federated schema.";

#[derive(Clone, Debug, PartialEq)]
pub struct SubgraphRecord {
    pub name: String,
    pub labels: LabelSet,
    /// The last published SDL. `None` until the first publish.
    pub schema: Option<String>,
}

impl SubgraphRecord {
    pub fn new(name: impl Into<String>, labels: LabelSet) -> Self {
        SubgraphRecord {
            name: name.into(),
            labels,
            schema: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FederatedGraphRecord {
    pub name: String,
    pub label_matchers: MatcherSet,
    /// Contracts are derived from another graph and do not take matcher edits directly.
    pub is_contract: bool,
    /// Materialized membership: the subgraphs whose labels satisfy `label_matchers`.
    pub members: BTreeSet<String>,
    /// The schema of the last successful composition.
    pub composed_schema: Option<String>,
}

impl FederatedGraphRecord {
    pub fn new(name: impl Into<String>, label_matchers: MatcherSet) -> Self {
        FederatedGraphRecord {
            name: name.into(),
            label_matchers,
            is_contract: false,
            members: BTreeSet::new(),
            composed_schema: None,
        }
    }
}

/// Every subgraph and federated graph of one namespace, as loaded from the store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NamespaceSnapshot {
    pub namespace: String,
    pub subgraphs: BTreeMap<String, SubgraphRecord>,
    pub federated_graphs: BTreeMap<String, FederatedGraphRecord>,
}

impl NamespaceSnapshot {
    pub fn new(namespace: impl Into<String>) -> Self {
        NamespaceSnapshot {
            namespace: namespace.into(),
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositionStatus {
    Pending,
    Succeeded,
    Failed,
}

/// One composition attempt of one federated graph. Records are append-only.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositionRecord {
    pub id: Ulid,
    pub federated_graph: String,
    /// The members the attempt was made with, sorted.
    pub subgraphs: Vec<String>,
    pub status: CompositionStatus,
    pub errors: Vec<String>,
}

impl CompositionRecord {
    pub(crate) fn pending(federated_graph: &str, subgraphs: Vec<String>) -> Self {
        CompositionRecord {
            id: Ulid::new(),
            federated_graph: federated_graph.to_owned(),
            subgraphs,
            status: CompositionStatus::Pending,
            errors: Vec::new(),
        }
    }

    pub(crate) fn succeed(self) -> Self {
        self.finish(CompositionStatus::Succeeded, Vec::new())
    }

    pub(crate) fn fail(self, errors: Vec<String>) -> Self {
        self.finish(CompositionStatus::Failed, errors)
    }

    fn finish(mut self, status: CompositionStatus, errors: Vec<String>) -> Self {
        debug_assert_eq!(self.status, CompositionStatus::Pending);

        self.status = status;
        self.errors = errors;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == CompositionStatus::Succeeded
    }
}
