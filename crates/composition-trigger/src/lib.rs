//! Keeps the membership of federated graphs in sync with the labels of their subgraphs, and
//! recomposes a federated graph whenever its membership or the schema of one of its members
//! changes.
//!
//! Persistence and schema composition are behind the [`GraphStore`] and [`Composer`] seams; the
//! [`Coordinator`] drives them.

mod composer;
mod config;
mod coordinator;
mod error;
mod records;
mod requests;
mod store;
mod trigger;

pub use composer::{ComposeOutput, Composer, CompositionInput, SubgraphInput};
pub use config::{CompositionConfig, Config};
pub use coordinator::Coordinator;
pub use error::{Error, StoreError, StoreResult};
pub use graph_labels::{Label, LabelError, LabelMatcher, LabelSet, MatcherSet, MatcherUpdate};
pub use records::{
    CompositionRecord, CompositionStatus, EMPTY_MEMBERSHIP_ERROR, FederatedGraphRecord, MISSING_SCHEMA_ERROR,
    NamespaceSnapshot, SubgraphRecord,
};
pub use requests::{
    CreateFederatedGraph, CreateSubgraph, DeleteSubgraph, MutationOutcome, PublishSubgraph, UpdateFederatedGraph,
    UpdateSubgraph,
};
pub use store::{GraphStore, GraphStoreInner, InMemoryGraphStore};
pub use trigger::{DirtyGraphs, MatchersChange, Mutation, MutationPlan};

/// Whether a subgraph with `labels` belongs to a federated graph with `matchers`.
pub fn compute_membership(labels: &LabelSet, matchers: &MatcherSet) -> bool {
    graph_labels::satisfies(labels, matchers)
}

/// Whether a matcher update needs the membership of the federated graph recomputed.
pub fn matchers_changed(update: MatcherUpdate<'_>) -> bool {
    graph_labels::label_matchers_changed(update)
}
