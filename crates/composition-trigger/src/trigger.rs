//! Membership recomputation and dirty tracking, on an in-memory snapshot of a namespace.
//!
//! A [`Mutation`] collects the events of one request. Each `on_*` handler updates the snapshot
//! and returns the federated graphs the event made dirty; the mutation keeps the union, so a
//! graph dirtied several times in one request is composed once.

use std::collections::BTreeSet;

use graph_labels::{LabelSet, MatcherSet, MatcherUpdate, label_matchers_changed, membership, satisfies};

use crate::{
    Error,
    records::{FederatedGraphRecord, NamespaceSnapshot, SubgraphRecord},
};

/// Federated graph names.
pub type DirtyGraphs = BTreeSet<String>;

/// A requested change of the label matchers of a federated graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchersChange {
    pub label_matchers: MatcherSet,
    /// Clear the matchers. `label_matchers` is ignored when set.
    pub unset_label_matchers: bool,
}

pub struct Mutation<'a> {
    snapshot: &'a mut NamespaceSnapshot,
    dirty: DirtyGraphs,
    saved_subgraphs: BTreeSet<String>,
    deleted_subgraphs: BTreeSet<String>,
    saved_graphs: BTreeSet<String>,
}

/// What a finished [`Mutation`] needs persisted and composed.
#[derive(Debug, Default, PartialEq)]
pub struct MutationPlan {
    pub dirty: DirtyGraphs,
    pub saved_subgraphs: BTreeSet<String>,
    pub deleted_subgraphs: BTreeSet<String>,
    pub saved_graphs: BTreeSet<String>,
}

impl<'a> Mutation<'a> {
    pub fn new(snapshot: &'a mut NamespaceSnapshot) -> Self {
        Mutation {
            snapshot,
            dirty: DirtyGraphs::new(),
            saved_subgraphs: BTreeSet::new(),
            deleted_subgraphs: BTreeSet::new(),
            saved_graphs: BTreeSet::new(),
        }
    }

    pub fn snapshot(&self) -> &NamespaceSnapshot {
        self.snapshot
    }

    pub fn dirty(&self) -> &DirtyGraphs {
        &self.dirty
    }

    pub fn finish(self) -> MutationPlan {
        MutationPlan {
            dirty: self.dirty,
            saved_subgraphs: self.saved_subgraphs,
            deleted_subgraphs: self.deleted_subgraphs,
            saved_graphs: self.saved_graphs,
        }
    }

    /// Register a new federated graph and compute its members. It is only dirty if it has any.
    pub fn on_federated_graph_created(&mut self, mut graph: FederatedGraphRecord) -> Result<DirtyGraphs, Error> {
        if self.snapshot.federated_graphs.contains_key(&graph.name) {
            return Err(Error::FederatedGraphAlreadyExists {
                namespace: self.snapshot.namespace.clone(),
                name: graph.name,
            });
        }

        graph.members = self.members_for(&graph.label_matchers);

        let mut dirty = DirtyGraphs::new();
        if !graph.members.is_empty() {
            dirty.insert(graph.name.clone());
        }

        tracing::debug!(
            namespace = %self.snapshot.namespace,
            federated_graph = %graph.name,
            members = graph.members.len(),
            "federated graph created"
        );

        self.saved_graphs.insert(graph.name.clone());
        self.snapshot.federated_graphs.insert(graph.name.clone(), graph);

        Ok(self.mark_dirty(dirty))
    }

    /// Register a new subgraph. It joins every graph it matches, but without a schema there is
    /// nothing to compose yet, so no graph becomes dirty.
    pub fn on_subgraph_created(&mut self, subgraph: SubgraphRecord) -> Result<DirtyGraphs, Error> {
        if self.snapshot.subgraphs.contains_key(&subgraph.name) {
            return Err(Error::SubgraphAlreadyExists {
                namespace: self.snapshot.namespace.clone(),
                name: subgraph.name,
            });
        }

        for graph in self.snapshot.federated_graphs.values_mut() {
            if satisfies(&subgraph.labels, &graph.label_matchers) && graph.members.insert(subgraph.name.clone()) {
                self.saved_graphs.insert(graph.name.clone());
            }
        }

        tracing::debug!(
            namespace = %self.snapshot.namespace,
            subgraph = %subgraph.name,
            "subgraph created"
        );

        self.saved_subgraphs.insert(subgraph.name.clone());
        self.snapshot.subgraphs.insert(subgraph.name.clone(), subgraph);

        Ok(DirtyGraphs::new())
    }

    /// Replace the labels of a subgraph. Every graph of the namespace is checked, and the ones
    /// the subgraph joins or leaves become dirty.
    pub fn on_subgraph_labels_changed(&mut self, subgraph_name: &str, labels: LabelSet) -> Result<DirtyGraphs, Error> {
        let namespace = &self.snapshot.namespace;

        let Some(subgraph) = self.snapshot.subgraphs.get_mut(subgraph_name) else {
            return Err(Error::SubgraphNotFound {
                namespace: namespace.clone(),
                name: subgraph_name.to_owned(),
            });
        };

        let mut dirty = DirtyGraphs::new();

        for graph in self.snapshot.federated_graphs.values_mut() {
            let was_member = graph.members.contains(subgraph_name);
            let is_member = satisfies(&labels, &graph.label_matchers);

            if was_member == is_member {
                continue;
            }

            if is_member {
                graph.members.insert(subgraph_name.to_owned());
            } else {
                graph.members.remove(subgraph_name);
            }

            tracing::debug!(
                namespace = %namespace,
                subgraph = %subgraph_name,
                federated_graph = %graph.name,
                joined = is_member,
                "subgraph membership changed"
            );

            self.saved_graphs.insert(graph.name.clone());
            dirty.insert(graph.name.clone());
        }

        subgraph.labels = labels;
        self.saved_subgraphs.insert(subgraph_name.to_owned());

        Ok(self.mark_dirty(dirty))
    }

    /// Apply a matcher change to a federated graph. A change that does not alter the matchers
    /// leaves the graph untouched; any other recomputes its members from scratch.
    pub fn on_matchers_changed(&mut self, graph_name: &str, change: MatchersChange) -> Result<DirtyGraphs, Error> {
        let Some(graph) = self.snapshot.federated_graphs.get(graph_name) else {
            return Err(Error::FederatedGraphNotFound {
                namespace: self.snapshot.namespace.clone(),
                name: graph_name.to_owned(),
            });
        };

        let changed = label_matchers_changed(MatcherUpdate {
            current: &graph.label_matchers,
            new: &change.label_matchers,
            unset: change.unset_label_matchers,
            is_contract: graph.is_contract,
        });

        if !changed {
            tracing::debug!(
                namespace = %self.snapshot.namespace,
                federated_graph = %graph_name,
                "label matchers unchanged"
            );
            return Ok(DirtyGraphs::new());
        }

        let label_matchers = if change.unset_label_matchers {
            MatcherSet::default()
        } else {
            change.label_matchers
        };

        let members = self.members_for(&label_matchers);

        let Some(graph) = self.snapshot.federated_graphs.get_mut(graph_name) else {
            return Ok(DirtyGraphs::new());
        };

        tracing::debug!(
            namespace = %self.snapshot.namespace,
            federated_graph = %graph_name,
            members = members.len(),
            "label matchers changed"
        );

        graph.label_matchers = label_matchers;
        graph.members = members;
        self.saved_graphs.insert(graph_name.to_owned());

        Ok(self.mark_dirty(DirtyGraphs::from([graph_name.to_owned()])))
    }

    /// A new schema was published for a subgraph: every graph it is a member of is dirty.
    pub fn on_schema_published(&mut self, subgraph_name: &str, schema: String) -> Result<DirtyGraphs, Error> {
        let Some(subgraph) = self.snapshot.subgraphs.get_mut(subgraph_name) else {
            return Err(Error::SubgraphNotFound {
                namespace: self.snapshot.namespace.clone(),
                name: subgraph_name.to_owned(),
            });
        };

        subgraph.schema = Some(schema);
        self.saved_subgraphs.insert(subgraph_name.to_owned());

        let dirty = self.graphs_containing(subgraph_name);

        tracing::debug!(
            namespace = %self.snapshot.namespace,
            subgraph = %subgraph_name,
            federated_graphs = dirty.len(),
            "subgraph schema published"
        );

        Ok(self.mark_dirty(dirty))
    }

    /// Remove a subgraph from the namespace and from every graph it was a member of.
    pub fn on_subgraph_deleted(&mut self, subgraph_name: &str) -> Result<DirtyGraphs, Error> {
        if self.snapshot.subgraphs.remove(subgraph_name).is_none() {
            return Err(Error::SubgraphNotFound {
                namespace: self.snapshot.namespace.clone(),
                name: subgraph_name.to_owned(),
            });
        }

        let dirty = self.graphs_containing(subgraph_name);

        for graph_name in &dirty {
            if let Some(graph) = self.snapshot.federated_graphs.get_mut(graph_name) {
                graph.members.remove(subgraph_name);
            }
        }

        tracing::debug!(
            namespace = %self.snapshot.namespace,
            subgraph = %subgraph_name,
            federated_graphs = dirty.len(),
            "subgraph deleted"
        );

        self.saved_subgraphs.remove(subgraph_name);
        self.deleted_subgraphs.insert(subgraph_name.to_owned());
        self.saved_graphs.extend(dirty.iter().cloned());

        Ok(self.mark_dirty(dirty))
    }

    fn members_for(&self, label_matchers: &MatcherSet) -> BTreeSet<String> {
        membership(
            self.snapshot
                .subgraphs
                .values()
                .map(|subgraph| (subgraph.name.as_str(), &subgraph.labels)),
            label_matchers,
        )
    }

    fn graphs_containing(&self, subgraph_name: &str) -> DirtyGraphs {
        self.snapshot
            .federated_graphs
            .values()
            .filter(|graph| graph.members.contains(subgraph_name))
            .map(|graph| graph.name.clone())
            .collect()
    }

    fn mark_dirty(&mut self, dirty: DirtyGraphs) -> DirtyGraphs {
        self.dirty.extend(dirty.iter().cloned());
        dirty
    }
}
