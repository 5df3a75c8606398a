use std::sync::Arc;

use futures_util::StreamExt;
use graph_labels::LabelSet;
use tracing::Instrument;

use crate::{
    Config, Error,
    composer::{Composer, CompositionInput, SubgraphInput},
    records::{
        CompositionRecord, EMPTY_MEMBERSHIP_ERROR, FederatedGraphRecord, MISSING_SCHEMA_ERROR, NamespaceSnapshot,
        SubgraphRecord,
    },
    requests::*,
    store::GraphStore,
    trigger::{DirtyGraphs, MatchersChange, Mutation, MutationPlan},
};

/// Applies requests to subgraphs and federated graphs, keeps memberships up to date and runs
/// one composition per federated graph each request made dirty.
pub struct Coordinator {
    store: GraphStore,
    composer: Arc<dyn Composer>,
    config: Config,
}

impl Coordinator {
    pub fn new(store: GraphStore, composer: impl Composer + 'static, config: Config) -> Self {
        Coordinator {
            store,
            composer: Arc::new(composer),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn create_federated_graph(&self, request: CreateFederatedGraph) -> Result<MutationOutcome, Error> {
        let namespace = self.namespace(request.namespace.as_deref());

        self.mutate(&namespace, move |mutation| {
            let mut graph = FederatedGraphRecord::new(request.name, request.label_matchers);
            graph.is_contract = request.is_contract;

            mutation.on_federated_graph_created(graph)
        })
        .await
    }

    pub async fn create_subgraph(&self, request: CreateSubgraph) -> Result<MutationOutcome, Error> {
        let namespace = self.namespace(request.namespace.as_deref());

        self.mutate(&namespace, move |mutation| {
            mutation.on_subgraph_created(SubgraphRecord::new(request.name, request.labels))
        })
        .await
    }

    /// Label changes and a schema publish in the same request lead to a single composition per
    /// affected graph.
    pub async fn update_subgraph(&self, request: UpdateSubgraph) -> Result<MutationOutcome, Error> {
        let namespace = self.namespace(request.namespace.as_deref());

        self.mutate(&namespace, move |mutation| {
            if !mutation.snapshot().subgraphs.contains_key(&request.name) {
                return Err(Error::SubgraphNotFound {
                    namespace: mutation.snapshot().namespace.clone(),
                    name: request.name,
                });
            }

            let labels = if request.unset_labels {
                Some(LabelSet::new())
            } else {
                request.labels
            };

            if let Some(labels) = labels {
                mutation.on_subgraph_labels_changed(&request.name, labels)?;
            }

            if let Some(schema) = request.schema {
                mutation.on_schema_published(&request.name, schema)?;
            }

            Ok(mutation.dirty().clone())
        })
        .await
    }

    pub async fn publish_subgraph(&self, request: PublishSubgraph) -> Result<MutationOutcome, Error> {
        let namespace = self.namespace(request.namespace.as_deref());

        self.mutate(&namespace, move |mutation| {
            mutation.on_schema_published(&request.name, request.schema)
        })
        .await
    }

    pub async fn update_federated_graph(&self, request: UpdateFederatedGraph) -> Result<MutationOutcome, Error> {
        let namespace = self.namespace(request.namespace.as_deref());

        self.mutate(&namespace, move |mutation| {
            let change = MatchersChange {
                label_matchers: request.label_matchers,
                unset_label_matchers: request.unset_label_matchers,
            };

            mutation.on_matchers_changed(&request.name, change)
        })
        .await
    }

    pub async fn delete_subgraph(&self, request: DeleteSubgraph) -> Result<MutationOutcome, Error> {
        let namespace = self.namespace(request.namespace.as_deref());

        self.mutate(&namespace, move |mutation| mutation.on_subgraph_deleted(&request.name))
            .await
    }

    /// The composition records of a federated graph, oldest first.
    pub async fn compositions(
        &self,
        namespace: Option<&str>,
        federated_graph: &str,
    ) -> Result<Vec<CompositionRecord>, Error> {
        let namespace = self.namespace(namespace);

        Ok(self.store.compositions(&namespace, federated_graph).await?)
    }

    pub async fn load_namespace(&self, namespace: Option<&str>) -> Result<NamespaceSnapshot, Error> {
        let namespace = self.namespace(namespace);

        Ok(self.store.load_namespace(&namespace).await?)
    }

    fn namespace(&self, namespace: Option<&str>) -> String {
        namespace.unwrap_or(&self.config.default_namespace).to_owned()
    }

    async fn mutate<F>(&self, namespace: &str, apply: F) -> Result<MutationOutcome, Error>
    where
        F: FnOnce(&mut Mutation<'_>) -> Result<DirtyGraphs, Error>,
    {
        let mut snapshot = self.store.load_namespace(namespace).await?;

        let plan = {
            let mut mutation = Mutation::new(&mut snapshot);
            apply(&mut mutation)?;
            mutation.finish()
        };

        self.commit(&snapshot, &plan).await?;

        let compositions = self.compose(&mut snapshot, &plan.dirty).await?;

        Ok(MutationOutcome {
            dirty: plan.dirty,
            compositions,
        })
    }

    async fn commit(&self, snapshot: &NamespaceSnapshot, plan: &MutationPlan) -> Result<(), Error> {
        let namespace = snapshot.namespace.as_str();

        for name in &plan.deleted_subgraphs {
            self.store.delete_subgraph(namespace, name).await?;
        }

        for subgraph in plan
            .saved_subgraphs
            .iter()
            .filter_map(|name| snapshot.subgraphs.get(name))
        {
            self.store.save_subgraph(namespace, subgraph).await?;
        }

        for graph in plan
            .saved_graphs
            .iter()
            .filter_map(|name| snapshot.federated_graphs.get(name))
        {
            self.store.save_federated_graph(namespace, graph).await?;
        }

        Ok(())
    }

    /// One attempt per dirty graph, at most `max_parallel` at a time. Records are appended in
    /// graph name order.
    async fn compose(
        &self,
        snapshot: &mut NamespaceSnapshot,
        dirty: &DirtyGraphs,
    ) -> Result<Vec<CompositionRecord>, Error> {
        let inputs: Vec<CompositionInput> = dirty
            .iter()
            .filter_map(|name| snapshot.federated_graphs.get(name))
            .map(|graph| CompositionInput {
                namespace: snapshot.namespace.clone(),
                federated_graph: graph.name.clone(),
                subgraphs: graph
                    .members
                    .iter()
                    .map(|name| SubgraphInput {
                        name: name.clone(),
                        schema: snapshot
                            .subgraphs
                            .get(name)
                            .and_then(|subgraph| subgraph.schema.clone()),
                    })
                    .collect(),
            })
            .collect();

        let mut attempts: Vec<(CompositionRecord, Option<String>)> = futures_util::stream::iter(inputs)
            .map(|input| self.attempt(input))
            .buffer_unordered(self.config.composition.max_parallel.get())
            .collect()
            .await;

        attempts.sort_by(|(one, _), (other, _)| one.federated_graph.cmp(&other.federated_graph));

        let mut records = Vec::with_capacity(attempts.len());

        for (record, composed_schema) in attempts {
            self.store.append_composition(&snapshot.namespace, &record).await?;

            // A failed attempt keeps the previous composed schema. Only the schema is written: the
            // matchers and members may have changed in the store while composing.
            if let Some(composed_schema) = composed_schema {
                self.store
                    .save_composed_schema(&snapshot.namespace, &record.federated_graph, &composed_schema)
                    .await?;

                if let Some(graph) = snapshot.federated_graphs.get_mut(&record.federated_graph) {
                    graph.composed_schema = Some(composed_schema);
                }
            }

            records.push(record);
        }

        Ok(records)
    }

    async fn attempt(&self, input: CompositionInput) -> (CompositionRecord, Option<String>) {
        let members = input.subgraphs.iter().map(|subgraph| subgraph.name.clone()).collect();
        let record = CompositionRecord::pending(&input.federated_graph, members);

        if input.subgraphs.is_empty() {
            tracing::info!(
                namespace = %input.namespace,
                federated_graph = %input.federated_graph,
                "federated graph has no subgraph, skipping composition"
            );

            return (record.fail(vec![EMPTY_MEMBERSHIP_ERROR.to_owned()]), None);
        }

        let span = tracing::info_span!(
            "compose",
            namespace = %input.namespace,
            federated_graph = %input.federated_graph,
            subgraphs = input.subgraphs.len(),
        );

        let output = self.composer.compose(&input).instrument(span).await;

        if output.is_success() {
            (record.succeed(), output.composed_schema)
        } else {
            tracing::warn!(
                namespace = %input.namespace,
                federated_graph = %input.federated_graph,
                errors = output.errors.len(),
                composed = output.composed_schema.is_some(),
                "composition failed"
            );

            let errors = if output.errors.is_empty() {
                vec![MISSING_SCHEMA_ERROR.to_owned()]
            } else {
                output.errors
            };

            (record.fail(errors), None)
        }
    }
}
