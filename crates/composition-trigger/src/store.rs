mod memory;

use std::sync::Arc;

pub use memory::InMemoryGraphStore;

use crate::{
    StoreResult,
    records::{CompositionRecord, FederatedGraphRecord, NamespaceSnapshot, SubgraphRecord},
};

/// Persistence of subgraphs, federated graphs and composition records.
///
/// Every method is atomic on its own, nothing more. Callers serialize conflicting requests on
/// the same namespace if a loaded snapshot has to stay consistent until its changes are saved.
#[derive(Clone)]
pub struct GraphStore(Arc<dyn GraphStoreInner>);

impl GraphStore {
    pub fn new(inner: impl GraphStoreInner + 'static) -> Self {
        Self(Arc::new(inner))
    }
}

impl std::ops::Deref for GraphStore {
    type Target = dyn GraphStoreInner;
    fn deref(&self) -> &Self::Target {
        self.0.deref()
    }
}

#[async_trait::async_trait]
pub trait GraphStoreInner: Send + Sync {
    /// Everything in `namespace`. An unknown namespace is empty.
    async fn load_namespace(&self, namespace: &str) -> StoreResult<NamespaceSnapshot>;
    async fn save_subgraph(&self, namespace: &str, subgraph: &SubgraphRecord) -> StoreResult<()>;
    async fn delete_subgraph(&self, namespace: &str, name: &str) -> StoreResult<()>;
    async fn save_federated_graph(&self, namespace: &str, graph: &FederatedGraphRecord) -> StoreResult<()>;
    /// Replace the composed schema of a federated graph and nothing else. Unknown graphs are
    /// ignored.
    async fn save_composed_schema(&self, namespace: &str, federated_graph: &str, schema: &str) -> StoreResult<()>;
    async fn append_composition(&self, namespace: &str, record: &CompositionRecord) -> StoreResult<()>;
    /// The composition records of a federated graph, oldest first.
    async fn compositions(&self, namespace: &str, federated_graph: &str) -> StoreResult<Vec<CompositionRecord>>;
}
