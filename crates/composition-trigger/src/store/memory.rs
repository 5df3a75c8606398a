use std::collections::HashMap;

use tokio::sync::Mutex;

use super::GraphStoreInner;
use crate::{
    StoreResult,
    records::{CompositionRecord, FederatedGraphRecord, NamespaceSnapshot, SubgraphRecord},
};

/// A store keeping everything in memory, for tests and local tooling.
#[derive(Default)]
pub struct InMemoryGraphStore {
    namespaces: Mutex<HashMap<String, Namespace>>,
}

#[derive(Default)]
struct Namespace {
    snapshot: NamespaceSnapshot,
    compositions: Vec<CompositionRecord>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn namespace_entry<'a>(namespaces: &'a mut HashMap<String, Namespace>, namespace: &str) -> &'a mut Namespace {
    namespaces.entry(namespace.to_owned()).or_insert_with(|| Namespace {
        snapshot: NamespaceSnapshot::new(namespace),
        compositions: Vec::new(),
    })
}

#[async_trait::async_trait]
impl GraphStoreInner for InMemoryGraphStore {
    async fn load_namespace(&self, namespace: &str) -> StoreResult<NamespaceSnapshot> {
        let namespaces = self.namespaces.lock().await;

        Ok(namespaces
            .get(namespace)
            .map(|entry| entry.snapshot.clone())
            .unwrap_or_else(|| NamespaceSnapshot::new(namespace)))
    }

    async fn save_subgraph(&self, namespace: &str, subgraph: &SubgraphRecord) -> StoreResult<()> {
        let mut namespaces = self.namespaces.lock().await;

        namespace_entry(&mut namespaces, namespace)
            .snapshot
            .subgraphs
            .insert(subgraph.name.clone(), subgraph.clone());

        Ok(())
    }

    async fn delete_subgraph(&self, namespace: &str, name: &str) -> StoreResult<()> {
        let mut namespaces = self.namespaces.lock().await;

        if let Some(entry) = namespaces.get_mut(namespace) {
            entry.snapshot.subgraphs.remove(name);
        }

        Ok(())
    }

    async fn save_federated_graph(&self, namespace: &str, graph: &FederatedGraphRecord) -> StoreResult<()> {
        let mut namespaces = self.namespaces.lock().await;

        namespace_entry(&mut namespaces, namespace)
            .snapshot
            .federated_graphs
            .insert(graph.name.clone(), graph.clone());

        Ok(())
    }

    async fn save_composed_schema(&self, namespace: &str, federated_graph: &str, schema: &str) -> StoreResult<()> {
        let mut namespaces = self.namespaces.lock().await;

        let graph = namespaces
            .get_mut(namespace)
            .and_then(|entry| entry.snapshot.federated_graphs.get_mut(federated_graph));

        if let Some(graph) = graph {
            graph.composed_schema = Some(schema.to_owned());
        }

        Ok(())
    }

    async fn append_composition(&self, namespace: &str, record: &CompositionRecord) -> StoreResult<()> {
        let mut namespaces = self.namespaces.lock().await;

        namespace_entry(&mut namespaces, namespace)
            .compositions
            .push(record.clone());

        Ok(())
    }

    async fn compositions(&self, namespace: &str, federated_graph: &str) -> StoreResult<Vec<CompositionRecord>> {
        let namespaces = self.namespaces.lock().await;

        Ok(namespaces
            .get(namespace)
            .map(|entry| {
                entry
                    .compositions
                    .iter()
                    .filter(|record| record.federated_graph == federated_graph)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use graph_labels::{LabelSet, MatcherSet};
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn unknown_namespace_is_empty() {
        let store = InMemoryGraphStore::new();

        let snapshot = store.load_namespace("nowhere").await.unwrap();

        assert_eq!(NamespaceSnapshot::new("nowhere"), snapshot);
        assert!(store.compositions("nowhere", "graph").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn saves_and_deletes() {
        let store = InMemoryGraphStore::new();
        let subgraph = SubgraphRecord::new("products", LabelSet::parse(["team=a"]).unwrap());
        let graph = FederatedGraphRecord::new("shop", MatcherSet::parse(["team=a"]).unwrap());

        store.save_subgraph("default", &subgraph).await.unwrap();
        store.save_federated_graph("default", &graph).await.unwrap();

        let snapshot = store.load_namespace("default").await.unwrap();
        assert_eq!(Some(&subgraph), snapshot.subgraphs.get("products"));
        assert_eq!(Some(&graph), snapshot.federated_graphs.get("shop"));
        assert!(store.load_namespace("other").await.unwrap().subgraphs.is_empty());

        store.delete_subgraph("default", "products").await.unwrap();
        assert!(store.load_namespace("default").await.unwrap().subgraphs.is_empty());
    }

    #[tokio::test]
    async fn composed_schema_leaves_the_rest_of_the_graph_alone() {
        let store = InMemoryGraphStore::new();
        let graph = FederatedGraphRecord::new("shop", MatcherSet::parse(["team=a"]).unwrap());
        store.save_federated_graph("default", &graph).await.unwrap();

        let mut updated = graph.clone();
        updated.label_matchers = MatcherSet::parse(["team=b"]).unwrap();
        store.save_federated_graph("default", &updated).await.unwrap();

        store.save_composed_schema("default", "shop", "type Query { a: Int }").await.unwrap();
        store.save_composed_schema("default", "unknown", "type Query { a: Int }").await.unwrap();

        let snapshot = store.load_namespace("default").await.unwrap();
        let shop = &snapshot.federated_graphs["shop"];

        assert_eq!(updated.label_matchers, shop.label_matchers);
        assert_eq!(Some("type Query { a: Int }"), shop.composed_schema.as_deref());
        assert_eq!(1, snapshot.federated_graphs.len());
    }

    #[tokio::test]
    async fn compositions_are_filtered_by_graph() {
        let store = InMemoryGraphStore::new();

        let first = CompositionRecord::pending("shop", vec!["products".to_owned()]).succeed();
        let second = CompositionRecord::pending("admin", Vec::new()).fail(vec!["boom".to_owned()]);

        store.append_composition("default", &first).await.unwrap();
        store.append_composition("default", &second).await.unwrap();

        assert_eq!(vec![first], store.compositions("default", "shop").await.unwrap());
        assert_eq!(vec![second], store.compositions("default", "admin").await.unwrap());
    }
}
