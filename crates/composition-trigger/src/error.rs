#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("The subgraph `{name}` does not exist in the namespace `{namespace}`.")]
    SubgraphNotFound { namespace: String, name: String },
    #[error("The federated graph `{name}` does not exist in the namespace `{namespace}`.")]
    FederatedGraphNotFound { namespace: String, name: String },
    #[error("The subgraph `{name}` already exists in the namespace `{namespace}`.")]
    SubgraphAlreadyExists { namespace: String, name: String },
    #[error("The federated graph `{name}` already exists in the namespace `{namespace}`.")]
    FederatedGraphAlreadyExists { namespace: String, name: String },
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Failures reported by a [`GraphStore`](crate::GraphStore) implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store error: {0}")]
    Store(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
