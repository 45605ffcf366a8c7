use crate::engine::{store::PostStore, sync::SyncHandle};
use fahrplan_common::model::{
    ModelValidationError,
    assist::ApiCredential,
    post::{Post, PostDraft},
};
use fahrplan_gateway::client::{GatewayError, RemoteGateway};
use std::{fmt::Display, sync::Arc};
use thiserror::Error;
use tracing::{debug, warn};

pub mod assist;
pub mod compose;
pub mod index;
#[cfg(test)]
pub(crate) mod mock;
pub mod selection;
pub mod store;
pub mod sync;

pub type Result<T, E = EngineError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("The submission was invalid: {0}")]
    Validation(#[from] ModelValidationError),
    #[error("The remote request failed: {0}")]
    Remote(#[from] GatewayError),
}

/// Coarse classification of a failure, for the UI to pick a rendering.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum FailureKind {
    Network,
    Validation,
    Partial,
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network"),
            FailureKind::Validation => write!(f, "validation"),
            FailureKind::Partial => write!(f, "partial"),
        }
    }
}

impl EngineError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            EngineError::Validation(_) => FailureKind::Validation,
            EngineError::Remote(_) => FailureKind::Network,
        }
    }
}

/// A displayable failure as handed to the view layer.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&EngineError> for Failure {
    fn from(value: &EngineError) -> Self {
        Self {
            kind: value.kind(),
            message: value.to_string(),
        }
    }
}

/// The engine façade: one lifecycle-scoped instance owning the store handle,
/// the gateway, and the assist credential. Constructed once and passed by
/// reference to whatever renders it; there are no hidden singletons.
pub struct Engine<G: ?Sized> {
    store: PostStore,
    gateway: Arc<G>,
    credential: Option<ApiCredential>,
    sync: SyncHandle,
}

impl<G: RemoteGateway + ?Sized> Engine<G> {
    #[must_use]
    pub fn new(
        gateway: Arc<G>,
        store: PostStore,
        credential: Option<ApiCredential>,
        sync: SyncHandle,
    ) -> Self {
        Self {
            store,
            gateway,
            credential,
            sync,
        }
    }

    #[must_use]
    pub fn store(&self) -> &PostStore {
        &self.store
    }

    #[must_use]
    pub fn sync(&self) -> &SyncHandle {
        &self.sync
    }

    /// Submits a draft. The optimistic record is inserted before the request
    /// is issued, so the caller can render it immediately; the next
    /// reconciliation supersedes it with the authoritative record.
    ///
    /// On a remote failure the optimistic record is left in place (the next
    /// reconciliation drops it) and the error is returned.
    pub async fn submit(&self, draft: PostDraft) -> Result<Post> {
        let optimistic = self.store.optimistic_insert(&draft);
        debug!(id = %optimistic.id, "Inserted optimistic post");

        match self.gateway.create_post(&draft).await {
            Ok(created) => {
                debug!(id = created.id, "Remote accepted the post");
                self.sync.request_sync();
                Ok(optimistic)
            }
            Err(error) => {
                warn!(%error, "Remote rejected the post");
                Err(error.into())
            }
        }
    }
}
