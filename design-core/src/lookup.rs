//! Document lookup: the seam between the renderer and wherever documents live.
//!
//! A [`DocumentSource`] resolves either a document id (preview) or a share
//! token (runtime). [`load`] runs one lookup and folds the outcome into a
//! [`LoadState`] the host can render directly.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{DesignError, DesignResult, DocumentRecord};

/// How a document is addressed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "by", content = "key", rename_all = "kebab-case")]
pub enum DocumentKey {
    /// Direct document id, used by the editor preview.
    Id(String),
    /// Public share token, used by the runtime.
    ShareToken(String),
}

impl std::fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::ShareToken(token) => write!(f, "share token {token}"),
        }
    }
}

/// Where documents come from.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch a document by id.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::NotFound`] if no such document exists, or a
    /// transient/IO error if the lookup itself failed.
    async fn fetch_by_id(&self, id: &str) -> DesignResult<DocumentRecord>;

    /// Fetch a document through a share token.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::NotShared`] if the token does not resolve to a
    /// shared document.
    async fn fetch_by_share_token(&self, token: &str) -> DesignResult<DocumentRecord>;

    /// Fetch by either addressing scheme.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying fetch.
    async fn fetch(&self, key: &DocumentKey) -> DesignResult<DocumentRecord> {
        match key {
            DocumentKey::Id(id) => self.fetch_by_id(id).await,
            DocumentKey::ShareToken(token) => self.fetch_by_share_token(token).await,
        }
    }
}

/// Outcome of a document lookup as seen by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// Lookup in flight.
    Loading,
    /// Document available.
    Ready(Box<DocumentRecord>),
    /// Document missing or not shared.
    NotFound,
    /// Lookup failed.
    Failed {
        /// Human readable reason.
        message: String,
        /// Whether retrying may help.
        retryable: bool,
    },
}

impl LoadState {
    /// Fold a lookup result into a load state.
    #[must_use]
    pub fn from_result(result: DesignResult<DocumentRecord>) -> Self {
        match result {
            Ok(record) => Self::Ready(Box::new(record)),
            Err(e) if e.is_not_found() => Self::NotFound,
            Err(e) => Self::Failed {
                retryable: e.is_retryable(),
                message: e.to_string(),
            },
        }
    }

    /// Whether the host should offer a retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Failed { retryable: true, .. })
    }

    /// Whether the lookup has finished.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading)
    }

    /// The record, once ready.
    #[must_use]
    pub fn record(&self) -> Option<&DocumentRecord> {
        match self {
            Self::Ready(record) => Some(record.as_ref()),
            _ => None,
        }
    }
}

/// Run one lookup.
pub async fn load(source: &dyn DocumentSource, key: &DocumentKey) -> LoadState {
    tracing::debug!("Loading document by {key}");
    let state = LoadState::from_result(source.fetch(key).await);
    match &state {
        LoadState::Ready(record) => tracing::info!("Loaded document {} ({key})", record.id),
        LoadState::NotFound => tracing::warn!("No document for {key}"),
        LoadState::Failed { message, .. } => tracing::error!("Lookup of {key} failed: {message}"),
        LoadState::Loading => {}
    }
    state
}

#[derive(Debug, Default)]
struct MemoryInner {
    records: HashMap<String, DocumentRecord>,
    shares: HashMap<String, String>,
}

/// Thread-safe in-memory document source.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    inner: Arc<RwLock<MemoryInner>>,
}

impl MemorySource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::Transient`] if the lock is poisoned.
    pub fn insert(&self, record: DocumentRecord) -> DesignResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| DesignError::Transient("Lock poisoned".to_string()))?;
        inner.records.insert(record.id.clone(), record);
        Ok(())
    }

    /// Publish a document under a share token.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::NotFound`] if the document does not exist.
    pub fn share(&self, id: &str, token: impl Into<String>) -> DesignResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| DesignError::Transient("Lock poisoned".to_string()))?;
        if !inner.records.contains_key(id) {
            return Err(DesignError::NotFound(id.to_string()));
        }
        inner.shares.insert(token.into(), id.to_string());
        Ok(())
    }

    /// Withdraw a share token.
    pub fn unshare(&self, token: &str) {
        if let Ok(mut inner) = self.inner.write() {
            inner.shares.remove(token);
        }
    }
}

#[async_trait]
impl DocumentSource for MemorySource {
    async fn fetch_by_id(&self, id: &str) -> DesignResult<DocumentRecord> {
        let inner = self
            .inner
            .read()
            .map_err(|_| DesignError::Transient("Lock poisoned".to_string()))?;
        inner
            .records
            .get(id)
            .cloned()
            .ok_or_else(|| DesignError::NotFound(id.to_string()))
    }

    async fn fetch_by_share_token(&self, token: &str) -> DesignResult<DocumentRecord> {
        let inner = self
            .inner
            .read()
            .map_err(|_| DesignError::Transient("Lock poisoned".to_string()))?;
        inner
            .shares
            .get(token)
            .and_then(|id| inner.records.get(id))
            .cloned()
            .ok_or_else(|| DesignError::NotShared(token.to_string()))
    }
}
