//! Activity log
//!
//! Records submitted swaps with their summaries so the user can follow them.
//! The swap path only appends; confirmation status is updated afterwards.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use ethers::types::TxHash;
use evm_client::SubmittedTransaction;
use serde::Serialize;
use tokio::sync::RwLock;

/// Receives every submitted swap
#[async_trait]
pub trait TransactionTracker: Send + Sync {
    /// Record a submission; returns the activity id
    async fn add_transaction(&self, tx: &SubmittedTransaction, summary: &str) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Pending,
    Confirmed,
    Failed,
    Dropped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    pub id: String,
    pub hash: TxHash,
    pub summary: String,
    /// Unix seconds
    pub submitted_at: u64,
    pub status: ActivityStatus,
}

/// In-memory activity log
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: RwLock<Vec<ActivityEntry>>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries, oldest first
    pub async fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.read().await.clone()
    }

    pub async fn pending(&self) -> Vec<ActivityEntry> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.status == ActivityStatus::Pending)
            .cloned()
            .collect()
    }

    /// Update the status of the entry for `hash`. Returns false if unknown.
    pub async fn set_status(&self, hash: TxHash, status: ActivityStatus) -> bool {
        let mut entries = self.entries.write().await;
        match entries.iter_mut().find(|e| e.hash == hash) {
            Some(entry) => {
                entry.status = status;
                true
            }
            None => false,
        }
    }

    pub async fn mark_confirmed(&self, hash: TxHash) -> bool {
        self.set_status(hash, ActivityStatus::Confirmed).await
    }

    /// Wait for `confirmations` and record the outcome
    pub async fn track_confirmation(&self, tx: &SubmittedTransaction, confirmations: usize) -> ActivityStatus {
        let status = match tx.wait(confirmations).await {
            Ok(Some(receipt)) if receipt.status == Some(1u64.into()) => ActivityStatus::Confirmed,
            Ok(Some(_)) => ActivityStatus::Failed,
            Ok(None) => ActivityStatus::Dropped,
            Err(e) => {
                tracing::warn!(hash = ?tx.hash, error = %e, "Failed to wait for transaction");
                return ActivityStatus::Pending;
            }
        };

        self.set_status(tx.hash, status).await;
        tracing::info!(hash = ?tx.hash, ?status, "Transaction resolved");
        status
    }
}

#[async_trait]
impl TransactionTracker for ActivityLog {
    async fn add_transaction(&self, tx: &SubmittedTransaction, summary: &str) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let submitted_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        self.entries.write().await.push(ActivityEntry {
            id: id.clone(),
            hash: tx.hash,
            summary: summary.to_string(),
            submitted_at,
            status: ActivityStatus::Pending,
        });

        tracing::debug!(%id, hash = ?tx.hash, %summary, "Transaction added to activity");
        id
    }
}
