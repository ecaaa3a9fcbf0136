use async_trait::async_trait;

use anteroom_core::AppResult;
use anteroom_domain::BlockedEntry;

/// Repository port for the hard-deny block list.
#[async_trait]
pub trait BlockListRepository: Send + Sync {
    /// Inserts or replaces the entry for the given email.
    async fn upsert(&self, entry: BlockedEntry) -> AppResult<()>;

    /// Removes the entry for an email. Returns whether one existed.
    async fn delete(&self, email: &str) -> AppResult<bool>;

    /// Finds the entry for an email, if blocked.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<BlockedEntry>>;

    /// Lists all blocked entries, newest first.
    async fn list(&self) -> AppResult<Vec<BlockedEntry>>;
}
