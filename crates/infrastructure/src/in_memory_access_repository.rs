//! In-memory implementations of the access-control stores.
//!
//! Useful for tests and for running the API without PostgreSQL. Requests and
//! grants live behind a single lock so the approval path keeps the same
//! atomicity the SQL transaction provides.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use anteroom_application::{
    AccessRequestRepository, AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository,
    AuditRepository, BlockListRepository, GrantRepository, GrantTerms, PendingDecision,
};
use anteroom_core::AppResult;
use anteroom_domain::{AccessRequest, BlockedEntry, Grant, RequestId, RequestStatus};

#[derive(Debug, Default)]
struct AccessState {
    requests: HashMap<RequestId, AccessRequest>,
    grants: HashMap<String, Grant>,
}

/// In-memory access store implementing the request, grant, and block list
/// ports.
#[derive(Debug, Default)]
pub struct InMemoryAccessRepository {
    state: Mutex<AccessState>,
    block_list: RwLock<HashMap<String, BlockedEntry>>,
}

impl InMemoryAccessRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccessRequestRepository for InMemoryAccessRepository {
    async fn insert(&self, request: AccessRequest) -> AppResult<()> {
        self.state.lock().await.requests.insert(request.id, request);
        Ok(())
    }

    async fn find_by_id(&self, request_id: RequestId) -> AppResult<Option<AccessRequest>> {
        Ok(self.state.lock().await.requests.get(&request_id).cloned())
    }

    async fn find_pending_by_email(&self, email: &str) -> AppResult<Option<AccessRequest>> {
        Ok(self
            .state
            .lock()
            .await
            .requests
            .values()
            .find(|request| request.email == email && request.is_pending())
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<AccessRequest>> {
        let mut requests: Vec<AccessRequest> =
            self.state.lock().await.requests.values().cloned().collect();
        requests.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(requests)
    }

    async fn count_pending(&self) -> AppResult<u64> {
        Ok(self
            .state
            .lock()
            .await
            .requests
            .values()
            .filter(|request| request.is_pending())
            .count() as u64)
    }

    async fn approve_pending(
        &self,
        request_id: RequestId,
        terms: GrantTerms,
    ) -> AppResult<PendingDecision> {
        let mut state = self.state.lock().await;

        let Some(request) = state.requests.get_mut(&request_id) else {
            return Ok(PendingDecision::NotFound);
        };

        if request.status.is_terminal() {
            return Ok(PendingDecision::AlreadyProcessed);
        }

        request.status = RequestStatus::Approved;
        request.access_type = Some(terms.access_type);
        let updated = request.clone();

        state.grants.insert(
            updated.email.clone(),
            Grant {
                email: updated.email.clone(),
                name: updated.name.clone(),
                access_type: terms.access_type,
                granted_at: terms.granted_at,
                expires_at: terms.expires_at,
                approved_by: terms.approved_by,
            },
        );

        Ok(PendingDecision::Applied(updated))
    }

    async fn deny_pending(&self, request_id: RequestId) -> AppResult<PendingDecision> {
        let mut state = self.state.lock().await;

        let Some(request) = state.requests.get_mut(&request_id) else {
            return Ok(PendingDecision::NotFound);
        };

        if request.status.is_terminal() {
            return Ok(PendingDecision::AlreadyProcessed);
        }

        request.status = RequestStatus::Denied;
        Ok(PendingDecision::Applied(request.clone()))
    }
}

#[async_trait]
impl GrantRepository for InMemoryAccessRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Grant>> {
        Ok(self.state.lock().await.grants.get(email).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Grant>> {
        let mut grants: Vec<Grant> = self.state.lock().await.grants.values().cloned().collect();
        grants.sort_by(|left, right| right.granted_at.cmp(&left.granted_at));
        Ok(grants)
    }

    async fn delete_by_email(&self, email: &str) -> AppResult<bool> {
        Ok(self.state.lock().await.grants.remove(email).is_some())
    }

    async fn delete_expired(&self, email: &str, now: DateTime<Utc>) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let expired = state
            .grants
            .get(email)
            .is_some_and(|grant| grant.is_expired(now));
        if expired {
            state.grants.remove(email);
        }
        Ok(expired)
    }

    async fn purge_expired_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.grants.len();
        state.grants.retain(|_, grant| !grant.is_expired(cutoff));
        Ok((before - state.grants.len()) as u64)
    }
}

#[async_trait]
impl BlockListRepository for InMemoryAccessRepository {
    async fn upsert(&self, entry: BlockedEntry) -> AppResult<()> {
        self.block_list
            .write()
            .await
            .insert(entry.email.clone(), entry);
        Ok(())
    }

    async fn delete(&self, email: &str) -> AppResult<bool> {
        Ok(self.block_list.write().await.remove(email).is_some())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<BlockedEntry>> {
        Ok(self.block_list.read().await.get(email).cloned())
    }

    async fn list(&self) -> AppResult<Vec<BlockedEntry>> {
        let mut entries: Vec<BlockedEntry> =
            self.block_list.read().await.values().cloned().collect();
        entries.sort_by(|left, right| right.blocked_at.cmp(&left.blocked_at));
        Ok(entries)
    }
}

#[derive(Debug, Clone)]
struct StoredAuditEntry {
    entry: AuditLogEntry,
    created_at: DateTime<Utc>,
}

/// In-memory audit store implementing both the append and the read ports.
#[derive(Debug, Default)]
pub struct InMemoryAuditRepository {
    entries: Mutex<Vec<StoredAuditEntry>>,
}

impl InMemoryAuditRepository {
    /// Creates an empty in-memory audit repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        let created_at = Utc::now();
        self.entries.lock().await.push(StoredAuditEntry {
            entry: AuditLogEntry {
                event_id: Uuid::new_v4().to_string(),
                subject: event.subject,
                action: event.action.as_str().to_owned(),
                resource_type: event.resource_type,
                resource_id: event.resource_id,
                detail: event.detail,
                created_at: created_at.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            },
            created_at,
        });
        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditRepository {
    async fn list_recent_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        let entries = self.entries.lock().await;

        let mut matched: Vec<StoredAuditEntry> = entries
            .iter()
            .filter(|stored| {
                query
                    .action
                    .as_deref()
                    .is_none_or(|action| stored.entry.action == action)
                    && query
                        .subject
                        .as_deref()
                        .is_none_or(|subject| stored.entry.subject == subject)
            })
            .cloned()
            .collect();
        matched.sort_by(|left, right| right.created_at.cmp(&left.created_at));

        Ok(matched
            .into_iter()
            .skip(query.offset)
            .take(query.limit.clamp(1, 200))
            .map(|stored| stored.entry)
            .collect())
    }

    async fn purge_entries_older_than(&self, retention_days: u16) -> AppResult<u64> {
        let cutoff = Utc::now() - Duration::days(i64::from(retention_days));
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|stored| stored.created_at >= cutoff);
        Ok((before - entries.len()) as u64)
    }
}
