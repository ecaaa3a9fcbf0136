use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::Mutex;

use anteroom_core::{AppError, AppResult};
use anteroom_domain::{
    AccessRequest, AccessType, AuditAction, BlockedEntry, Grant, RequestId, RequestStatus,
};

use crate::access_ports::{
    AccessRequestRepository, AuditEvent, AuditRepository, BlockListRepository, GrantRepository,
    GrantTerms, PendingDecision, SYSTEM_SUBJECT,
};
use crate::notification_service::AccessNotifier;

use super::{
    AccessService, AccessStatus, ApproveOutcome, DenyOutcome, RevokeOutcome, SubmitAccessRequest,
    SubmitOutcome, UnblockOutcome,
};

#[derive(Default)]
struct StoreState {
    requests: HashMap<RequestId, AccessRequest>,
    grants: HashMap<String, Grant>,
}

/// Requests and grants behind one lock, so the conditional decision plus the
/// grant upsert is observed atomically just like the SQL transaction.
#[derive(Default)]
struct FakeAccessStore {
    state: Mutex<StoreState>,
}

#[async_trait]
impl AccessRequestRepository for FakeAccessStore {
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
impl GrantRepository for FakeAccessStore {
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
        state
            .grants
            .retain(|_, grant| !grant.is_expired(cutoff));
        Ok((before - state.grants.len()) as u64)
    }
}

#[derive(Default)]
struct FakeBlockList {
    entries: Mutex<HashMap<String, BlockedEntry>>,
}

#[async_trait]
impl BlockListRepository for FakeBlockList {
    async fn upsert(&self, entry: BlockedEntry) -> AppResult<()> {
        self.entries.lock().await.insert(entry.email.clone(), entry);
        Ok(())
    }

    async fn delete(&self, email: &str) -> AppResult<bool> {
        Ok(self.entries.lock().await.remove(email).is_some())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<BlockedEntry>> {
        Ok(self.entries.lock().await.get(email).cloned())
    }

    async fn list(&self) -> AppResult<Vec<BlockedEntry>> {
        Ok(self.entries.lock().await.values().cloned().collect())
    }
}

#[derive(Default)]
struct FakeAuditRepository {
    events: Mutex<Vec<AuditEvent>>,
}

impl FakeAuditRepository {
    async fn actions(&self) -> Vec<AuditAction> {
        self.events
            .lock()
            .await
            .iter()
            .map(|event| event.action)
            .collect()
    }

    async fn count_action(&self, action: AuditAction) -> usize {
        self.events
            .lock()
            .await
            .iter()
            .filter(|event| event.action == action)
            .count()
    }
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

#[derive(Default)]
struct FakeNotifier {
    fail: bool,
    notified: Mutex<Vec<RequestId>>,
}

#[async_trait]
impl AccessNotifier for FakeNotifier {
    async fn notify_request_submitted(&self, request: &AccessRequest) -> AppResult<()> {
        if self.fail {
            return Err(AppError::Internal("mail relay unavailable".to_owned()));
        }
        self.notified.lock().await.push(request.id);
        Ok(())
    }
}

struct Harness {
    service: AccessService,
    store: Arc<FakeAccessStore>,
    audit: Arc<FakeAuditRepository>,
    notifier: Arc<FakeNotifier>,
}

fn harness() -> Harness {
    harness_with_notifier(FakeNotifier::default())
}

fn harness_with_notifier(notifier: FakeNotifier) -> Harness {
    let store = Arc::new(FakeAccessStore::default());
    let audit = Arc::new(FakeAuditRepository::default());
    let notifier = Arc::new(notifier);
    let service = AccessService::new(
        store.clone(),
        store.clone(),
        Arc::new(FakeBlockList::default()),
        audit.clone(),
        notifier.clone(),
        Duration::minutes(20),
    );

    Harness {
        service,
        store,
        audit,
        notifier,
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

fn submission(email: &str) -> SubmitAccessRequest {
    SubmitAccessRequest {
        name: "Visitor".to_owned(),
        email: email.to_owned(),
        reason: Some("demo access".to_owned()),
        ip_address: Some("203.0.113.7".to_owned()),
    }
}

async fn submitted_request(harness: &Harness, email: &str) -> AccessRequest {
    let outcome = harness
        .service
        .submit_request_at(submission(email), now())
        .await;
    match outcome {
        Ok(SubmitOutcome::Created(request)) => request,
        other => panic!("expected created request, got {other:?}"),
    }
}

#[tokio::test]
async fn submit_creates_pending_request_and_notifies_approver() {
    let harness = harness();

    let request = submitted_request(&harness, "a@x.com").await;
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.email, "a@x.com");

    assert_eq!(
        harness.audit.actions().await,
        vec![AuditAction::AccessRequestCreated]
    );
    assert_eq!(harness.notifier.notified.lock().await.len(), 1);
}

#[tokio::test]
async fn submit_while_pending_returns_already_pending() {
    let harness = harness();
    let _ = submitted_request(&harness, "a@x.com").await;

    let second = harness
        .service
        .submit_request_at(submission("a@x.com"), now())
        .await;
    assert!(matches!(second, Ok(SubmitOutcome::AlreadyPending)));

    let requests = harness.store.state.lock().await.requests.len();
    assert_eq!(requests, 1);
}

#[tokio::test]
async fn submit_with_active_grant_returns_already_authorized() {
    let harness = harness();
    let request = submitted_request(&harness, "a@x.com").await;

    let approved = harness
        .service
        .approve_at(request.id, AccessType::Permanent, "approver", now())
        .await;
    assert!(matches!(approved, Ok(ApproveOutcome::Granted(_))));

    let again = harness
        .service
        .submit_request_at(submission("a@x.com"), now())
        .await;
    assert!(matches!(again, Ok(SubmitOutcome::AlreadyAuthorized)));
}

#[tokio::test]
async fn denied_email_may_reapply() {
    let harness = harness();
    let request = submitted_request(&harness, "a@x.com").await;

    let denied = harness.service.deny(request.id, "approver").await;
    assert!(matches!(denied, Ok(DenyOutcome::Denied(_))));

    let again = harness
        .service
        .submit_request_at(submission("a@x.com"), now())
        .await;
    assert!(matches!(again, Ok(SubmitOutcome::Created(_))));
}

#[tokio::test]
async fn blocked_email_gets_generic_denial_on_submit() {
    let harness = harness();
    let blocked = harness
        .service
        .block_at("a@x.com", Some("abuse".to_owned()), "approver", now())
        .await;
    assert!(blocked.is_ok());

    let outcome = harness
        .service
        .submit_request_at(submission("a@x.com"), now())
        .await;
    match outcome {
        Err(AppError::Forbidden(message)) => assert_eq!(message, "access denied"),
        other => panic!("expected generic forbidden, got {other:?}"),
    }

    let requests = harness.store.state.lock().await.requests.len();
    assert_eq!(requests, 0);
}

#[tokio::test]
async fn submit_validates_name_and_email() {
    let harness = harness();

    let no_name = harness
        .service
        .submit_request_at(
            SubmitAccessRequest {
                name: "   ".to_owned(),
                email: "a@x.com".to_owned(),
                reason: None,
                ip_address: None,
            },
            now(),
        )
        .await;
    assert!(matches!(no_name, Err(AppError::Validation(_))));

    let bad_email = harness
        .service
        .submit_request_at(
            SubmitAccessRequest {
                name: "Visitor".to_owned(),
                email: "not-an-email".to_owned(),
                reason: None,
                ip_address: None,
            },
            now(),
        )
        .await;
    assert!(matches!(bad_email, Err(AppError::Validation(_))));

    assert!(harness.audit.actions().await.is_empty());
}

#[tokio::test]
async fn notifier_failure_does_not_lose_the_submission() {
    let harness = harness_with_notifier(FakeNotifier {
        fail: true,
        notified: Mutex::new(Vec::new()),
    });

    let outcome = harness
        .service
        .submit_request_at(submission("a@x.com"), now())
        .await;
    assert!(matches!(outcome, Ok(SubmitOutcome::Created(_))));

    let status = harness.service.check_access_at("a@x.com", now()).await;
    assert!(matches!(status, Ok(AccessStatus::Pending)));
}

#[tokio::test]
async fn approve_issues_grant_with_requested_terms() {
    let harness = harness();
    let request = submitted_request(&harness, "a@x.com").await;

    let outcome = harness
        .service
        .approve_at(request.id, AccessType::Temporary, "approver", now())
        .await;
    assert!(matches!(outcome, Ok(ApproveOutcome::Granted(_))));

    let state = harness.store.state.lock().await;
    let grant = state.grants.get("a@x.com").cloned();
    drop(state);

    match grant {
        Some(grant) => {
            assert_eq!(grant.access_type, AccessType::Temporary);
            assert_eq!(grant.expires_at, Some(now() + Duration::minutes(20)));
            assert_eq!(grant.approved_by, "approver");
        }
        None => panic!("grant was not written"),
    }

    assert_eq!(harness.audit.count_action(AuditAction::AccessApproved).await, 1);
}

#[tokio::test]
async fn approve_unknown_request_returns_not_found() {
    let harness = harness();

    let outcome = harness
        .service
        .approve_at(RequestId::new(), AccessType::Permanent, "approver", now())
        .await;
    assert!(matches!(outcome, Ok(ApproveOutcome::NotFound)));
}

#[tokio::test]
async fn repeated_decisions_observe_already_processed() {
    let harness = harness();
    let request = submitted_request(&harness, "a@x.com").await;

    let first = harness
        .service
        .approve_at(request.id, AccessType::Permanent, "approver", now())
        .await;
    assert!(matches!(first, Ok(ApproveOutcome::Granted(_))));

    let second = harness
        .service
        .approve_at(request.id, AccessType::Temporary, "approver", now())
        .await;
    assert!(matches!(second, Ok(ApproveOutcome::AlreadyProcessed)));

    let denial = harness.service.deny(request.id, "approver").await;
    assert!(matches!(denial, Ok(DenyOutcome::AlreadyProcessed)));

    let state = harness.store.state.lock().await;
    assert_eq!(
        state.requests.get(&request.id).map(|request| request.status),
        Some(RequestStatus::Approved)
    );
}

#[tokio::test]
async fn deny_then_approve_leaves_request_denied_without_grant() {
    let harness = harness();
    let request = submitted_request(&harness, "a@x.com").await;

    let denied = harness.service.deny(request.id, "approver").await;
    assert!(matches!(denied, Ok(DenyOutcome::Denied(_))));

    let approval = harness
        .service
        .approve_at(request.id, AccessType::Permanent, "approver", now())
        .await;
    assert!(matches!(approval, Ok(ApproveOutcome::AlreadyProcessed)));

    let state = harness.store.state.lock().await;
    assert_eq!(
        state.requests.get(&request.id).map(|request| request.status),
        Some(RequestStatus::Denied)
    );
    assert!(state.grants.is_empty());
}

#[tokio::test]
async fn concurrent_approvals_resolve_to_exactly_one_winner() {
    let harness = harness();
    let request = submitted_request(&harness, "a@x.com").await;

    let (left, right) = tokio::join!(
        harness
            .service
            .approve_at(request.id, AccessType::Permanent, "console", now()),
        harness
            .service
            .approve_at(request.id, AccessType::Temporary, "action-link", now()),
    );

    let outcomes = [left, right];
    let granted = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, Ok(ApproveOutcome::Granted(_))))
        .count();
    let already_processed = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, Ok(ApproveOutcome::AlreadyProcessed)))
        .count();

    assert_eq!(granted, 1);
    assert_eq!(already_processed, 1);

    let state = harness.store.state.lock().await;
    assert_eq!(state.grants.len(), 1);
}

#[tokio::test]
async fn at_most_one_grant_row_per_email() {
    let harness = harness();

    let first = submitted_request(&harness, "a@x.com").await;
    let approved = harness
        .service
        .approve_at(first.id, AccessType::Temporary, "approver", now())
        .await;
    assert!(matches!(approved, Ok(ApproveOutcome::Granted(_))));

    // Past expiry the email may reapply; re-approval replaces the grant row.
    let later = now() + Duration::minutes(30);
    let second_submit = harness
        .service
        .submit_request_at(submission("a@x.com"), later)
        .await;
    let second = match second_submit {
        Ok(SubmitOutcome::Created(request)) => request,
        other => panic!("expected created request, got {other:?}"),
    };

    let reapproved = harness
        .service
        .approve_at(second.id, AccessType::Permanent, "approver", later)
        .await;
    assert!(matches!(reapproved, Ok(ApproveOutcome::Granted(_))));

    let state = harness.store.state.lock().await;
    assert_eq!(state.grants.len(), 1);
    assert_eq!(
        state.grants.get("a@x.com").map(|grant| grant.access_type),
        Some(AccessType::Permanent)
    );
}

#[tokio::test]
async fn check_access_reports_pending_and_unknown() {
    let harness = harness();

    let unknown = harness.service.check_access_at("a@x.com", now()).await;
    assert!(matches!(unknown, Ok(AccessStatus::Unauthorized)));

    let _ = submitted_request(&harness, "a@x.com").await;
    let pending = harness.service.check_access_at("a@x.com", now()).await;
    assert!(matches!(pending, Ok(AccessStatus::Pending)));
}

#[tokio::test]
async fn temporary_grant_expires_exactly_at_the_boundary() {
    let harness = harness();
    let request = submitted_request(&harness, "a@x.com").await;
    let approved = harness
        .service
        .approve_at(request.id, AccessType::Temporary, "approver", now())
        .await;
    assert!(matches!(approved, Ok(ApproveOutcome::Granted(_))));

    let expires_at = now() + Duration::minutes(20);

    let just_before = harness
        .service
        .check_access_at("a@x.com", expires_at - Duration::seconds(1))
        .await;
    match just_before {
        Ok(AccessStatus::Authorized {
            access_type,
            remaining_seconds,
        }) => {
            assert_eq!(access_type, AccessType::Temporary);
            assert_eq!(remaining_seconds, Some(1));
        }
        other => panic!("expected authorized, got {other:?}"),
    }

    let at_expiry = harness.service.check_access_at("a@x.com", expires_at).await;
    assert!(matches!(at_expiry, Ok(AccessStatus::Unauthorized)));

    assert_eq!(harness.audit.count_action(AuditAction::AccessExpired).await, 1);
    let events = harness.audit.events.lock().await;
    let expiry_subject = events
        .iter()
        .find(|event| event.action == AuditAction::AccessExpired)
        .map(|event| event.subject.clone());
    assert_eq!(expiry_subject, Some(SYSTEM_SUBJECT.to_owned()));
    drop(events);

    let state = harness.store.state.lock().await;
    assert!(state.grants.is_empty());
}

#[tokio::test]
async fn expired_grant_is_removed_and_audited_once() {
    let harness = harness();
    let request = submitted_request(&harness, "a@x.com").await;
    let approved = harness
        .service
        .approve_at(request.id, AccessType::Temporary, "approver", now())
        .await;
    assert!(matches!(approved, Ok(ApproveOutcome::Granted(_))));

    let late = now() + Duration::minutes(25);
    let first = harness.service.check_access_at("a@x.com", late).await;
    let second = harness.service.check_access_at("a@x.com", late).await;
    assert!(matches!(first, Ok(AccessStatus::Unauthorized)));
    assert!(matches!(second, Ok(AccessStatus::Unauthorized)));

    assert_eq!(harness.audit.count_action(AuditAction::AccessExpired).await, 1);
}

#[tokio::test]
async fn full_temporary_lifecycle_scenario() {
    let harness = harness();

    let outcome = harness
        .service
        .submit_request_at(
            SubmitAccessRequest {
                name: "A".to_owned(),
                email: "a@x.com".to_owned(),
                reason: None,
                ip_address: None,
            },
            now(),
        )
        .await;
    let request = match outcome {
        Ok(SubmitOutcome::Created(request)) => request,
        other => panic!("expected created request, got {other:?}"),
    };

    let pending = harness.service.check_access_at("a@x.com", now()).await;
    assert!(matches!(pending, Ok(AccessStatus::Pending)));

    let approved = harness
        .service
        .approve_at(request.id, AccessType::Temporary, "approver", now())
        .await;
    assert!(matches!(approved, Ok(ApproveOutcome::Granted(_))));

    let authorized = harness.service.check_access_at("a@x.com", now()).await;
    match authorized {
        Ok(AccessStatus::Authorized {
            remaining_seconds, ..
        }) => assert_eq!(remaining_seconds, Some(1200)),
        other => panic!("expected authorized, got {other:?}"),
    }

    let past_expiry = harness
        .service
        .check_access_at("a@x.com", now() + Duration::minutes(21))
        .await;
    assert!(matches!(past_expiry, Ok(AccessStatus::Unauthorized)));
    assert_eq!(harness.audit.count_action(AuditAction::AccessExpired).await, 1);
}

#[tokio::test]
async fn revoke_takes_effect_before_expiry() {
    let harness = harness();
    let request = submitted_request(&harness, "a@x.com").await;
    let approved = harness
        .service
        .approve_at(request.id, AccessType::Temporary, "approver", now())
        .await;
    assert!(matches!(approved, Ok(ApproveOutcome::Granted(_))));

    let revoked = harness.service.revoke("a@x.com", "approver").await;
    assert!(matches!(revoked, Ok(RevokeOutcome::Revoked)));

    // Well inside the original expiry window.
    let status = harness
        .service
        .check_access_at("a@x.com", now() + Duration::minutes(1))
        .await;
    assert!(matches!(status, Ok(AccessStatus::Unauthorized)));

    assert_eq!(harness.audit.count_action(AuditAction::AccessRevoked).await, 1);
}

#[tokio::test]
async fn revoke_without_grant_reports_not_found() {
    let harness = harness();

    let outcome = harness.service.revoke("a@x.com", "approver").await;
    assert!(matches!(outcome, Ok(RevokeOutcome::NotFound)));
}

#[tokio::test]
async fn block_voids_an_existing_grant() {
    let harness = harness();
    let request = submitted_request(&harness, "a@x.com").await;
    let approved = harness
        .service
        .approve_at(request.id, AccessType::Permanent, "approver", now())
        .await;
    assert!(matches!(approved, Ok(ApproveOutcome::Granted(_))));

    let blocked = harness
        .service
        .block_at("a@x.com", None, "approver", now())
        .await;
    assert!(blocked.is_ok());

    let status = harness.service.check_access_at("a@x.com", now()).await;
    assert!(matches!(status, Ok(AccessStatus::Unauthorized)));

    let state = harness.store.state.lock().await;
    assert!(state.grants.is_empty());
    drop(state);

    assert_eq!(harness.audit.count_action(AuditAction::EmailBlocked).await, 1);
    assert_eq!(harness.audit.count_action(AuditAction::AccessRevoked).await, 1);
}

#[tokio::test]
async fn unblock_restores_submission() {
    let harness = harness();
    let blocked = harness
        .service
        .block_at("a@x.com", None, "approver", now())
        .await;
    assert!(blocked.is_ok());

    let unblocked = harness.service.unblock("a@x.com", "approver").await;
    assert!(matches!(unblocked, Ok(UnblockOutcome::Unblocked)));

    let again = harness.service.unblock("a@x.com", "approver").await;
    assert!(matches!(again, Ok(UnblockOutcome::NotFound)));

    let outcome = harness
        .service
        .submit_request_at(submission("a@x.com"), now())
        .await;
    assert!(matches!(outcome, Ok(SubmitOutcome::Created(_))));
}

#[tokio::test]
async fn approving_a_blocked_email_fails_closed() {
    let harness = harness();
    let request = submitted_request(&harness, "a@x.com").await;

    let blocked = harness
        .service
        .block_at("a@x.com", None, "approver", now())
        .await;
    assert!(blocked.is_ok());

    let outcome = harness
        .service
        .approve_at(request.id, AccessType::Permanent, "approver", now())
        .await;
    assert!(matches!(outcome, Err(AppError::Forbidden(_))));

    let state = harness.store.state.lock().await;
    assert_eq!(
        state.requests.get(&request.id).map(|request| request.status),
        Some(RequestStatus::Pending)
    );
    assert!(state.grants.is_empty());
}

#[tokio::test]
async fn list_active_grants_hides_expired_rows_without_deleting() {
    let harness = harness();

    let permanent = submitted_request(&harness, "keep@x.com").await;
    let approved = harness
        .service
        .approve_at(permanent.id, AccessType::Permanent, "approver", now())
        .await;
    assert!(matches!(approved, Ok(ApproveOutcome::Granted(_))));

    let temporary = submitted_request(&harness, "lapse@x.com").await;
    let approved = harness
        .service
        .approve_at(temporary.id, AccessType::Temporary, "approver", now())
        .await;
    assert!(matches!(approved, Ok(ApproveOutcome::Granted(_))));

    let later = now() + Duration::minutes(30);
    let active = harness.service.list_active_grants_at(later).await;
    match active {
        Ok(grants) => {
            assert_eq!(grants.len(), 1);
            assert_eq!(
                grants.first().map(|grant| grant.email.clone()),
                Some("keep@x.com".to_owned())
            );
        }
        Err(error) => panic!("listing failed: {error}"),
    }

    // The expired row is hidden, not removed.
    let state = harness.store.state.lock().await;
    assert_eq!(state.grants.len(), 2);
}

#[tokio::test]
async fn pending_count_tracks_only_pending_requests() {
    let harness = harness();

    let first = submitted_request(&harness, "a@x.com").await;
    let _ = submitted_request(&harness, "b@x.com").await;

    let count = harness.service.pending_count().await;
    assert_eq!(count.unwrap_or(0), 2);

    let denied = harness.service.deny(first.id, "approver").await;
    assert!(matches!(denied, Ok(DenyOutcome::Denied(_))));

    let count = harness.service.pending_count().await;
    assert_eq!(count.unwrap_or(0), 1);
}
