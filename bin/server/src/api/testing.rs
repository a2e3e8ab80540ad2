//! In-memory doubles and a router harness for API tests.

use crate::auth::{AppState, EmailSettings};
use crate::config::SessionConfig;
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use reunion_catalog::{Catalog, MemoryCatalogStore};
use reunion_mailer::{BatchOutcome, EmailMessage, EmailSender, MailerError, SendReceipt};
use reunion_platform_access::{
    AuthenticationError, AuthorizationError, Principal, RoleResolver, RoleSet, Session, SessionId,
    SessionStore, StaticRoleResolver,
};
use rootcause::Report;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const EMAIL_SECRET: &str = "test-email-secret";
pub const ADMIN_ADDRESS: &str = "admin@reunion.test";

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<SessionId, Session>>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn find(&self, id: &SessionId) -> Result<Option<Session>, Report<AuthenticationError>> {
        Ok(self.sessions.lock().unwrap().get(id).cloned())
    }

    async fn create(&self, session: &Session) -> Result<(), Report<AuthenticationError>> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id().clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), Report<AuthenticationError>> {
        self.sessions.lock().unwrap().remove(id);
        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, Report<AuthenticationError>> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired());
        Ok((before - sessions.len()) as u64)
    }
}

/// Allow-list resolver that counts calls and can be told to fail.
pub struct CountingResolver {
    inner: StaticRoleResolver,
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl CountingResolver {
    fn new() -> Self {
        Self {
            inner: StaticRoleResolver::new(
                ["user_1234", "user_both"],
                ["user_5678", "user_both"],
            ),
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl RoleResolver for CountingResolver {
    async fn resolve_roles(
        &self,
        principal: &Principal,
    ) -> Result<RoleSet, Report<AuthorizationError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.swap(false, Ordering::SeqCst) {
            return Err(AuthorizationError::ResolutionFailed {
                reason: "role store offline".to_string(),
            }
            .into());
        }
        self.inner.resolve_roles(principal).await
    }
}

/// Sender that records messages and hands out sequential ids.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<EmailMessage>>,
    batches: AtomicUsize,
    /// Successful sends left before the next one fails.
    fail_countdown: Mutex<Option<usize>>,
}

impl RecordingSender {
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn batches(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }

    pub fn fail_next(&self) {
        self.fail_after(0);
    }

    /// Lets `successes` messages through, then fails one.
    pub fn fail_after(&self, successes: usize) {
        *self.fail_countdown.lock().unwrap() = Some(successes);
    }

    fn record(&self, message: EmailMessage) -> Result<SendReceipt, Report<MailerError>> {
        {
            let mut countdown = self.fail_countdown.lock().unwrap();
            match *countdown {
                Some(0) => {
                    *countdown = None;
                    return Err(MailerError::Rejected {
                        status: 422,
                        body: "secret provider detail".to_string(),
                    }
                    .into());
                }
                Some(left) => *countdown = Some(left - 1),
                None => {}
            }
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(message);
        Ok(SendReceipt {
            id: format!("email_{}", sent.len()),
        })
    }
}

#[async_trait]
impl EmailSender for RecordingSender {
    async fn send(&self, message: EmailMessage) -> Result<SendReceipt, Report<MailerError>> {
        self.record(message)
    }

    async fn send_batch(&self, messages: Vec<EmailMessage>) -> BatchOutcome {
        self.batches.fetch_add(1, Ordering::SeqCst);
        let mut receipts = Vec::with_capacity(messages.len());
        for message in messages {
            match self.record(message) {
                Ok(receipt) => receipts.push(receipt),
                Err(report) => return BatchOutcome::interrupted(receipts, report),
            }
        }
        BatchOutcome::delivered(receipts)
    }
}

pub struct TestApp {
    router: Router,
    pub sessions: Arc<MemorySessionStore>,
    pub resolver: Arc<CountingResolver>,
    pub mailer: Arc<RecordingSender>,
}

impl TestApp {
    pub async fn new() -> Self {
        let sessions = Arc::new(MemorySessionStore::default());
        let resolver = Arc::new(CountingResolver::new());
        let mailer = Arc::new(RecordingSender::default());

        let state = Arc::new(AppState::new(
            sessions.clone(),
            resolver.clone(),
            Catalog::new(Arc::new(MemoryCatalogStore::new())),
            mailer.clone(),
            EmailSettings {
                api_secret: EMAIL_SECRET.to_string(),
                admin_address: ADMIN_ADDRESS.to_string(),
            },
            SessionConfig::default(),
        ));

        Self {
            router: super::router().with_state(state),
            sessions,
            resolver,
            mailer,
        }
    }

    /// Creates a live session for `principal` and returns its ID.
    pub async fn sign_in(&self, principal: &str) -> String {
        self.store_session(principal, Duration::minutes(60)).await
    }

    pub async fn sign_in_expired(&self, principal: &str) -> String {
        let id = SessionId::new(format!("expired-{principal}"));
        let now = Utc::now();
        let session = Session::restore(
            id.clone(),
            Principal::new(principal).unwrap(),
            now - Duration::hours(2),
            now - Duration::hours(1),
        );
        self.sessions.create(&session).await.unwrap();
        id.as_str().to_string()
    }

    async fn store_session(&self, principal: &str, duration: Duration) -> String {
        let id = SessionId::new(format!("session-{principal}"));
        let session = Session::new(id.clone(), Principal::new(principal).unwrap(), duration);
        self.sessions.create(&session).await.unwrap();
        id.as_str().to_string()
    }

    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub async fn read_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
