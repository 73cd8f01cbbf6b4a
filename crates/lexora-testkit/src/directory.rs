//! Scripted backend directory double
//!
//! [`ScriptedDirectory`] implements [`DirectoryApi`] over in-memory state.
//! Registered users log in with [`TEST_PASSWORD`]; records live in
//! per-kind, per-branch buckets; and failures are scripted as one-shot
//! queues consumed in call order, so a test can say "the next financial
//! list is a 403" and nothing else changes.
//!
//! Token lifecycle is explicit: each login issues `token-N`, and
//! [`ScriptedDirectory::expire_token`] turns every later call under that
//! token into an authentication failure, which is how session-expiry
//! scenarios are driven.

use async_trait::async_trait;
use lexora_core::effects::{DirectoryApi, LoginError, RecordPayload};
use lexora_core::{
    ApiError, Branch, BranchId, CapabilityBaseline, Credentials, LoginSuccess, ResourceKind, User,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;

/// The password every registered test user accepts.
pub const TEST_PASSWORD: &str = "correct horse battery staple";

#[derive(Debug, Default)]
struct DirectoryState {
    users: Vec<User>,
    branches: Vec<Branch>,
    baseline: CapabilityBaseline,
    records: BTreeMap<(ResourceKind, BranchId), Vec<RecordPayload>>,

    issued: u64,
    live_tokens: BTreeSet<String>,

    // One-shot failure scripts, consumed front-first.
    login_failures: VecDeque<LoginError>,
    baseline_failures: VecDeque<ApiError>,
    branch_list_failures: VecDeque<ApiError>,
    list_failures: BTreeMap<ResourceKind, VecDeque<ApiError>>,
    create_failures: BTreeMap<ResourceKind, VecDeque<ApiError>>,

    list_calls: Vec<(ResourceKind, BranchId)>,
}

/// Deterministic in-memory [`DirectoryApi`] double.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDirectory {
    state: Arc<Mutex<DirectoryState>>,
}

impl ScriptedDirectory {
    /// An empty directory: no users, no branches, deny-all baseline.
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Setup ───────────────────────────────────────────────

    /// Register a user who can log in with [`TEST_PASSWORD`].
    pub fn register(&self, user: User) {
        self.state.lock().users.push(user);
    }

    /// Register a super-admin and return the user snapshot.
    pub fn register_super_admin(&self, email: &str) -> User {
        let user = crate::fixtures::super_admin(email);
        self.register(user.clone());
        user
    }

    /// Add a branch to the directory.
    pub fn add_branch(&self, branch: Branch) {
        self.state.lock().branches.push(branch);
    }

    /// Set the baseline the capability endpoint returns.
    pub fn set_baseline(&self, baseline: CapabilityBaseline) {
        self.state.lock().baseline = baseline;
    }

    /// Seed the records of one kind under one branch.
    pub fn seed_records(&self, kind: ResourceKind, branch: BranchId, records: Vec<RecordPayload>) {
        self.state.lock().records.insert((kind, branch), records);
    }

    // ─── Failure scripting ───────────────────────────────────

    /// Make the next login attempt fail.
    pub fn script_login_failure(&self, error: LoginError) {
        self.state.lock().login_failures.push_back(error);
    }

    /// Make the next capability fetch fail.
    pub fn script_baseline_failure(&self, error: ApiError) {
        self.state.lock().baseline_failures.push_back(error);
    }

    /// Make the next branch-list call fail.
    pub fn script_branch_list_failure(&self, error: ApiError) {
        self.state.lock().branch_list_failures.push_back(error);
    }

    /// Make the next list call for one kind fail.
    pub fn script_list_failure(&self, kind: ResourceKind, error: ApiError) {
        self.state
            .lock()
            .list_failures
            .entry(kind)
            .or_default()
            .push_back(error);
    }

    /// Make the next create call for one kind fail.
    pub fn script_create_failure(&self, kind: ResourceKind, error: ApiError) {
        self.state
            .lock()
            .create_failures
            .entry(kind)
            .or_default()
            .push_back(error);
    }

    /// Invalidate a token; every later call under it fails authentication.
    pub fn expire_token(&self, token: &str) {
        self.state.lock().live_tokens.remove(token);
    }

    /// Mint a token the directory accepts without a login call, for
    /// seeding persisted-session scenarios.
    pub fn mint_token(&self) -> String {
        let mut state = self.state.lock();
        state.issued += 1;
        let token = format!("token-{}", state.issued);
        state.live_tokens.insert(token.clone());
        token
    }

    // ─── Inspection ──────────────────────────────────────────

    /// The (kind, branch) pairs list calls were made with, in order.
    pub fn list_calls(&self) -> Vec<(ResourceKind, BranchId)> {
        self.state.lock().list_calls.clone()
    }

    fn check_token(state: &DirectoryState, token: &str) -> Result<(), ApiError> {
        if state.live_tokens.contains(token) {
            Ok(())
        } else {
            Err(ApiError::AuthExpired)
        }
    }
}

#[async_trait]
impl DirectoryApi for ScriptedDirectory {
    async fn login(&self, credentials: &Credentials) -> Result<LoginSuccess, LoginError> {
        let mut state = self.state.lock();
        if let Some(error) = state.login_failures.pop_front() {
            return Err(error);
        }
        if credentials.password != TEST_PASSWORD {
            return Err(LoginError::InvalidCredentials);
        }
        let user = state
            .users
            .iter()
            .find(|u| u.email == credentials.email)
            .cloned()
            .ok_or(LoginError::InvalidCredentials)?;

        state.issued += 1;
        let token = format!("token-{}", state.issued);
        state.live_tokens.insert(token.clone());
        Ok(LoginSuccess { token, user })
    }

    async fn fetch_capabilities(&self, token: &str) -> Result<CapabilityBaseline, ApiError> {
        let mut state = self.state.lock();
        Self::check_token(&state, token)?;
        if let Some(error) = state.baseline_failures.pop_front() {
            return Err(error);
        }
        Ok(state.baseline.clone())
    }

    async fn list_branches(&self, token: &str) -> Result<Vec<Branch>, ApiError> {
        let mut state = self.state.lock();
        Self::check_token(&state, token)?;
        if let Some(error) = state.branch_list_failures.pop_front() {
            return Err(error);
        }
        Ok(state.branches.clone())
    }

    async fn list_records(
        &self,
        token: &str,
        kind: ResourceKind,
        branch: BranchId,
    ) -> Result<Vec<RecordPayload>, ApiError> {
        let mut state = self.state.lock();
        state.list_calls.push((kind, branch));
        Self::check_token(&state, token)?;
        if let Some(error) = state
            .list_failures
            .get_mut(&kind)
            .and_then(VecDeque::pop_front)
        {
            return Err(error);
        }
        Ok(state.records.get(&(kind, branch)).cloned().unwrap_or_default())
    }

    async fn create_record(
        &self,
        token: &str,
        kind: ResourceKind,
        branch: BranchId,
        payload: RecordPayload,
    ) -> Result<RecordPayload, ApiError> {
        let mut state = self.state.lock();
        Self::check_token(&state, token)?;
        if let Some(error) = state
            .create_failures
            .get_mut(&kind)
            .and_then(VecDeque::pop_front)
        {
            return Err(error);
        }
        state
            .records
            .entry((kind, branch))
            .or_default()
            .push(payload.clone());
        Ok(payload)
    }
}
