//! The engine facade
//!
//! [`AppCore`] composes the session manager, the permission resolver, and
//! the gated fetcher behind one surface. Control flows strictly
//! downstream: identity feeds the branch context, the branch feeds the
//! resolver, the resolver feeds the fetcher and the navigation; any
//! upstream change invalidates everything below it via the generation
//! barrier.
//!
//! The engine is single-threaded and runtime-agnostic: callers own the
//! executor and drive `&mut self` methods one at a time. Concurrency
//! lives only in the network fan-out, where results re-enter through
//! [`AppCore::complete_fetch`] and its tag-and-compare guard.

use crate::access::{compose_navigation, AccessEvent, AccessMode, PermissionResolver};
use crate::core::snapshot::{SessionPhase, StateSnapshot};
use crate::errors::{AppError, Notice};
use crate::fetch::{CollectionCache, FetchResolution, FetchTicket};
use crate::session::{resolve_active_branch, SessionManager};
use futures::future;
use lexora_core::effects::{DirectoryApi, RecordPayload, SessionStore};
use lexora_core::{ApiError, Branch, BranchId, Credentials, LoginSuccess, ResourceKind};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The headless engine.
pub struct AppCore {
    api: Arc<dyn DirectoryApi>,
    session: SessionManager,
    resolver: PermissionResolver,
    cache: CollectionCache,
    branches: Vec<Branch>,
    authenticating: bool,
}

impl AppCore {
    /// Create an anonymous engine over the two effect seams.
    pub fn new(api: Arc<dyn DirectoryApi>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            session: SessionManager::new(store),
            resolver: PermissionResolver::new(),
            cache: CollectionCache::new(),
            branches: Vec::new(),
            authenticating: false,
        }
    }

    // ─── Read surface ────────────────────────────────────────

    /// Current session state machine position.
    pub fn phase(&self) -> SessionPhase {
        if self.authenticating {
            return SessionPhase::Authenticating;
        }
        if !self.session.is_authenticated() {
            return SessionPhase::Anonymous;
        }
        if self.session.active_branch().is_none() {
            return SessionPhase::AwaitingBranch;
        }
        SessionPhase::BranchScoped
    }

    /// Capture an immutable snapshot for rendering.
    pub fn snapshot(&self) -> StateSnapshot {
        let user = self.session.user().cloned();
        let navigation = user
            .as_ref()
            .map(|u| compose_navigation(&u.role, self.resolver.snapshot()))
            .unwrap_or_default();

        StateSnapshot {
            phase: self.phase(),
            user,
            active_branch: self.session.active_branch(),
            branches: self.branches.clone(),
            capabilities: self.resolver.snapshot().clone(),
            navigation,
            record_counts: self.cache.counts(),
        }
    }

    /// The cached records of one kind.
    pub fn records(&self, kind: ResourceKind) -> &[RecordPayload] {
        self.cache.records(kind)
    }

    // ─── Session lifecycle ───────────────────────────────────

    /// Authenticate and build the session context.
    ///
    /// On success the token, user snapshot, and resolved active branch are
    /// persisted together, the capability baseline is adopted (or denied
    /// by default if the endpoint fails), and the snapshot is returned.
    /// On failure nothing is persisted and the engine stays anonymous.
    ///
    /// The caller triggers [`AppCore::refresh_all`] afterwards; login
    /// itself issues no collection fetches.
    pub async fn login(&mut self, credentials: Credentials) -> Result<StateSnapshot, AppError> {
        if self.session.is_authenticated() {
            self.logout().await?;
        }

        // The selection a previous session may have left behind; it is
        // revalidated against the freshly loaded user below.
        let stored = match self.session.stored_selection().await {
            Ok(stored) => stored,
            Err(error) => {
                warn!(%error, "persisted branch selection unreadable, ignoring");
                None
            }
        };

        self.authenticating = true;
        let attempted = self.api.login(&credentials).await;
        let login = match attempted {
            Ok(login) => login,
            Err(error) => {
                self.authenticating = false;
                return Err(error.into());
            }
        };

        let result = self.build_session(login, stored).await;
        self.authenticating = false;
        result
    }

    /// Rebuild a session from persisted state on startup.
    ///
    /// Returns `false` when there is nothing to restore or the persisted
    /// token is no longer accepted.
    pub async fn restore(&mut self) -> Result<bool, AppError> {
        let Some(persisted) = self.session.persisted().await? else {
            return Ok(false);
        };

        self.authenticating = true;
        let result = self
            .build_session(
                LoginSuccess {
                    token: persisted.token,
                    user: persisted.user,
                },
                persisted.active_branch,
            )
            .await;
        self.authenticating = false;

        match result {
            Ok(_) => Ok(true),
            Err(AppError::Api(ApiError::AuthExpired)) => Ok(false),
            Err(error) => Err(error),
        }
    }

    /// Shared tail of login and restore: adopt identity, fetch the branch
    /// list and capability baseline, resolve the active branch, persist.
    async fn build_session(
        &mut self,
        login: LoginSuccess,
        stored: Option<BranchId>,
    ) -> Result<StateSnapshot, AppError> {
        self.resolver.apply(AccessEvent::LoggedIn {
            role: login.user.role.clone(),
        });

        // Branch list first: it validates the stored selection. An expired
        // token here ends the attempt; any other failure degrades to an
        // empty list, which discards the stored selection for roaming
        // users and changes nothing for branch-locked ones.
        let listed = self.api.list_branches(&login.token).await;
        self.branches = match listed {
            Ok(branches) => branches,
            Err(ApiError::AuthExpired) => {
                self.abort_session_build().await;
                return Err(ApiError::AuthExpired.into());
            }
            Err(error) => {
                warn!(%error, "branch list unavailable at login");
                Vec::new()
            }
        };

        let fetched = self.api.fetch_capabilities(&login.token).await;
        match fetched {
            Ok(baseline) => {
                self.resolver.apply(AccessEvent::BaselineFetched { baseline });
            }
            Err(ApiError::AuthExpired) => {
                self.abort_session_build().await;
                return Err(ApiError::AuthExpired.into());
            }
            Err(error) => {
                warn!(%error, "capability baseline unavailable, deny-by-default");
                self.resolver.apply(AccessEvent::BaselineUnavailable);
            }
        }

        let active = resolve_active_branch(&login.user, stored, &self.branches);

        if let Err(error) = self.session.establish(login, active).await {
            self.abort_session_build().await;
            return Err(error.into());
        }
        self.resolver.apply(AccessEvent::BranchChanged { branch: active });

        Ok(self.snapshot())
    }

    /// Roll the engine back to anonymous after a failed session build.
    async fn abort_session_build(&mut self) {
        self.resolver.apply(AccessEvent::LoggedOut);
        self.branches.clear();
        self.cache.clear();
        if let Err(error) = self.session.clear().await {
            warn!(%error, "session store clear failed during aborted login");
        }
    }

    /// End the session: one atomic reset of token, user, active branch,
    /// capability snapshot, and caches. No partial state survives into
    /// the next anonymous session.
    pub async fn logout(&mut self) -> Result<(), AppError> {
        self.resolver.apply(AccessEvent::LoggedOut);
        self.cache.clear();
        self.branches.clear();
        self.session.clear().await?;
        Ok(())
    }

    /// The single forced-logout path for authentication expiry, no matter
    /// which call observed it.
    async fn force_logout(&mut self) -> Notice {
        info!("authentication expired, forcing logout");
        if let Err(error) = self.logout().await {
            warn!(%error, "session store clear failed during forced logout");
        }
        Notice::for_api_error(&ApiError::AuthExpired, ResourceKind::Clients)
    }

    // ─── Branch context ──────────────────────────────────────

    /// Select the active branch (super-admin only) and refetch every
    /// branch-scoped collection under it.
    ///
    /// The switch is a hard invalidation barrier: the generation bump
    /// strands every in-flight ticket, and the cache is dropped before
    /// the refetch so nothing from the previous branch stays visible.
    pub async fn select_branch(
        &mut self,
        branch: BranchId,
    ) -> Result<Vec<FetchResolution>, AppError> {
        let user = self.session.user().ok_or(AppError::NotAuthenticated)?;
        if !user.role.may_select_branch() {
            return Err(AppError::BranchLocked);
        }
        if !self.branches.iter().any(|b| b.id == branch) {
            return Err(AppError::UnknownBranch);
        }

        self.session.set_active_branch(Some(branch)).await?;
        self.cache.clear();
        self.resolver.apply(AccessEvent::BranchChanged {
            branch: Some(branch),
        });

        Ok(self.refresh_all().await)
    }

    // ─── Gated fetching ──────────────────────────────────────

    /// Open a fetch for one collection, failing fast client-side when
    /// there is no session or no active branch, before any network call.
    pub fn begin_fetch(&self, kind: ResourceKind) -> Result<FetchTicket, AppError> {
        if !self.session.is_authenticated() {
            return Err(AppError::NotAuthenticated);
        }
        let branch = self.session.active_branch().ok_or(AppError::NoActiveBranch)?;
        Ok(FetchTicket {
            kind,
            branch,
            generation: self.session.generation(),
        })
    }

    /// Apply a fetch result through the stale guard and the error policy.
    ///
    /// The capability snapshot consulted here is the one current at
    /// consumption time, not dispatch time, so a response that raced a
    /// downgrade or a branch switch can never smuggle data in.
    pub async fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<RecordPayload>, ApiError>,
    ) -> FetchResolution {
        if ticket.generation != self.session.generation()
            || Some(ticket.branch) != self.session.active_branch()
        {
            debug!(kind = %ticket.kind, ?ticket.branch, "dropping stale fetch result");
            return FetchResolution::Stale { kind: ticket.kind };
        }

        match result {
            Ok(records) => {
                self.resolver.apply(AccessEvent::ResourceAllowed {
                    kind: ticket.kind,
                    mode: AccessMode::Read,
                });
                let count = records.len();
                self.cache.apply(ticket.kind, records);
                FetchResolution::Applied {
                    kind: ticket.kind,
                    count,
                }
            }
            Err(ApiError::AuthExpired) => {
                let notice = self.force_logout().await;
                FetchResolution::SessionExpired { notice }
            }
            Err(error @ ApiError::AuthorizationDenied { .. }) => {
                self.apply_denial(ticket.kind, AccessMode::Read);
                FetchResolution::Downgraded {
                    kind: ticket.kind,
                    notice: Notice::for_api_error(&error, ticket.kind),
                }
            }
            Err(error) => {
                // Prior state kept; failure isolated to this kind.
                FetchResolution::Failed {
                    kind: ticket.kind,
                    notice: Notice::for_api_error(&error, ticket.kind),
                }
            }
        }
    }

    /// Fetch one collection end to end.
    pub async fn fetch_records(&mut self, kind: ResourceKind) -> Result<FetchResolution, AppError> {
        let ticket = self.begin_fetch(kind)?;
        let token = self
            .session
            .token()
            .ok_or(AppError::NotAuthenticated)?
            .to_string();
        let result = self
            .api
            .list_records(&token, ticket.kind, ticket.branch)
            .await;
        Ok(self.complete_fetch(ticket, result).await)
    }

    /// Fan out a parallel fetch of every branch-scoped collection and
    /// apply the results as they are gathered.
    ///
    /// Requests run concurrently; application is sequential through the
    /// stale guard, so a forced logout triggered by one result strands
    /// the rest as stale instead of resurrecting the session.
    pub async fn refresh_all(&mut self) -> Vec<FetchResolution> {
        let Some(token) = self.session.token().map(str::to_string) else {
            return Vec::new();
        };
        let tickets: Vec<FetchTicket> = ResourceKind::ALL
            .iter()
            .filter_map(|kind| self.begin_fetch(*kind).ok())
            .collect();

        let api = Arc::clone(&self.api);
        let outcomes = future::join_all(tickets.into_iter().map(|ticket| {
            let api = Arc::clone(&api);
            let token = token.clone();
            async move {
                let result = api.list_records(&token, ticket.kind, ticket.branch).await;
                (ticket, result)
            }
        }))
        .await;

        let mut resolutions = Vec::with_capacity(outcomes.len());
        for (ticket, result) in outcomes {
            resolutions.push(self.complete_fetch(ticket, result).await);
        }
        resolutions
    }

    // ─── Gated mutation ──────────────────────────────────────

    /// Create a record under the active branch.
    ///
    /// Fails fast client-side with [`AppError::NoActiveBranch`] before
    /// any network call when no branch is active. Backend outcomes feed
    /// the resolver exactly like reads: a denial downgrades the matching
    /// capability, a success confirms it.
    pub async fn create_record(
        &mut self,
        kind: ResourceKind,
        payload: RecordPayload,
    ) -> Result<RecordPayload, AppError> {
        if !self.session.is_authenticated() {
            return Err(AppError::NotAuthenticated);
        }
        let branch = self.session.active_branch().ok_or(AppError::NoActiveBranch)?;
        let token = self
            .session
            .token()
            .ok_or(AppError::NotAuthenticated)?
            .to_string();

        let created = self.api.create_record(&token, kind, branch, payload).await;
        match created {
            Ok(record) => {
                self.resolver.apply(AccessEvent::ResourceAllowed {
                    kind,
                    mode: AccessMode::Create,
                });
                self.cache.push(kind, record.clone());
                Ok(record)
            }
            Err(ApiError::AuthExpired) => {
                self.force_logout().await;
                Err(ApiError::AuthExpired.into())
            }
            Err(error @ ApiError::AuthorizationDenied { .. }) => {
                self.apply_denial(kind, AccessMode::Create);
                Err(error.into())
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Route a denial into the resolver and purge what the downgrade
    /// invalidates: the denied kind's cache, plus every financial
    /// collection when the financial flag was the one revoked.
    fn apply_denial(&mut self, kind: ResourceKind, mode: AccessMode) {
        let before = self.resolver.snapshot().can_access_financial_data;
        self.resolver.apply(AccessEvent::ResourceDenied { kind, mode });
        self.cache.remove(kind);
        if before && !self.resolver.snapshot().can_access_financial_data {
            self.cache.purge_financial();
        }
    }
}

impl std::fmt::Debug for AppCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppCore")
            .field("phase", &self.phase())
            .field("session", &self.session)
            .finish()
    }
}
