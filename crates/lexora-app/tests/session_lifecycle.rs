//! Session Lifecycle Integration Tests
//!
//! Login, restore, and logout against scripted backend doubles: what gets
//! persisted, which phase the engine lands in per role, and how the stored
//! branch selection is revalidated against the freshly loaded user.

use assert_matches::assert_matches;
use lexora_app::{AppCore, AppError, SessionPhase};
use lexora_core::effects::{LoginError, PersistedSession, StoreError};
use lexora_core::ApiError;
use lexora_testkit::*;
use std::sync::Arc;

fn engine(directory: &ScriptedDirectory, store: &MemoryStore) -> AppCore {
    init_tracing();
    AppCore::new(Arc::new(directory.clone()), Arc::new(store.clone()))
}

#[tokio::test]
async fn test_super_admin_login_awaits_branch_selection() {
    let directory = ScriptedDirectory::new();
    let store = MemoryStore::new();
    let admin = directory.register_super_admin("root@lexora.example");
    directory.add_branch(branch("Vilnius"));
    directory.set_baseline(full_baseline());

    let mut core = engine(&directory, &store);
    let snapshot = core
        .login(credentials("root@lexora.example"))
        .await
        .expect("login succeeds");

    assert_eq!(snapshot.phase, SessionPhase::AwaitingBranch);
    assert_eq!(snapshot.active_branch, None);
    assert_eq!(snapshot.user.as_ref().map(|u| u.id), Some(admin.id));
    assert_eq!(snapshot.branches.len(), 1);

    // Token and user are persisted even before a branch is chosen.
    let persisted = store.persisted().expect("session persisted");
    assert_eq!(persisted.user.id, admin.id);
    assert_eq!(persisted.active_branch, None);
}

#[tokio::test]
async fn test_branch_admin_lands_scoped_to_home_branch() {
    let directory = ScriptedDirectory::new();
    let store = MemoryStore::new();
    let office = branch("Kaunas");
    let admin = branch_admin("kaunas@lexora.example", office.id);
    directory.register(admin.clone());
    directory.add_branch(office.clone());

    let mut core = engine(&directory, &store);
    let snapshot = core
        .login(credentials("kaunas@lexora.example"))
        .await
        .expect("login succeeds");

    assert_eq!(snapshot.phase, SessionPhase::BranchScoped);
    assert_eq!(snapshot.active_branch, Some(office.id));
}

#[tokio::test]
async fn test_stale_stored_selection_yields_to_home_branch() {
    // A branch-admin of X previously ran the app as someone who had
    // selected Y. The stored Y must be discarded, not half-applied.
    let directory = ScriptedDirectory::new();
    let branch_x = branch("X");
    let branch_y = branch("Y");
    let admin = branch_admin("x@lexora.example", branch_x.id);
    directory.register(admin.clone());
    directory.add_branch(branch_x.clone());
    directory.add_branch(branch_y.clone());

    let store = MemoryStore::with_session(PersistedSession {
        token: "stale-token".into(),
        user: admin.clone(),
        active_branch: Some(branch_y.id),
    });

    let mut core = engine(&directory, &store);
    let snapshot = core
        .login(credentials("x@lexora.example"))
        .await
        .expect("login succeeds");

    assert_eq!(snapshot.active_branch, Some(branch_x.id));
    assert_eq!(
        store.persisted().expect("persisted").active_branch,
        Some(branch_x.id)
    );
}

#[tokio::test]
async fn test_stored_selection_survives_for_roaming_admin() {
    let directory = ScriptedDirectory::new();
    let office = branch("Vilnius");
    let admin = directory.register_super_admin("root@lexora.example");
    directory.add_branch(office.clone());

    let store = MemoryStore::with_session(PersistedSession {
        token: "old-token".into(),
        user: admin,
        active_branch: Some(office.id),
    });

    let mut core = engine(&directory, &store);
    let snapshot = core
        .login(credentials("root@lexora.example"))
        .await
        .expect("login succeeds");

    // Still listed, still permitted: the selection carries over.
    assert_eq!(snapshot.phase, SessionPhase::BranchScoped);
    assert_eq!(snapshot.active_branch, Some(office.id));
}

#[tokio::test]
async fn test_stored_selection_of_deleted_branch_is_discarded() {
    let directory = ScriptedDirectory::new();
    let survivor = branch("Vilnius");
    let deleted = branch("Closed Office");
    let admin = directory.register_super_admin("root@lexora.example");
    directory.add_branch(survivor);

    let store = MemoryStore::with_session(PersistedSession {
        token: "old-token".into(),
        user: admin,
        active_branch: Some(deleted.id),
    });

    let mut core = engine(&directory, &store);
    let snapshot = core
        .login(credentials("root@lexora.example"))
        .await
        .expect("login succeeds");

    assert_eq!(snapshot.phase, SessionPhase::AwaitingBranch);
    assert_eq!(snapshot.active_branch, None);
}

#[tokio::test]
async fn test_failed_login_persists_nothing() {
    let directory = ScriptedDirectory::new();
    let store = MemoryStore::new();
    directory.register_super_admin("root@lexora.example");

    let mut core = engine(&directory, &store);
    let error = core
        .login(Credentials::new("root@lexora.example", "wrong"))
        .await
        .expect_err("bad password fails");

    assert_matches!(error, AppError::Login(LoginError::InvalidCredentials));
    assert_eq!(core.phase(), SessionPhase::Anonymous);
    assert_eq!(store.persisted(), None);
}

#[tokio::test]
async fn test_locked_account_is_reported_distinctly() {
    let directory = ScriptedDirectory::new();
    let store = MemoryStore::new();
    directory.register_super_admin("root@lexora.example");
    directory.script_login_failure(LoginError::AccountLocked);

    let mut core = engine(&directory, &store);
    let error = core
        .login(credentials("root@lexora.example"))
        .await
        .expect_err("locked account fails");

    assert_matches!(error, AppError::Login(LoginError::AccountLocked));
    assert_eq!(core.phase(), SessionPhase::Anonymous);
}

#[tokio::test]
async fn test_branch_list_failure_discards_stored_selection() {
    let directory = ScriptedDirectory::new();
    let office = branch("Vilnius");
    let admin = directory.register_super_admin("root@lexora.example");
    directory.add_branch(office.clone());
    directory.script_branch_list_failure(ApiError::server_fault("directory down"));

    let store = MemoryStore::with_session(PersistedSession {
        token: "old-token".into(),
        user: admin,
        active_branch: Some(office.id),
    });

    let mut core = engine(&directory, &store);
    let snapshot = core
        .login(credentials("root@lexora.example"))
        .await
        .expect("login tolerates a missing branch list");

    // Without a list to validate against, the selection cannot be trusted.
    assert_eq!(snapshot.phase, SessionPhase::AwaitingBranch);
    assert_eq!(snapshot.active_branch, None);
}

#[tokio::test]
async fn test_failed_session_write_rolls_back_to_anonymous() {
    let directory = ScriptedDirectory::new();
    let store = MemoryStore::new();
    directory.register_super_admin("root@lexora.example");
    store.fail_next_write(StoreError::backend("disk full"));

    let mut core = engine(&directory, &store);
    let error = core
        .login(credentials("root@lexora.example"))
        .await
        .expect_err("login fails when nothing can be persisted");

    assert_matches!(error, AppError::Store(StoreError::Backend { .. }));
    assert_eq!(core.phase(), SessionPhase::Anonymous);
    assert_eq!(store.persisted(), None);
}

#[tokio::test]
async fn test_baseline_failure_degrades_to_deny_without_killing_session() {
    let directory = ScriptedDirectory::new();
    let store = MemoryStore::new();
    let office = branch("Kaunas");
    directory.register(lawyer_with(
        "ada@lexora.example",
        office.id,
        Default::default(),
        true,
    ));
    directory.add_branch(office);
    directory.set_baseline(full_baseline());
    directory.script_baseline_failure(ApiError::server_fault("capability endpoint down"));

    let mut core = engine(&directory, &store);
    let snapshot = core
        .login(credentials("ada@lexora.example"))
        .await
        .expect("login survives baseline failure");

    // Session is live, every explicit flag is denied.
    assert_eq!(snapshot.phase, SessionPhase::BranchScoped);
    assert!(!snapshot.capabilities.can_access_financial_data);
    assert!(!snapshot.capabilities.can_manage_users);
}

#[tokio::test]
async fn test_unreadable_stored_selection_does_not_block_login() {
    let directory = ScriptedDirectory::new();
    let store = MemoryStore::new();
    let office = branch("Kaunas");
    directory.register(branch_admin("kaunas@lexora.example", office.id));
    directory.add_branch(office.clone());
    store.fail_next_read(StoreError::corrupt("bad json"));

    let mut core = engine(&directory, &store);
    let snapshot = core
        .login(credentials("kaunas@lexora.example"))
        .await
        .expect("login ignores the corrupt selection");

    assert_eq!(snapshot.active_branch, Some(office.id));
}

#[tokio::test]
async fn test_restore_rebuilds_branch_scoped_session() {
    let directory = ScriptedDirectory::new();
    let office = branch("Kaunas");
    let admin = branch_admin("kaunas@lexora.example", office.id);
    directory.register(admin.clone());
    directory.add_branch(office.clone());
    directory.set_baseline(full_baseline());

    let store = MemoryStore::with_session(PersistedSession {
        token: directory.mint_token(),
        user: admin,
        active_branch: Some(office.id),
    });

    let mut core = engine(&directory, &store);
    assert!(core.restore().await.expect("restore succeeds"));
    assert_eq!(core.phase(), SessionPhase::BranchScoped);
    assert!(core.snapshot().capabilities.can_access_financial_data);
}

#[tokio::test]
async fn test_restore_with_dead_token_falls_back_to_anonymous() {
    let directory = ScriptedDirectory::new();
    let office = branch("Kaunas");
    let admin = branch_admin("kaunas@lexora.example", office.id);
    directory.add_branch(office.clone());

    // Token never minted by the directory, so the first call 401s.
    let store = MemoryStore::with_session(PersistedSession {
        token: "revoked".into(),
        user: admin,
        active_branch: Some(office.id),
    });

    let mut core = engine(&directory, &store);
    assert!(!core.restore().await.expect("restore reports no session"));
    assert_eq!(core.phase(), SessionPhase::Anonymous);
    assert_eq!(store.persisted(), None);
}

#[tokio::test]
async fn test_restore_with_empty_store_is_a_no_op() {
    let directory = ScriptedDirectory::new();
    let store = MemoryStore::new();

    let mut core = engine(&directory, &store);
    assert!(!core.restore().await.expect("nothing to restore"));
    assert_eq!(core.phase(), SessionPhase::Anonymous);
}

#[tokio::test]
async fn test_logout_resets_everything_at_once() {
    let directory = ScriptedDirectory::new();
    let store = MemoryStore::new();
    let office = branch("Kaunas");
    directory.register(branch_admin("kaunas@lexora.example", office.id));
    directory.add_branch(office.clone());
    directory.set_baseline(full_baseline());
    directory.seed_records(ResourceKind::Clients, office.id, records("client", 3));

    let mut core = engine(&directory, &store);
    core.login(credentials("kaunas@lexora.example"))
        .await
        .expect("login succeeds");
    core.refresh_all().await;
    assert_eq!(core.records(ResourceKind::Clients).len(), 3);

    core.logout().await.expect("logout succeeds");

    let snapshot = core.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Anonymous);
    assert_eq!(snapshot.user, None);
    assert_eq!(snapshot.active_branch, None);
    assert!(snapshot.branches.is_empty());
    assert!(snapshot.navigation.is_empty());
    assert!(!snapshot.capabilities.can_access_financial_data);
    assert!(core.records(ResourceKind::Clients).is_empty());
    assert_eq!(store.persisted(), None);
}
