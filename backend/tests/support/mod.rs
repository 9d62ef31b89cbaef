//! Embedded PostgreSQL helpers shared by the integration suites.
//!
//! Each test gets its own migrated database on a shared cluster. Set
//! `SKIP_TEST_CLUSTER=1` where the cluster cannot start; the suites then
//! return early instead of failing.

use localconnect::outbound::persistence::run_pending_migrations;
use pg_embedded_setup_unpriv::TemporaryDatabase;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;

/// True when `SKIP_TEST_CLUSTER` is `1`, `true` or `yes`.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip marker when skipping is allowed, panic otherwise so CI breakage is
/// not masked.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Fresh database with every migration applied.
///
/// Must be called outside a Tokio runtime; cluster bootstrap blocks.
pub fn provision_database() -> Option<TemporaryDatabase> {
    let cluster = match shared_cluster_handle() {
        Ok(cluster) => cluster,
        Err(err) => return handle_cluster_setup_failure(format!("{err:?}")),
    };
    let database = match cluster.create_temporary_database() {
        Ok(database) => database,
        Err(err) => return handle_cluster_setup_failure(format!("{err:?}")),
    };
    if let Err(err) = run_pending_migrations(database.url()) {
        return handle_cluster_setup_failure(err);
    }
    Some(database)
}
