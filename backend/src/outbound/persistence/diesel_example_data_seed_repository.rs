//! Demo resident seeding against PostgreSQL.
//!
//! The run marker, accounts and profiles are written in one transaction. A
//! resident whose external id already exists keeps its stored account id and
//! the generated profile is attached to that id instead.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{
    ExampleDataSeedRepository, ExampleDataSeedRepositoryError, ExampleDataSeedRequest,
    ExampleResident, SeedingResult,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewExampleDataRunRow, NewUserRow, UserProfileRecord};
use super::pool::{DbPool, PoolError};
use super::schema::{example_data_runs, user_profiles, users};

#[derive(Clone)]
pub struct DieselExampleDataSeedRepository {
    pool: DbPool,
}

impl DieselExampleDataSeedRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ExampleDataSeedRepositoryError {
    map_basic_pool_error(error, |message| {
        ExampleDataSeedRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> ExampleDataSeedRepositoryError {
    map_basic_diesel_error(
        error,
        |message| ExampleDataSeedRepositoryError::query(message),
        |message| ExampleDataSeedRepositoryError::connection(message),
    )
}

/// `true` when this seed key had not been recorded before.
async fn claim_run(
    conn: &mut AsyncPgConnection,
    run: &NewExampleDataRunRow<'_>,
) -> QueryResult<bool> {
    let inserted = diesel::insert_into(example_data_runs::table)
        .values(run)
        .on_conflict(example_data_runs::seed_key)
        .do_nothing()
        .execute(conn)
        .await?;
    Ok(inserted == 1)
}

/// Upsert accounts by external id, returning the id each one is stored under.
async fn upsert_accounts(
    conn: &mut AsyncPgConnection,
    residents: &[ExampleResident],
) -> QueryResult<HashMap<String, Uuid>> {
    let rows: Vec<NewUserRow<'_>> = residents
        .iter()
        .map(|resident| NewUserRow::from_user(&resident.user))
        .collect();
    let stored: Vec<(String, Uuid)> = diesel::insert_into(users::table)
        .values(&rows)
        .on_conflict(users::external_id)
        .do_update()
        .set((
            users::name.eq(excluded(users::name)),
            users::email.eq(excluded(users::email)),
        ))
        .returning((users::external_id, users::id))
        .get_results(conn)
        .await?;
    Ok(stored.into_iter().collect())
}

/// Profiles keyed by the stored account id; residents whose account did not
/// come back from the upsert are skipped.
fn profile_rows<'a>(
    residents: &'a [ExampleResident],
    stored_ids: &HashMap<String, Uuid>,
) -> Vec<UserProfileRecord<'a>> {
    residents
        .iter()
        .filter_map(|resident| {
            let user_id = stored_ids.get(resident.user.external_id.as_ref())?;
            Some(UserProfileRecord {
                user_id: *user_id,
                ..UserProfileRecord::from(&resident.profile)
            })
        })
        .collect()
}

#[async_trait]
impl ExampleDataSeedRepository for DieselExampleDataSeedRepository {
    async fn seed_example_data(
        &self,
        request: ExampleDataSeedRequest,
    ) -> Result<SeedingResult, ExampleDataSeedRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let run = NewExampleDataRunRow {
            seed_key: request.seed_key.as_str(),
            resident_count: request.resident_count,
            seed: request.seed,
        };
        let residents = request.residents.as_slice();

        conn.transaction(|conn| {
            async move {
                if !claim_run(conn, &run).await? {
                    return Ok(SeedingResult::AlreadySeeded);
                }
                if residents.is_empty() {
                    return Ok(SeedingResult::Applied);
                }

                let stored_ids = upsert_accounts(conn, residents).await?;
                diesel::insert_into(user_profiles::table)
                    .values(&profile_rows(residents, &stored_ids))
                    .on_conflict(user_profiles::user_id)
                    .do_nothing()
                    .execute(conn)
                    .await?;
                Ok(SeedingResult::Applied)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
