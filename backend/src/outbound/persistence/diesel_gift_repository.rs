//! PostgreSQL-backed `GiftRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use pagination::PageRequest;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{GiftRepository, GiftRepositoryError};
use crate::domain::{
    Gift, GiftFilter, GiftId, GiftRedemption, GiftUsage, GiftUsageWithGift, NewGift,
    RedemptionCode, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_helpers::{TransactionError, collect_rows, page_bounds};
use super::models::{GiftRow, GiftUsageRow, NewGiftRow, NewGiftUsageRow};
use super::pool::{DbPool, PoolError};
use super::schema::{gift_usages, gifts};

/// Diesel-backed implementation of the `GiftRepository` port.
#[derive(Clone)]
pub struct DieselGiftRepository {
    pool: DbPool,
}

impl DieselGiftRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> GiftRepositoryError {
    map_basic_pool_error(error, |message| GiftRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> GiftRepositoryError {
    map_basic_diesel_error(
        error,
        |message| GiftRepositoryError::query(message),
        |message| GiftRepositoryError::connection(message),
    )
}

fn row_to_gift(row: GiftRow) -> Result<Gift, GiftRepositoryError> {
    Gift::try_from(row).map_err(|message| GiftRepositoryError::query(message))
}

fn count_to_u32(count: i64) -> Result<u32, String> {
    u32::try_from(count).map_err(|_| format!("usage count {count} is out of range"))
}

async fn count_usages(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
    gift_id: i64,
) -> QueryResult<i64> {
    gift_usages::table
        .filter(gift_usages::user_id.eq(user_id))
        .filter(gift_usages::gift_id.eq(gift_id))
        .count()
        .get_result(conn)
        .await
}

#[async_trait]
impl GiftRepository for DieselGiftRepository {
    async fn list_active(
        &self,
        filter: &GiftFilter,
        page: PageRequest,
    ) -> Result<Vec<Gift>, GiftRepositoryError> {
        let (limit, offset) =
            page_bounds(page).map_err(|message| GiftRepositoryError::query(message))?;
        let mut query = gifts::table.filter(gifts::is_active.eq(true)).into_boxed();
        if let Some(prefecture) = filter.prefecture.as_deref() {
            query = query.filter(gifts::prefecture.eq(prefecture));
        }
        if let Some(city) = filter.city.as_deref() {
            query = query.filter(gifts::city.eq(city));
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<GiftRow> = query
            .select(GiftRow::as_select())
            .order_by((gifts::created_at.desc(), gifts::id.desc()))
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        collect_rows(rows, |message| GiftRepositoryError::query(message))
    }

    async fn all_active(&self) -> Result<Vec<Gift>, GiftRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<GiftRow> = gifts::table
            .filter(gifts::is_active.eq(true))
            .select(GiftRow::as_select())
            .order_by(gifts::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows, |message| GiftRepositoryError::query(message))
    }

    async fn find_by_id(&self, id: GiftId) -> Result<Option<Gift>, GiftRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        gifts::table
            .filter(gifts::id.eq(id.get()))
            .select(GiftRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_gift)
            .transpose()
    }

    async fn insert(&self, gift: &NewGift) -> Result<Gift, GiftRepositoryError> {
        let row =
            NewGiftRow::try_from(gift).map_err(|message| GiftRepositoryError::query(message))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored: GiftRow = diesel::insert_into(gifts::table)
            .values(row)
            .returning(GiftRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_gift(stored)
    }

    async fn usage_count(
        &self,
        user_id: &UserId,
        gift_id: GiftId,
    ) -> Result<u32, GiftRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count = count_usages(&mut conn, *user_id.as_uuid(), gift_id.get())
            .await
            .map_err(map_diesel_error)?;
        count_to_u32(count).map_err(|message| GiftRepositoryError::query(message))
    }

    async fn redeem(&self, redemption: &GiftRedemption) -> Result<GiftUsage, GiftRepositoryError> {
        let user_id = *redemption.user_id.as_uuid();
        let gift_id = redemption.gift_id.get();
        let qr_code = redemption.qr_code.as_ref();
        let used_at = redemption.used_at;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: GiftUsageRow = conn
            .transaction::<_, TransactionError<GiftRepositoryError>, _>(|conn| {
                async move {
                    // The row lock serialises concurrent redemptions of one gift.
                    let limit: Option<i32> = gifts::table
                        .filter(gifts::id.eq(gift_id))
                        .select(gifts::usage_limit)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let limit = limit.ok_or(TransactionError::Rejected(
                        GiftRepositoryError::gift_not_found(),
                    ))?;

                    let used = count_usages(conn, user_id, gift_id).await?;
                    if used >= i64::from(limit) {
                        debug!(gift_id, used, limit, "gift usage limit reached");
                        return Err(TransactionError::Rejected(
                            GiftRepositoryError::usage_limit_reached(
                                u32::try_from(limit).unwrap_or_default(),
                                u32::try_from(used).unwrap_or(u32::MAX),
                            ),
                        ));
                    }

                    let row = diesel::insert_into(gift_usages::table)
                        .values(NewGiftUsageRow {
                            user_id,
                            gift_id,
                            qr_code,
                            used_at,
                        })
                        .returning(GiftUsageRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| err.into_port_error(map_diesel_error))?;

        GiftUsage::try_from(row).map_err(|message| GiftRepositoryError::query(message))
    }

    async fn find_usage_by_code(
        &self,
        code: &RedemptionCode,
    ) -> Result<Option<GiftUsageWithGift>, GiftRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found: Option<(GiftUsageRow, GiftRow)> = gift_usages::table
            .inner_join(gifts::table)
            .filter(gift_usages::qr_code.eq(code.as_ref()))
            .select((GiftUsageRow::as_select(), GiftRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        found
            .map(|(usage, gift)| {
                Ok(GiftUsageWithGift {
                    usage: GiftUsage::try_from(usage)
                        .map_err(|message| GiftRepositoryError::query(message))?,
                    gift: row_to_gift(gift)?,
                })
            })
            .transpose()
    }
}
