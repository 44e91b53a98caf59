//! PostgreSQL-backed marketplace store using Diesel.
//!
//! The hire transition locks the gig row with `FOR UPDATE` inside a
//! transaction, so concurrent hires on the same gig serialise at the
//! database: the loser re-reads the updated state and reports a clean
//! non-committed outcome.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{
    BidPlacement, HireCommit, HireCommitOutcome, MarketplaceStore, PasswordHash, StoreError,
    UserInsert,
};
use crate::domain::{Bid, BidId, EmailAddress, Gig, GigId, User, UserId};

use super::models::{
    BID_STATUS_HIRED, BID_STATUS_PENDING, BID_STATUS_REJECTED, BidRow, GIG_STATUS_ASSIGNED,
    GIG_STATUS_OPEN, GigRow, NewBidRow, NewGigRow, NewUserRow, RowDecodeError, UserRow,
    encode_bid_status, encode_gig_status,
};
use super::pool::{DbPool, PoolError};
use super::schema::{bids, gigs, users};

/// Diesel-backed implementation of the marketplace store port.
#[derive(Clone)]
pub struct DieselMarketplaceStore {
    pool: DbPool,
}

impl DieselMarketplaceStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> StoreError {
    match error {
        // Checkout waits up to the configured timeout, so failure here means
        // the outcome is retryable rather than a broken configuration.
        PoolError::Checkout { message } => StoreError::timeout(message),
        PoolError::Build { message } => StoreError::connection(message),
    }
}

fn map_diesel_error(error: diesel::result::Error) -> StoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            StoreError::connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => StoreError::query(info.message().to_owned()),
        other => StoreError::query(other.to_string()),
    }
}

fn map_decode_error(error: RowDecodeError) -> StoreError {
    StoreError::query(error.to_string())
}

#[async_trait]
impl MarketplaceStore for DieselMarketplaceStore {
    async fn user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| row.into_user().map_err(map_decode_error))
            .transpose()
    }

    async fn user_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<(User, PasswordHash)>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| {
            let hash = PasswordHash::new(row.password_hash.clone());
            row.into_user().map(|user| (user, hash)).map_err(map_decode_error)
        })
        .transpose()
    }

    async fn insert_user(
        &self,
        user: User,
        credential: PasswordHash,
    ) -> Result<UserInsert, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            id: *user.id().as_uuid(),
            display_name: user.name().as_ref(),
            email: user.email().as_ref(),
            password_hash: credential.as_str(),
        };

        // The unique index on email turns the duplicate insert into zero
        // affected rows instead of an error.
        let inserted = diesel::insert_into(users::table)
            .values(&new_row)
            .on_conflict(users::email)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(if inserted == 0 {
            UserInsert::EmailTaken
        } else {
            UserInsert::Inserted
        })
    }

    async fn gig(&self, id: GigId) -> Result<Option<Gig>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = gigs::table
            .find(id.as_uuid())
            .select(GigRow::as_select())
            .first::<GigRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| row.into_gig().map_err(map_decode_error))
            .transpose()
    }

    async fn open_gigs(&self) -> Result<Vec<Gig>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<GigRow> = gigs::table
            .filter(gigs::status.eq(GIG_STATUS_OPEN))
            .select(GigRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| row.into_gig().map_err(map_decode_error))
            .collect()
    }

    async fn insert_gig(&self, gig: Gig) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewGigRow {
            id: *gig.id().as_uuid(),
            title: gig.title(),
            description: gig.description(),
            budget: gig.budget().amount(),
            owner_id: *gig.owner_id().as_uuid(),
            status: encode_gig_status(gig.status()),
        };

        diesel::insert_into(gigs::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn bid(&self, id: BidId) -> Result<Option<Bid>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = bids::table
            .find(id.as_uuid())
            .select(BidRow::as_select())
            .first::<BidRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| row.into_bid().map_err(map_decode_error))
            .transpose()
    }

    async fn bids_for_gig(&self, gig_id: GigId) -> Result<Vec<Bid>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BidRow> = bids::table
            .filter(bids::gig_id.eq(gig_id.as_uuid()))
            .select(BidRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| row.into_bid().map_err(map_decode_error))
            .collect()
    }

    async fn insert_bid(&self, bid: Bid) -> Result<BidPlacement, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let gig_id = *bid.gig_id().as_uuid();

        // Lock the gig row so a hire committing concurrently cannot close
        // the gig between the openness check and the insert.
        let placement = conn
            .transaction(|conn| {
                async move {
                    let gig_status: Option<String> = gigs::table
                        .find(gig_id)
                        .for_update()
                        .select(gigs::status)
                        .first(conn)
                        .await
                        .optional()?;

                    match gig_status.as_deref() {
                        None => Ok(BidPlacement::GigMissing),
                        Some(status) if status != GIG_STATUS_OPEN => Ok(BidPlacement::GigClosed),
                        Some(_) => {
                            let new_row = NewBidRow {
                                id: *bid.id().as_uuid(),
                                gig_id,
                                freelancer_id: *bid.freelancer_id().as_uuid(),
                                freelancer_name: bid.freelancer_name().as_ref(),
                                message: bid.message(),
                                status: encode_bid_status(bid.status()),
                            };
                            diesel::insert_into(bids::table)
                                .values(&new_row)
                                .execute(conn)
                                .await?;
                            Ok(BidPlacement::Placed)
                        }
                    }
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(placement)
    }

    async fn commit_hire(&self, commit: HireCommit) -> Result<HireCommitOutcome, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let gig_id = *commit.gig_id.as_uuid();
        let bid_id = *commit.bid_id.as_uuid();

        let outcome = conn
            .transaction(|conn| {
                async move {
                    // The gig row lock is the serialisation point: every hire
                    // and bid placement on this gig queues behind it.
                    let gig_status: Option<String> = gigs::table
                        .find(gig_id)
                        .for_update()
                        .select(gigs::status)
                        .first(conn)
                        .await
                        .optional()?;

                    match gig_status.as_deref() {
                        None => return Ok(HireCommitOutcome::GigMissing),
                        Some(status) if status != GIG_STATUS_OPEN => {
                            return Ok(HireCommitOutcome::GigClosed);
                        }
                        Some(_) => {}
                    }

                    let bid: Option<(uuid::Uuid, String)> = bids::table
                        .find(bid_id)
                        .select((bids::gig_id, bids::status))
                        .first(conn)
                        .await
                        .optional()?;

                    match bid {
                        None => return Ok(HireCommitOutcome::BidMissing),
                        Some((bid_gig_id, status))
                            if bid_gig_id != gig_id || status != BID_STATUS_PENDING =>
                        {
                            return Ok(HireCommitOutcome::BidResolved);
                        }
                        Some(_) => {}
                    }

                    diesel::update(gigs::table.find(gig_id))
                        .set(gigs::status.eq(GIG_STATUS_ASSIGNED))
                        .execute(conn)
                        .await?;

                    diesel::update(bids::table.find(bid_id))
                        .set(bids::status.eq(BID_STATUS_HIRED))
                        .execute(conn)
                        .await?;

                    let rejected_siblings = diesel::update(
                        bids::table.filter(
                            bids::gig_id
                                .eq(gig_id)
                                .and(bids::id.ne(bid_id))
                                .and(bids::status.eq(BID_STATUS_PENDING)),
                        ),
                    )
                    .set(bids::status.eq(BID_STATUS_REJECTED))
                    .execute(conn)
                    .await?;

                    Ok(HireCommitOutcome::Committed {
                        rejected_siblings: rejected_siblings as u64,
                    })
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping; query behaviour needs a live
    //! database and lives outside unit scope.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn checkout_failures_map_to_retryable_timeouts() {
        let error = map_pool_error(PoolError::checkout("pool exhausted"));
        assert!(matches!(error, StoreError::Timeout { .. }));
        assert!(error.to_string().contains("pool exhausted"));
    }

    #[rstest]
    fn build_failures_map_to_connection_errors() {
        let error = map_pool_error(PoolError::build("bad url"));
        assert!(matches!(error, StoreError::Connection { .. }));
    }

    #[rstest]
    fn diesel_not_found_maps_to_query_error() {
        let error = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(error, StoreError::Query { .. }));
    }
}
