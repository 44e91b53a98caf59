//! Marketplace services for gig posting, bid submission, and listings.
//!
//! These use-cases create one record each and do not need the hire
//! transaction; bid placement still goes through the store's atomic
//! check-open-and-insert so a concurrent hire cannot orphan a new bid.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{
    BidCommand, BidPlacement, BidQuery, GigCommand, GigQuery, ListBidsRequest, MarketplaceStore,
    PlaceBidRequest, PostGigRequest, StoreError,
};
use crate::domain::{Bid, BidValidationError, Error, Gig, GigValidationError};

fn map_store_error(error: StoreError) -> Error {
    match error {
        StoreError::Connection { message } | StoreError::Timeout { message } => {
            Error::service_unavailable(format!("entity store unavailable: {message}"))
        }
        StoreError::Query { message } => Error::internal(format!("entity store error: {message}")),
    }
}

fn map_gig_validation_error(error: GigValidationError) -> Error {
    let field = match error {
        GigValidationError::EmptyTitle | GigValidationError::TitleTooLong { .. } => "title",
        GigValidationError::NegativeBudget => "budget",
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

fn map_bid_validation_error(error: BidValidationError) -> Error {
    match error {
        BidValidationError::EmptyMessage => {
            Error::invalid_request(error.to_string()).with_details(json!({ "field": "message" }))
        }
    }
}

/// Marketplace service implementing the gig and bid driving ports.
#[derive(Clone)]
pub struct MarketplaceService<S> {
    store: Arc<S>,
}

impl<S> MarketplaceService<S> {
    /// Create a new service over the given entity store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> GigCommand for MarketplaceService<S>
where
    S: MarketplaceStore,
{
    async fn post_gig(&self, request: PostGigRequest) -> Result<Gig, Error> {
        let gig = Gig::post(
            request.owner_id,
            request.title,
            request.description,
            request.budget,
        )
        .map_err(map_gig_validation_error)?;

        self.store
            .insert_gig(gig.clone())
            .await
            .map_err(map_store_error)?;

        tracing::info!(gig_id = %gig.id(), owner_id = %gig.owner_id(), "gig posted");
        Ok(gig)
    }
}

#[async_trait]
impl<S> GigQuery for MarketplaceService<S>
where
    S: MarketplaceStore,
{
    async fn list_open_gigs(&self) -> Result<Vec<Gig>, Error> {
        self.store.open_gigs().await.map_err(map_store_error)
    }
}

#[async_trait]
impl<S> BidCommand for MarketplaceService<S>
where
    S: MarketplaceStore,
{
    async fn place_bid(&self, request: PlaceBidRequest) -> Result<Bid, Error> {
        let freelancer = self
            .store
            .user(request.freelancer_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::unauthorized("unknown freelancer identity"))?;

        // Early reads give precise errors; the insert below re-checks
        // atomically, so these can be stale without harm.
        let gig = self
            .store
            .gig(request.gig_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("gig {} not found", request.gig_id)))?;
        if !gig.is_open() {
            return Err(Error::conflict(format!("gig {} is no longer open", gig.id())));
        }

        let bid = Bid::place(
            gig.id(),
            freelancer.id(),
            freelancer.name().clone(),
            request.message,
        )
        .map_err(map_bid_validation_error)?;

        match self
            .store
            .insert_bid(bid.clone())
            .await
            .map_err(map_store_error)?
        {
            BidPlacement::Placed => {
                tracing::info!(bid_id = %bid.id(), gig_id = %gig.id(), "bid placed");
                Ok(bid)
            }
            BidPlacement::GigMissing => {
                Err(Error::not_found(format!("gig {} not found", request.gig_id)))
            }
            BidPlacement::GigClosed => Err(Error::conflict(format!(
                "gig {} was assigned before the bid was recorded",
                request.gig_id
            ))),
        }
    }
}

#[async_trait]
impl<S> BidQuery for MarketplaceService<S>
where
    S: MarketplaceStore,
{
    async fn list_bids(&self, request: ListBidsRequest) -> Result<Vec<Bid>, Error> {
        let gig = self
            .store
            .gig(request.gig_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("gig {} not found", request.gig_id)))?;

        if gig.owner_id() != request.requesting_user_id {
            return Err(Error::forbidden("only the gig owner may list its bids"));
        }

        self.store
            .bids_for_gig(gig.id())
            .await
            .map_err(map_store_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::ports::MockMarketplaceStore;
    use crate::domain::{DisplayName, EmailAddress, ErrorCode, GigId, User, UserId};

    fn registered_user() -> User {
        User::new(
            UserId::random(),
            DisplayName::new("Grace").expect("valid name"),
            EmailAddress::new("grace@example.com").expect("valid email"),
        )
    }

    fn service(store: MockMarketplaceStore) -> MarketplaceService<MockMarketplaceStore> {
        MarketplaceService::new(Arc::new(store))
    }

    #[rstest]
    #[tokio::test]
    async fn post_gig_persists_an_open_gig() {
        let owner = UserId::random();
        let mut store = MockMarketplaceStore::new();
        store
            .expect_insert_gig()
            .withf(|gig| gig.is_open())
            .returning(|_| Ok(()));

        let gig = service(store)
            .post_gig(PostGigRequest {
                owner_id: owner,
                title: "Build a landing page".into(),
                description: "Responsive, one form".into(),
                budget: 500,
            })
            .await
            .expect("gig posted");
        assert_eq!(gig.owner_id(), owner);
        assert_eq!(gig.budget().amount(), 500);
    }

    #[rstest]
    #[case("", 500, "title")]
    #[case("ok", -5, "budget")]
    #[tokio::test]
    async fn post_gig_rejects_invalid_input_before_touching_the_store(
        #[case] title: &str,
        #[case] budget: i64,
        #[case] field: &str,
    ) {
        let mut store = MockMarketplaceStore::new();
        store.expect_insert_gig().never();

        let err = service(store)
            .post_gig(PostGigRequest {
                owner_id: UserId::random(),
                title: title.into(),
                description: String::new(),
                budget,
            })
            .await
            .expect_err("should fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details().and_then(|d| d.get("field")).and_then(|f| f.as_str()),
            Some(field)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn place_bid_denormalises_the_freelancer_name() {
        let freelancer = registered_user();
        let freelancer_id = freelancer.id();
        let gig = Gig::post(UserId::random(), "Paint the fence", "", 100).expect("valid gig");
        let gig_id = gig.id();

        let mut store = MockMarketplaceStore::new();
        store
            .expect_user()
            .returning(move |_| Ok(Some(freelancer.clone())));
        store.expect_gig().returning(move |_| Ok(Some(gig.clone())));
        store
            .expect_insert_bid()
            .withf(|bid| bid.is_pending())
            .returning(|_| Ok(BidPlacement::Placed));

        let bid = service(store)
            .place_bid(PlaceBidRequest {
                freelancer_id,
                gig_id,
                message: "Me too".into(),
            })
            .await
            .expect("bid placed");
        assert_eq!(bid.freelancer_name().as_ref(), "Grace");
        assert_eq!(bid.gig_id(), gig_id);
    }

    #[rstest]
    #[tokio::test]
    async fn place_bid_on_missing_gig_is_not_found() {
        let freelancer = registered_user();
        let mut store = MockMarketplaceStore::new();
        store
            .expect_user()
            .returning(move |_| Ok(Some(freelancer.clone())));
        store.expect_gig().returning(|_| Ok(None));
        store.expect_insert_bid().never();

        let err = service(store)
            .place_bid(PlaceBidRequest {
                freelancer_id: UserId::random(),
                gig_id: GigId::random(),
                message: "Me too".into(),
            })
            .await
            .expect_err("should fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn place_bid_on_assigned_gig_is_a_conflict_and_creates_nothing() {
        let freelancer = registered_user();
        let mut gig = Gig::post(UserId::random(), "Paint the fence", "", 100).expect("valid gig");
        gig.assign().expect("open gig assigns");
        let gig_id = gig.id();

        let mut store = MockMarketplaceStore::new();
        store
            .expect_user()
            .returning(move |_| Ok(Some(freelancer.clone())));
        store.expect_gig().returning(move |_| Ok(Some(gig.clone())));
        store.expect_insert_bid().never();

        let err = service(store)
            .place_bid(PlaceBidRequest {
                freelancer_id: UserId::random(),
                gig_id,
                message: "Me too".into(),
            })
            .await
            .expect_err("should fail");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn place_bid_losing_the_race_to_a_hire_is_a_conflict() {
        let freelancer = registered_user();
        let gig = Gig::post(UserId::random(), "Paint the fence", "", 100).expect("valid gig");
        let gig_id = gig.id();

        let mut store = MockMarketplaceStore::new();
        store
            .expect_user()
            .returning(move |_| Ok(Some(freelancer.clone())));
        store.expect_gig().returning(move |_| Ok(Some(gig.clone())));
        // The gig closed between the read and the insert.
        store
            .expect_insert_bid()
            .returning(|_| Ok(BidPlacement::GigClosed));

        let err = service(store)
            .place_bid(PlaceBidRequest {
                freelancer_id: UserId::random(),
                gig_id,
                message: "Me too".into(),
            })
            .await
            .expect_err("should fail");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn list_bids_is_owner_only() {
        let owner = UserId::random();
        let gig = Gig::post(owner, "Paint the fence", "", 100).expect("valid gig");
        let gig_id = gig.id();

        let mut store = MockMarketplaceStore::new();
        store.expect_gig().returning(move |_| Ok(Some(gig.clone())));
        store.expect_bids_for_gig().never();

        let err = service(store)
            .list_bids(ListBidsRequest {
                requesting_user_id: UserId::random(),
                gig_id,
            })
            .await
            .expect_err("should fail");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn list_open_gigs_surfaces_store_outages_as_unavailable() {
        let mut store = MockMarketplaceStore::new();
        store
            .expect_open_gigs()
            .returning(|| Err(StoreError::connection("refused")));

        let err = service(store)
            .list_open_gigs()
            .await
            .expect_err("should fail");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
