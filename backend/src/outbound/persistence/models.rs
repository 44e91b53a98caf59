//! Internal Diesel row structs and status codecs.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Row-to-domain conversion goes through the
//! validated `from_storage` rehydrators.

use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Bid, BidId, BidStatus, Budget, DisplayName, EmailAddress, Gig, GigId, GigStatus, User, UserId,
};

use super::schema::{bids, gigs, users};

pub(crate) const GIG_STATUS_OPEN: &str = "open";
pub(crate) const GIG_STATUS_ASSIGNED: &str = "assigned";
pub(crate) const BID_STATUS_PENDING: &str = "pending";
pub(crate) const BID_STATUS_HIRED: &str = "hired";
pub(crate) const BID_STATUS_REJECTED: &str = "rejected";

/// A stored column value that no longer decodes into a domain type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("corrupt {column} value in row {row_id}: {value:?}")]
pub(crate) struct RowDecodeError {
    pub column: &'static str,
    pub row_id: Uuid,
    pub value: String,
}

fn decode_error(column: &'static str, row_id: Uuid, value: impl Into<String>) -> RowDecodeError {
    RowDecodeError {
        column,
        row_id,
        value: value.into(),
    }
}

pub(crate) fn encode_gig_status(status: GigStatus) -> &'static str {
    match status {
        GigStatus::Open => GIG_STATUS_OPEN,
        GigStatus::Assigned => GIG_STATUS_ASSIGNED,
    }
}

fn decode_gig_status(value: &str, row_id: Uuid) -> Result<GigStatus, RowDecodeError> {
    match value {
        GIG_STATUS_OPEN => Ok(GigStatus::Open),
        GIG_STATUS_ASSIGNED => Ok(GigStatus::Assigned),
        other => Err(decode_error("status", row_id, other)),
    }
}

pub(crate) fn encode_bid_status(status: BidStatus) -> &'static str {
    match status {
        BidStatus::Pending => BID_STATUS_PENDING,
        BidStatus::Hired => BID_STATUS_HIRED,
        BidStatus::Rejected => BID_STATUS_REJECTED,
    }
}

fn decode_bid_status(value: &str, row_id: Uuid) -> Result<BidStatus, RowDecodeError> {
    match value {
        BID_STATUS_PENDING => Ok(BidStatus::Pending),
        BID_STATUS_HIRED => Ok(BidStatus::Hired),
        BID_STATUS_REJECTED => Ok(BidStatus::Rejected),
        other => Err(decode_error("status", row_id, other)),
    }
}

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, RowDecodeError> {
        let name = DisplayName::new(self.display_name.clone())
            .map_err(|_| decode_error("display_name", self.id, self.display_name.clone()))?;
        let email = EmailAddress::new(self.email.clone())
            .map_err(|_| decode_error("email", self.id, self.email.clone()))?;
        Ok(User::new(UserId::from(self.id), name, email))
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub display_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Row struct for reading from the gigs table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = gigs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GigRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub budget: i64,
    pub owner_id: Uuid,
    pub status: String,
}

impl GigRow {
    pub(crate) fn into_gig(self) -> Result<Gig, RowDecodeError> {
        let status = decode_gig_status(&self.status, self.id)?;
        let budget = Budget::new(self.budget)
            .map_err(|_| decode_error("budget", self.id, self.budget.to_string()))?;
        Ok(Gig::from_storage(
            GigId::from(self.id),
            self.title,
            self.description,
            budget,
            UserId::from(self.owner_id),
            status,
        ))
    }
}

/// Insertable struct for creating new gig records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = gigs)]
pub(crate) struct NewGigRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub budget: i64,
    pub owner_id: Uuid,
    pub status: &'a str,
}

/// Row struct for reading from the bids table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bids)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BidRow {
    pub id: Uuid,
    pub gig_id: Uuid,
    pub freelancer_id: Uuid,
    pub freelancer_name: String,
    pub message: String,
    pub status: String,
}

impl BidRow {
    pub(crate) fn into_bid(self) -> Result<Bid, RowDecodeError> {
        let status = decode_bid_status(&self.status, self.id)?;
        let freelancer_name = DisplayName::new(self.freelancer_name.clone())
            .map_err(|_| decode_error("freelancer_name", self.id, self.freelancer_name.clone()))?;
        Ok(Bid::from_storage(
            BidId::from(self.id),
            GigId::from(self.gig_id),
            UserId::from(self.freelancer_id),
            freelancer_name,
            self.message,
            status,
        ))
    }
}

/// Insertable struct for creating new bid records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bids)]
pub(crate) struct NewBidRow<'a> {
    pub id: Uuid,
    pub gig_id: Uuid,
    pub freelancer_id: Uuid,
    pub freelancer_name: &'a str,
    pub message: &'a str,
    pub status: &'a str,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn gig_row_round_trips_status() {
        let row = GigRow {
            id: Uuid::new_v4(),
            title: "Paint the fence".into(),
            description: String::new(),
            budget: 500,
            owner_id: Uuid::new_v4(),
            status: GIG_STATUS_ASSIGNED.into(),
        };
        let gig = row.into_gig().expect("decodes");
        assert_eq!(gig.status(), GigStatus::Assigned);
        assert_eq!(encode_gig_status(gig.status()), GIG_STATUS_ASSIGNED);
    }

    #[rstest]
    fn unknown_statuses_are_rejected_not_defaulted() {
        let row = BidRow {
            id: Uuid::new_v4(),
            gig_id: Uuid::new_v4(),
            freelancer_id: Uuid::new_v4(),
            freelancer_name: "Grace".into(),
            message: "I can do it".into(),
            status: "archived".into(),
        };
        let error = row.into_bid().expect_err("unknown status should fail");
        assert!(error.to_string().contains("archived"));
    }
}
