//! Directed follow graph over accounts.
//!
//! Duplicate-edge safety does not rely on application-level locking:
//! the store carries a unique index on `(follower_id, followed_id)`
//! and the insert runs with ON CONFLICT DO NOTHING, so concurrent
//! follow calls for the same pair collapse into one edge.

use chrono::Utc;
use model::entities::{account, relationship};
use sea_orm::sea_query::{OnConflict, Query};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set,
};
use tracing::{debug, instrument};

use crate::accounts::find_account;
use crate::error::Result;

/// Creates the follow edge. Idempotent: a self-follow and an already
/// existing edge are both no-ops. Both endpoints must be live accounts.
#[instrument(skip(db))]
pub async fn follow(db: &DatabaseConnection, follower_id: i32, followed_id: i32) -> Result<()> {
    if follower_id == followed_id {
        debug!(follower_id, "ignoring self-follow");
        return Ok(());
    }
    find_account(db, follower_id).await?;
    find_account(db, followed_id).await?;

    let edge = relationship::ActiveModel {
        follower_id: Set(follower_id),
        followed_id: Set(followed_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let outcome = relationship::Entity::insert(edge)
        .on_conflict(
            OnConflict::columns([
                relationship::Column::FollowerId,
                relationship::Column::FollowedId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec(db)
        .await;

    match outcome {
        Ok(_) => {
            debug!(follower_id, followed_id, "follow edge created");
            Ok(())
        }
        // The conflict path reports nothing inserted; that is the
        // idempotent outcome, not a failure.
        Err(DbErr::RecordNotInserted) => {
            debug!(follower_id, followed_id, "follow edge already present");
            Ok(())
        }
        Err(error) => Err(error.into()),
    }
}

/// Removes the follow edge if present; a no-op otherwise.
#[instrument(skip(db))]
pub async fn unfollow(db: &DatabaseConnection, follower_id: i32, followed_id: i32) -> Result<()> {
    let result = relationship::Entity::delete_many()
        .filter(relationship::Column::FollowerId.eq(follower_id))
        .filter(relationship::Column::FollowedId.eq(followed_id))
        .exec(db)
        .await?;
    debug!(
        follower_id,
        followed_id,
        removed = result.rows_affected,
        "unfollow"
    );
    Ok(())
}

pub async fn is_following(
    db: &DatabaseConnection,
    follower_id: i32,
    followed_id: i32,
) -> Result<bool> {
    Ok(relationship::Entity::find()
        .filter(relationship::Column::FollowerId.eq(follower_id))
        .filter(relationship::Column::FollowedId.eq(followed_id))
        .one(db)
        .await?
        .is_some())
}

/// Accounts following the given account. Duplicate-free by the unique
/// index on the edge pair; no meaningful order.
pub async fn followers(db: &DatabaseConnection, id: i32) -> Result<Vec<account::Model>> {
    let follower_ids = Query::select()
        .column(relationship::Column::FollowerId)
        .from(relationship::Entity)
        .and_where(relationship::Column::FollowedId.eq(id))
        .to_owned();

    Ok(account::Entity::find()
        .filter(account::Column::Id.in_subquery(follower_ids))
        .all(db)
        .await?)
}

/// Accounts the given account follows.
pub async fn following(db: &DatabaseConnection, id: i32) -> Result<Vec<account::Model>> {
    let followed_ids = Query::select()
        .column(relationship::Column::FollowedId)
        .from(relationship::Entity)
        .and_where(relationship::Column::FollowerId.eq(id))
        .to_owned();

    Ok(account::Entity::find()
        .filter(account::Column::Id.in_subquery(followed_ids))
        .all(db)
        .await?)
}

pub async fn follower_count(db: &DatabaseConnection, id: i32) -> Result<u64> {
    Ok(relationship::Entity::find()
        .filter(relationship::Column::FollowedId.eq(id))
        .count(db)
        .await?)
}

pub async fn following_count(db: &DatabaseConnection, id: i32) -> Result<u64> {
    Ok(relationship::Entity::find()
        .filter(relationship::Column::FollowerId.eq(id))
        .count(db)
        .await?)
}
