//! Feed builder: the viewer's own posts plus those of everyone they
//! follow, newest first.
//!
//! The author set is `{viewer} ∪ following(viewer)` and the whole feed
//! is one bounded query with a relationship subquery. There is no
//! per-edge iteration, so the result stays correct and cheap as the
//! graph grows, and the viewer's posts appear exactly once because the
//! author set is a set by construction.

use model::entities::{micropost, relationship};
use sea_orm::sea_query::Query;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::instrument;

use crate::accounts::find_account;
use crate::error::Result;

/// Returns the personalized feed for the given viewer.
#[instrument(skip(db))]
pub async fn feed(db: &DatabaseConnection, viewer_id: i32) -> Result<Vec<micropost::Model>> {
    find_account(db, viewer_id).await?;

    let followed_ids = Query::select()
        .column(relationship::Column::FollowedId)
        .from(relationship::Entity)
        .and_where(relationship::Column::FollowerId.eq(viewer_id))
        .to_owned();

    Ok(micropost::Entity::find()
        .filter(
            Condition::any()
                .add(micropost::Column::AuthorId.eq(viewer_id))
                .add(micropost::Column::AuthorId.in_subquery(followed_ids)),
        )
        .order_by_desc(micropost::Column::CreatedAt)
        .order_by_desc(micropost::Column::Id)
        .all(db)
        .await?)
}
