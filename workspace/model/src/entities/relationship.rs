use sea_orm::entity::prelude::*;

/// A directed follow edge: the follower account follows the followed
/// account. The `(follower_id, followed_id)` pair is unique and the
/// store rejects self-edges.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "relationships")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub follower_id: i32,
    pub followed_id: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The account on the following side of the edge.
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::FollowerId",
        to = "super::account::Column::Id"
    )]
    Follower,
    /// The account being followed.
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::FollowedId",
        to = "super::account::Column::Id"
    )]
    Followed,
}

impl ActiveModelBehavior for ActiveModel {}
