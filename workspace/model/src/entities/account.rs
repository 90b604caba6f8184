use sea_orm::entity::prelude::*;

/// Represents a registered account of the network: a display name, a
/// normalized email address, and derived credential material.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Always stored lower-cased; the unique index is therefore
    /// case-insensitive for every address the registry accepts.
    #[sea_orm(unique)]
    pub email: String,
    /// bcrypt digest of the password. The clear password never reaches
    /// the store.
    pub password_digest: String,
    /// bcrypt digest of the current remember token, if one was issued.
    pub remember_digest: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// An account exclusively owns the microposts it authored.
    #[sea_orm(has_many = "super::micropost::Entity")]
    Micropost,
}

impl Related<super::micropost::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Micropost.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
