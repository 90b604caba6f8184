//! This file serves as the root for all SeaORM entity modules.
//! The data model covers three tables: accounts, the directed follow
//! edges between them, and the microposts they author.

pub mod account;
pub mod micropost;
pub mod relationship;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::account::Entity as Account;
    pub use super::micropost::Entity as Micropost;
    pub use super::relationship::Entity as Relationship;
}
