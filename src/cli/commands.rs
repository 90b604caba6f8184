pub mod initdb;

pub use initdb::init_database;
