//! Database access: initialization and record queries

pub mod init;
pub mod records;

pub use init::init_database;
