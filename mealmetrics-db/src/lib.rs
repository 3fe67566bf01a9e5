pub mod connection;
pub mod meal;
pub mod user;
