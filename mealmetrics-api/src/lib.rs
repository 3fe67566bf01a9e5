pub mod error;
pub mod routes;
pub mod summary;
pub mod token;
