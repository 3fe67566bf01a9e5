#[cfg(feature = "serde")]
pub mod api;
pub mod meal;
pub mod nutrition;
pub mod user;
