// [crates/windi-guard/src/storage/mod.rs]
pub mod client;
pub mod repository;
pub mod schema;

pub use client::GuardDb;
pub use repository::{severity_from_str, GuardRepository};
