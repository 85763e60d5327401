#![cfg(feature = "postgres")]

pub mod schema;
mod store;

pub use store::*;
