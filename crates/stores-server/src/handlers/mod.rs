//! HTTP handlers

pub mod health;
pub mod items;
pub mod stores;
pub mod tags;
pub mod users;

pub use health::health;
