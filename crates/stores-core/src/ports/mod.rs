//! Port traits (interfaces) for dependency injection

pub mod revocation;

pub use revocation::RevocationStore;
