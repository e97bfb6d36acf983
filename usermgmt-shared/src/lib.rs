//! # usermgmt shared library
//!
//! Domain types, storage and business rules for the user-management service.
//! The HTTP layer lives in `usermgmt-api` and only talks to [`service::UserService`].
//!
//! ## Module Organization
//!
//! - `models`: the `User` record and request payloads
//! - `repository`: storage port plus PostgreSQL and in-memory adapters
//! - `service`: business rules (email uniqueness, delete policy)
//! - `db`: connection pool and migrations
//! - `error`: domain error type

pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
