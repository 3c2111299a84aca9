//! cinetrack — core library for a film catalogue and social rating
//! service.
//!
//! The crate owns the domain logic: film records with ordered genre
//! lists and a rating classification, users, a directional friendship
//! graph with a pending/accepted lifecycle, and like-based popularity
//! ranking. Storage is injected through the traits in [`store`], with
//! a SQLite backend in [`db`] and an in-memory backend for tests and
//! embedded use. HTTP routing, field validation and response shaping
//! belong to the consuming boundary layer, not this crate.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{EntityKind, Error, Result};
