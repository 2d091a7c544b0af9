//! Folio application library
//!
//! A small books catalog and ordering service: the catalog is read-only, API
//! clients register for a bearer token, and registered clients manage orders.

pub mod app;
pub mod modules;
pub mod utils;

pub use app::{build_registry, router, run, Services};
