//! Keep Reading Backend Library
//!
//! Authentication core and catalog API for the Keep Reading bookstore.
//! Exposed as a library for the binaries and the integration tests.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
