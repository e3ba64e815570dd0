//! Form submissions for Concordia House student accommodation.
//!
//! Four endpoints (applications, incident reports, waitlist interest and
//! suggestions) each take one JSON object, check it, and insert one row.
//! The same crate carries the client side: form schemas with per-field
//! validation and a small state machine that allows one request in flight.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod form;
pub mod models;
pub mod pages;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;
pub mod submission;
