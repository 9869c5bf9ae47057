//! Shared wire types for the timeline service.
//!
//! `models` holds the records the API returns, `api` the request and
//! response envelopes around them.

pub mod api;
pub mod models;
