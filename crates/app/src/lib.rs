//! Backend client, signing controllers and shared runtime plumbing.

pub mod api;
pub mod config;
pub mod context;
pub mod logging;
pub mod signing;
