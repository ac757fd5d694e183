//! Library crate for portwatch: local TCP port liveness polling with an authenticated status route.
pub mod auth;
pub mod config;
pub mod logging;
pub mod poller;
pub mod prober;
pub mod report;
pub mod server;
pub mod store;
pub mod targets;
pub mod types;
