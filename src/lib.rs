//! Folio - static files and a tiny record store over HTTP/1.1
//!
//! Core library for request parsing, resource resolution and the record store.

pub mod config;
pub mod http;
pub mod server;
pub mod static_files;
pub mod store;
