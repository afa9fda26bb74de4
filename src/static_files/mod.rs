//! Static file serving from the document root.

pub mod listing;
pub mod resolver;

pub use resolver::{Decision, ResourceResolver};
