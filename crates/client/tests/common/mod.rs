//! Test infrastructure for the CloudSearch client.
//!
//! Provides a recording in-memory transport and canned service responses.

#![allow(dead_code)]

pub mod fixtures;
pub mod transport;

pub use fixtures::*;
pub use transport::*;
