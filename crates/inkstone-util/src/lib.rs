//! Shared utilities for inkstone.
//!
//! This crate provides the small pieces every other inkstone crate needs:
//! prefixed identifier generation, logging setup, and path resolution.

pub mod id;
pub mod log;
pub mod path;

pub use id::{IdPrefix, Identifier};
