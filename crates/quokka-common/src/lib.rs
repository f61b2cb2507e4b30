//! Common utilities for the Quokka rewriter.
//!
//! This crate provides shared infrastructure used by the rewriting
//! components:
//! - **Warning System** - colored terminal output for degraded rewrites

pub mod warning;
