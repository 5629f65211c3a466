//! Common utilities module
//!
//! This module contains shared utilities used across the demosaicing pipeline.

pub mod error;

pub use error::{DemosaicError, Result};
