//! Common utilities for the wayfind indoor routing toolkit

pub mod error;

pub use error::{Error, Result};
