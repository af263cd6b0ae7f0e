//! Utilities and Helper Functions
//!
//! This module contains utility functions and helper modules:
//! - Logging configuration and setup
//! - Name lookup tables
//! - Test utilities and test cases

pub mod logger;
pub mod lut;
#[cfg(test)]
mod tests;
