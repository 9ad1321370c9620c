//! Step definitions for Cucumber BDD tests
//!
//! This module contains all Given/When/Then step implementations.

pub mod given;
pub mod when;
