//! Test fixtures for rescue-router.
//!
//! Provides realistic test data including:
//! - Yangon shelter and township locations
//! - A scripted route provider with per-depot failures and delays

#![allow(dead_code)]

pub mod provider;
pub mod yangon_locations;

pub use provider::*;
pub use yangon_locations::*;
