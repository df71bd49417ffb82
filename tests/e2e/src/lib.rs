//! Shared fixtures for the tessera end-to-end suites

pub mod fixtures;
