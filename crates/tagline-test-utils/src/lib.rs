//! Shared test utilities for the tagline workspace.
//!
//! This crate provides text-file fixtures so crate test suites do not each
//! reinvent temp-dir setup. It is a dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`fixture`]: [`TextFixture`], a file of lines inside a temp dir

pub mod fixture;

pub use fixture::TextFixture;
