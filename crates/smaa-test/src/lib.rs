//! Shared test fixtures for SMAA crates.
//!
//! This crate provides small, fully specified decision problems for testing.
//! It depends only on `smaa-core` so every other crate can use it.
//!
//! - [`matrix`] - Impact matrices for rank acceptability tests
//! - [`outranking`] - Categories, boundary profiles and alternatives for sorting tests
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! smaa-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```
//! use smaa_test::{outranking_fixture, two_alternatives_three_criteria};
//!
//! let matrix = two_alternatives_three_criteria();
//! assert_eq!(matrix.alternatives().len(), 2);
//! assert_eq!(outranking_fixture().categories.len(), 3);
//! ```

pub mod matrix;
pub mod outranking;

pub use matrix::{car_selection_matrix, exact_matrix, two_alternatives_three_criteria};
pub use outranking::{outranking_fixture, OutrankingFixture};
