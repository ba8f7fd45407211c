//! Shared test fixtures for cellforge crates.
//!
//! This crate only depends on `cellforge-core`, so any crate in the
//! workspace can use it as a dev-dependency without cycles.
//!
//! - [`problems`] - sample instances, from trivial to clustered
//! - [`checks`] - structural checks on placements
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! cellforge-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use cellforge_test::problems::single_house;
//! use cellforge_test::checks::assert_well_formed;
//! ```

pub mod checks;
pub mod problems;

pub use checks::{assert_cleaned, assert_well_formed};
pub use problems::{
    clustered, empty, far_apart_houses, single_house, small_town, FAR_APART_SPACING,
};
