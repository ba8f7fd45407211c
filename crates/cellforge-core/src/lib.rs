//! Core types for cellforge
//!
//! This crate provides the fundamental abstractions for antenna placement:
//! - [`Grid`] and [`Position`]: the discrete plane antennas live on
//! - [`Catalog`] and [`AntennaSpec`]: the antenna types that can be placed
//! - [`Placement`] and [`PlacedAntenna`]: candidate solutions
//! - [`Problem`]: a validated instance with memoized coverage lookups
//! - [`coverage`]: the disc coverage function every objective is built on

pub mod catalog;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod placement;
pub mod problem;

pub use catalog::{AntennaSpec, Catalog, KindId};
pub use error::{CellforgeError, Result};
pub use geometry::{coverage, disc_offsets, CoverageSets, DiscCache};
pub use grid::{Grid, Position};
pub use placement::{PlacedAntenna, Placement, PlacementKey};
pub use problem::{Problem, ProblemSpec, DEFAULT_USERS_PER_HOUSE};
