//! # Config Crate
//!
//! Centralized configuration constants for the curve pipeline.
//! All magic numbers and tunable parameters are defined here to ensure
//! consistency across crates and easy configuration management.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{compute_cut_count, DEFAULT_MIN_SIDES_PER_ROTATION, SPLIT_TOLERANCE};
//!
//! // Cut planes for a part half as wide as the bend circumference
//! let cuts = compute_cut_count(50.0, 100.0, DEFAULT_MIN_SIDES_PER_ROTATION);
//! assert_eq!(cuts, 5);
//!
//! // Vertices this close to a cut plane count as lying on it
//! assert!(SPLIT_TOLERANCE > 0.0);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Editor Compatible**: Defaults and ranges match the curve editor

pub mod constants;
