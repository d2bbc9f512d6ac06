//! Address composition and guard checks for register-map projects.
//!
//! This crate walks a project's instantiation hierarchy — block instances,
//! their register-set instances, the registers within — multiplying out
//! repeat counts and applying per-level base addresses to produce the flat
//! [`AddressEntry`] list every downstream generator consumes. The guard
//! checks in [`check`] validate that list (range overlap, replica spacing,
//! alignment, duplicates) before it is trusted for generation.

#![warn(missing_docs)]

pub mod check;
pub mod codes;
pub mod flatten;

pub use check::check_project;
pub use flatten::{
    build_address_map, build_address_map_for, build_address_map_with_base, AddressEntry,
    FlattenError,
};
