//! Common primitives shared across the regmap toolchain.
//!
//! Provides the [`Uuid`] identity token used to key every registry and
//! override table.

#![warn(missing_docs)]

mod uuid;

pub use uuid::Uuid;
