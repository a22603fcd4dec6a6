//! Attribute bags attached to reflected types and fields.
//!
//! A meta value is any `'static` type implementing [`Debug`](core::fmt::Debug)
//! that is `Send + Sync`. At most one value per meta type is kept, a later
//! insertion replaces the earlier one.
//!
//! The vocabulary understood by the editors lives in [`m`].
//!
//! # Examples
//!
//! ```
//! use dv_reflect::meta::{ReflectedMeta, m};
//!
//! let meta = ReflectedMeta::new()
//!     .with(m::DisplayName("Hit points"))
//!     .with(m::Range::new(0.0, 100.0, 1.0));
//!
//! assert_eq!(meta.get::<m::DisplayName>(), Some(&m::DisplayName("Hit points")));
//! assert!(!meta.contains::<m::ReadOnly>());
//! ```

// -----------------------------------------------------------------------------
// Modules

pub mod m;
mod reflected_meta;

// -----------------------------------------------------------------------------
// Exports

pub use reflected_meta::{Meta, ReflectedMeta};
