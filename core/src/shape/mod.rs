//! shape/mod.rs
//! Type classifier: maps a declared field type to its wire category.
//!
//! Notes:
//! - `TypeShape` describes what a caller declared, including categories that
//!   have no wire mapping (maps, optionals, unions, functions, pointers).
//! - `WireKind` is the closed set of categories the wire format knows.
//! - `classify` is total over `TypeShape` and deterministic.

pub mod types;
pub mod classify;
pub mod cycle;

pub use types::*;
pub use classify::*;
pub use cycle::{build_record_shape, record_field_shape};
