//! scalar/mod.rs
//! Fixed-width big-endian codec for booleans, integers and floats.
//!
//! Width is a property of the declared type, never of the value: an `i64`
//! holding 3 still takes eight bytes.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::Scalar;
pub use encode::put_scalar;
pub use decode::get_scalar;
