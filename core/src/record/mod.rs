//! record/mod.rs
//! Record traversal for statically typed records.
//!
//! Field enumeration is fixed at compile time, either by `#[derive(Record)]`
//! or by `impl_record!`. Both visit fields in declaration order on encode and
//! on decode, so the two sides cannot drift apart.
//!
//! ```
//! use marshal_core::Record;
//!
//! #[derive(Default, Record)]
//! struct Batch<T> {
//!     items: Vec<T>,
//!     #[marshal(skip)]
//!     cursor: usize,
//! }
//! ```
//!
//! Shapes with no wire mapping are refused at compile time.
//!
//! ```compile_fail
//! #[derive(marshal_core::Record)]
//! enum Either { Left(u8), Right(u16) }
//! ```
//!
//! ```compile_fail
//! #[derive(marshal_core::Record)]
//! union Bits { a: u32, b: f32 }
//! ```
//!
//! ```compile_fail
//! #[derive(Default, marshal_core::Record)]
//! struct Maybe { value: Option<u32> }
//! ```
//!
//! ```compile_fail
//! use std::collections::HashMap;
//! #[derive(Default, marshal_core::Record)]
//! struct Lookup { table: HashMap<String, u32> }
//! ```
//!
//! ```compile_fail
//! #[derive(Default, marshal_core::Record)]
//! struct Index { at: usize }
//! ```
//!
//! ```compile_fail
//! #[derive(Default, marshal_core::Record)]
//! struct Sparse { slots: Vec<Option<u8>> }
//! ```
//!
//! ```compile_fail
//! #[derive(Default, marshal_core::Record)]
//! struct Borrowed<'a> { name: &'a str }
//! ```
//!
//! ```compile_fail
//! #[derive(Default, marshal_core::Record)]
//! struct Renamed {
//!     #[marshal(rename = "n")]
//!     num: u32,
//! }
//! ```
//!
//! ```compile_fail
//! #[derive(Default, marshal_core::Record)]
//! #[marshal(flatten)]
//! struct Flat { num: u32 }
//! ```

pub mod traits;
pub mod macros;

pub use traits::{Record, Wire};
