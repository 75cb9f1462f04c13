//! shape/cycle.rs
//! Cycle breaking for self-referential record types.
//!
//! While a record type's shape is being built it is marked open on the
//! current thread; asking for the field shape of an open type yields a
//! `TypeShape::RecordRef` instead of recursing into it again.

use std::any::type_name;
use std::cell::RefCell;

use crate::record::Record;
use crate::shape::types::{RecordShape, TypeShape};

thread_local! {
    static OPEN: RefCell<Vec<&'static str>> = RefCell::new(Vec::new());
}

struct OpenGuard;

impl OpenGuard {
    fn enter(key: &'static str) -> Self {
        OPEN.with(|open| open.borrow_mut().push(key));
        OpenGuard
    }
}

impl Drop for OpenGuard {
    fn drop(&mut self) {
        OPEN.with(|open| {
            open.borrow_mut().pop();
        });
    }
}

fn is_open(key: &'static str) -> bool {
    OPEN.with(|open| open.borrow().contains(&key))
}

/// Build the record shape of `T` with `T` marked open.
pub fn build_record_shape<T: ?Sized>(build: impl FnOnce() -> RecordShape) -> RecordShape {
    let _guard = OpenGuard::enter(type_name::<T>());
    build()
}

/// Shape of record type `T` used as a field: the full record, or a
/// back-reference named `name` when `T` is already being built.
pub fn record_field_shape<T: Record>(name: &str) -> TypeShape {
    if is_open(type_name::<T>()) {
        return TypeShape::RecordRef(name.to_string());
    }
    TypeShape::Record(T::record_shape())
}
