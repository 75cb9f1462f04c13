//! shape/classify.rs
//! Declared shape -> wire category.

use crate::constants::LEN_PREFIX_LEN;
use crate::shape::types::{RecordShape, TypeShape, WireKind};
use crate::types::{MarshalError, Result};

/// Classify a declared shape.
///
/// Sequences and records are classified all the way down, so a sequence of
/// maps or a record holding an optional fails as a whole with
/// `UnsupportedFieldType`. A `RecordRef` must name an enclosing record and
/// sit inside a sequence below it; a record that contains itself directly
/// has no finite encoding.
pub fn classify(shape: &TypeShape) -> Result<WireKind> {
    classify_in(shape, &mut Scope::default())
}

/// Classify every field of a record; the first failing field is named in the error.
pub fn classify_record(record: &RecordShape) -> Result<()> {
    classify_record_in(record, &mut Scope::default())
}

/// Records open during classification, each with the sequence depth at
/// which it was entered.
#[derive(Default)]
struct Scope<'s> {
    open: Vec<(&'s str, usize)>,
    seqs: usize,
}

fn classify_in<'s>(shape: &'s TypeShape, scope: &mut Scope<'s>) -> Result<WireKind> {
    match shape {
        TypeShape::Bool => Ok(WireKind::Bool),
        TypeShape::I8 => Ok(WireKind::I8),
        TypeShape::I16 => Ok(WireKind::I16),
        TypeShape::I32 => Ok(WireKind::I32),
        TypeShape::I64 => Ok(WireKind::I64),
        TypeShape::U8 => Ok(WireKind::U8),
        TypeShape::U16 => Ok(WireKind::U16),
        TypeShape::U32 => Ok(WireKind::U32),
        TypeShape::U64 => Ok(WireKind::U64),
        TypeShape::F32 => Ok(WireKind::F32),
        TypeShape::F64 => Ok(WireKind::F64),
        TypeShape::Text => Ok(WireKind::Text),
        TypeShape::Seq(elem) => {
            scope.seqs += 1;
            let res = classify_in(elem, scope);
            scope.seqs -= 1;
            res?;
            Ok(WireKind::Seq)
        }
        TypeShape::Record(record) => {
            classify_record_in(record, scope)?;
            Ok(WireKind::Record)
        }
        TypeShape::RecordRef(name) => {
            match scope.open.iter().rev().find(|(open, _)| *open == name.as_str()) {
                Some((_, entered_at)) if scope.seqs > *entered_at => Ok(WireKind::Record),
                Some(_) => Err(MarshalError::unsupported(format!(
                    "record {} containing itself outside a sequence",
                    name
                ))),
                None => Err(MarshalError::unsupported(format!(
                    "reference to record {} outside its declaration",
                    name
                ))),
            }
        }
        unsupported => Err(MarshalError::unsupported(unsupported.name())),
    }
}

fn classify_record_in<'s>(record: &'s RecordShape, scope: &mut Scope<'s>) -> Result<()> {
    scope.open.push((record.name.as_str(), scope.seqs));
    let mut res = Ok(());
    for field in &record.fields {
        if let Err(e) = classify_in(&field.shape, scope) {
            res = Err(e.in_field(&field.name));
            break;
        }
    }
    scope.open.pop();
    res
}

/// Smallest number of bytes any value of `shape` occupies on the wire
/// (self-description tags excluded). Unsupported shapes and record
/// back-references count as zero; resolve a `RecordRef` and use
/// [`min_record_len`] where the target is known.
pub fn min_wire_len(shape: &TypeShape) -> usize {
    match shape {
        TypeShape::Text | TypeShape::Seq(_) => LEN_PREFIX_LEN,
        TypeShape::Record(record) => min_record_len(record),
        TypeShape::RecordRef(_) => 0,
        other => classify(other)
            .ok()
            .and_then(WireKind::fixed_width)
            .unwrap_or(0),
    }
}

pub fn min_record_len(record: &RecordShape) -> usize {
    record.fields.iter().map(|f| min_wire_len(&f.shape)).sum()
}
