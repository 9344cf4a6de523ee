//! Cross-product join of two record flows.

use crate::core::error::{Error, Result};
use crate::core::flow::Flow;
use crate::core::record::{Record, Shape, Value};
use async_stream::try_stream;
use futures::StreamExt;
use indexmap::IndexMap;

/// Join every left element with every element of a fresh subscription of
/// `right`, left-major ordered: all pairs for `left[0]` precede any pair
/// for `left[1]`. The right flow must be restartable, since it is re-run once
/// per left element.
///
/// The output shape is decided per emitted pair from the two concrete
/// shapes. A keyed side is flattened to its values (insertion order)
/// whenever the other side is a sequence, or a scalar without
/// `scalar_field`; this asymmetry between the Sequence/Keyed and
/// Keyed/Sequence combinations is deliberate and pinned by tests.
/// `scalar_field` only applies to Scalar/Keyed pairs, where it names the
/// field the scalar is merged under; for Keyed/Keyed pairs it is ignored
/// and right-hand fields win on collision.
pub fn join(left: &Flow, right: &Flow, scalar_field: Option<String>) -> Flow {
    join_checked(left, right, scalar_field, None)
}

/// Restrict [`join`] to Sequence/Sequence pairs; any element of another
/// shape fails the whole stream with a shape mismatch.
pub fn join_arrays(left: &Flow, right: &Flow) -> Flow {
    join_checked(left, right, None, Some(Shape::Sequence))
}

/// Restrict [`join`] to Keyed/Keyed pairs; any element of another shape
/// fails the whole stream with a shape mismatch.
pub fn join_objects(left: &Flow, right: &Flow) -> Flow {
    join_checked(left, right, None, Some(Shape::Keyed))
}

fn join_checked(
    left: &Flow,
    right: &Flow,
    scalar_field: Option<String>,
    required: Option<Shape>,
) -> Flow {
    let left = left.clone();
    let right = right.clone();
    Flow::new(move || {
        let left = left.clone();
        let right = right.clone();
        let scalar_field = scalar_field.clone();
        Box::pin(try_stream! {
            let mut lhs = left.subscribe();
            while let Some(item) = lhs.next().await {
                let l = item?;
                check_shape(&l, required)?;
                // The right side restarts for every left element.
                let mut rhs = right.subscribe();
                while let Some(item) = rhs.next().await {
                    let r = item?;
                    check_shape(&r, required)?;
                    yield combine(&l, r, scalar_field.as_deref());
                }
            }
        })
    })
}

fn check_shape(record: &Record, required: Option<Shape>) -> Result<()> {
    match required {
        Some(shape) if record.shape() != shape => Err(Error::shape_mismatch(format!(
            "join requires {} records here, got {}: {}",
            shape,
            record.shape(),
            record
        ))),
        _ => Ok(()),
    }
}

/// The nine shape-combination rules. Total: every pair combines.
fn combine(left: &Record, right: Record, scalar_field: Option<&str>) -> Record {
    match (left, right) {
        (Record::Sequence(l), Record::Sequence(r)) => {
            Record::Sequence(l.iter().cloned().chain(r).collect())
        }
        (Record::Sequence(l), Record::Keyed(r)) => {
            Record::Sequence(l.iter().cloned().chain(r.into_values()).collect())
        }
        (Record::Sequence(l), Record::Scalar(r)) => {
            let mut out = l.clone();
            out.push(r);
            Record::Sequence(out)
        }
        (Record::Keyed(l), Record::Sequence(r)) => {
            Record::Sequence(l.values().cloned().chain(r).collect())
        }
        (Record::Keyed(l), Record::Keyed(r)) => {
            let mut out = l.clone();
            for (key, value) in r {
                out.insert(key, value);
            }
            Record::Keyed(out)
        }
        (Record::Keyed(l), Record::Scalar(r)) => match scalar_field {
            Some(field) => {
                let mut out = l.clone();
                out.insert(field.to_string(), r);
                Record::Keyed(out)
            }
            None => {
                let mut out: Vec<Value> = l.values().cloned().collect();
                out.push(r);
                Record::Sequence(out)
            }
        },
        (Record::Scalar(l), Record::Sequence(r)) => {
            let mut out = vec![l.clone()];
            out.extend(r);
            Record::Sequence(out)
        }
        (Record::Scalar(l), Record::Keyed(r)) => match scalar_field {
            Some(field) => {
                let mut out = IndexMap::new();
                out.insert(field.to_string(), l.clone());
                for (key, value) in r {
                    out.insert(key, value);
                }
                Record::Keyed(out)
            }
            None => {
                let mut out = vec![l.clone()];
                out.extend(r.into_values());
                Record::Sequence(out)
            }
        },
        (Record::Scalar(l), Record::Scalar(r)) => Record::Sequence(vec![l.clone(), r]),
    }
}
