//! Counter-attaching operator.

use crate::core::error::{Error, Result};
use crate::core::flow::Flow;
use crate::core::record::{Record, Value};
use async_stream::try_stream;
use futures::StreamExt;

/// Attach a counter starting at `start`, incrementing by 1 per element.
/// The counter is independent per subscription: resubscribing restarts
/// it at `start`.
///
/// Per-shape rules:
/// - Sequence: counter appended positionally; a `field_name` is an error
///   (the target would be ambiguous).
/// - Keyed: `field_name` is required and the counter is inserted under
///   it; absence is an error (there is no implicit slot).
/// - Scalar: promoted to `[value, counter]`; a `field_name` is an error.
pub fn numerate(flow: &Flow, start: i64, field_name: Option<String>) -> Flow {
    let inner = flow.clone();
    Flow::new(move || {
        let inner = inner.clone();
        let field_name = field_name.clone();
        Box::pin(try_stream! {
            let mut counter = start;
            let mut source = inner.subscribe();
            while let Some(item) = source.next().await {
                yield attach_counter(item?, counter, field_name.as_deref())?;
                counter += 1;
            }
        })
    })
}

fn attach_counter(record: Record, counter: i64, field_name: Option<&str>) -> Result<Record> {
    match record {
        Record::Sequence(mut values) => {
            if field_name.is_some() {
                return Err(Error::shape_mismatch(
                    "numerate: field name is ambiguous for sequence records",
                ));
            }
            values.push(Value::Int(counter));
            Ok(Record::Sequence(values))
        }
        Record::Keyed(mut map) => {
            let field = field_name.ok_or_else(|| {
                Error::shape_mismatch("numerate: keyed records require a field name")
            })?;
            map.insert(field.to_string(), Value::Int(counter));
            Ok(Record::Keyed(map))
        }
        Record::Scalar(value) => {
            if field_name.is_some() {
                return Err(Error::shape_mismatch(
                    "numerate: field name is not applicable to scalar records",
                ));
            }
            Ok(Record::Sequence(vec![value, Value::Int(counter)]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_lands_after_existing_keyed_fields() {
        let out = attach_counter(Record::keyed([("f1", 1)]), 10, Some("index")).unwrap();
        assert_eq!(out, Record::keyed([("f1", 1), ("index", 10)]));
    }
}
