use crate::collection::Document;
use crate::common::{split_path, FieldPath, SortOrder, Value};
use crate::errors::{ErrorKind, FolioError, FolioResult};
use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use std::cmp::Ordering;

/// Builds the collator used for string sort keys, if one was requested.
pub(crate) fn create_collator(
    collator_options: Option<CollatorOptions>,
    collator_preferences: Option<CollatorPreferences>,
) -> FolioResult<Option<CollatorBorrowed<'static>>> {
    if collator_options.is_none() && collator_preferences.is_none() {
        return Ok(None);
    }

    let preferences = collator_preferences.unwrap_or_default();
    let options = collator_options.unwrap_or_default();
    Collator::try_new(preferences, options).map(Some).map_err(|e| {
        log::error!("Failed to create collator for sorting: {}", e);
        FolioError::new(
            "Failed to create collator for sorting - check collator preferences and options",
            ErrorKind::InvalidArgument,
        )
    })
}

/// A stream yielding the documents of an upstream iterator in sort order.
///
/// Sort keys are compared left to right. A missing sort field compares as
/// null, so it sorts before every present value in ascending order. The
/// sort is stable: documents equal on every key keep their upstream order.
pub(crate) struct SortedStream {
    sorted: std::vec::IntoIter<Document>,
}

impl SortedStream {
    pub fn new<I: Iterator<Item = Document>>(
        raw_stream: I,
        sort_order: &[(String, SortOrder)],
        separator: &str,
        collator: Option<&CollatorBorrowed<'_>>,
    ) -> Self {
        let keys: Vec<(FieldPath, SortOrder)> = sort_order
            .iter()
            .map(|(field, order)| (split_path(field, separator), *order))
            .collect();

        let mut documents = raw_stream.collect::<Vec<Document>>();
        // slice::sort_by is stable
        documents.sort_by(|a, b| compare_documents(a, b, &keys, collator));

        SortedStream {
            sorted: documents.into_iter(),
        }
    }
}

impl Iterator for SortedStream {
    type Item = Document;

    fn next(&mut self) -> Option<Self::Item> {
        self.sorted.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.sorted.size_hint()
    }
}

static NULL: Value = Value::Null;

fn compare_documents(
    a: &Document,
    b: &Document,
    keys: &[(FieldPath, SortOrder)],
    collator: Option<&CollatorBorrowed<'_>>,
) -> Ordering {
    for (path, order) in keys {
        let a_value = a.get_path(path).unwrap_or(&NULL);
        let b_value = b.get_path(path).unwrap_or(&NULL);

        let cmp = match (a_value, b_value, collator) {
            (Value::String(a), Value::String(b), Some(collator)) => collator.compare(a, b),
            _ => a_value.cmp(b_value),
        };

        if cmp != Ordering::Equal {
            return match order {
                SortOrder::Ascending => cmp,
                SortOrder::Descending => cmp.reverse(),
            };
        }
    }
    Ordering::Equal
}
