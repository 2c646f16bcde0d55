use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use bson::{Bson, Document};
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::messages;
use crate::repositories::{DocumentStore, Entity};

/// In-memory document store for tests and local runs
///
/// Documents are kept in their BSON form so filters and sorts are evaluated
/// against the same field names MongoDB would see.
pub struct InMemoryStore<T: Entity> {
    docs: Arc<RwLock<Vec<Document>>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> InMemoryStore<T> {
    pub fn new() -> Self {
        Self {
            docs: Arc::new(RwLock::new(Vec::new())),
            _entity: PhantomData,
        }
    }

    /// Reject a document that shares `_id` or a unique key with another one
    fn check_unique(docs: &[Document], candidate: &Document, skip: Option<usize>) -> AppResult<()> {
        let clash = docs.iter().enumerate().any(|(index, existing)| {
            if Some(index) == skip {
                return false;
            }
            if skip.is_none() && existing.get("_id") == candidate.get("_id") {
                return true;
            }
            T::UNIQUE_KEYS.iter().any(|key| match candidate.get(*key) {
                Some(value) if *value != Bson::Null => existing.get(*key) == Some(value),
                _ => false,
            })
        });

        if clash {
            return Err(AppError::Conflict(messages::DUPLICATE_ENTRY.to_string()));
        }

        Ok(())
    }
}

impl<T: Entity> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> DocumentStore<T> for InMemoryStore<T> {
    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }

    async fn insert(&self, entity: &T) -> AppResult<()> {
        let document = bson::to_document(entity)?;
        let mut docs = self.docs.write().await;

        Self::check_unique(&docs, &document, None)?;
        docs.push(document);

        Ok(())
    }

    async fn find_one(&self, filter: Document) -> AppResult<Option<T>> {
        let docs = self.docs.read().await;

        match docs.iter().find(|doc| matches(doc, &filter)) {
            Some(doc) => Ok(Some(bson::from_document(doc.clone())?)),
            None => Ok(None),
        }
    }

    async fn find(&self, filter: Document, sort: Document) -> AppResult<Vec<T>> {
        let docs = self.docs.read().await;

        let mut found: Vec<&Document> = docs.iter().filter(|doc| matches(doc, &filter)).collect();
        found.sort_by(|a, b| compare_documents(a, b, &sort));

        found
            .into_iter()
            .map(|doc| bson::from_document(doc.clone()).map_err(AppError::from))
            .collect()
    }

    async fn replace(&self, entity: &T) -> AppResult<bool> {
        let document = bson::to_document(entity)?;
        let mut docs = self.docs.write().await;

        let Some(index) = docs
            .iter()
            .position(|doc| doc.get("_id") == document.get("_id"))
        else {
            return Ok(false);
        };

        Self::check_unique(&docs, &document, Some(index))?;
        docs[index] = document;

        Ok(true)
    }

    async fn delete_one(&self, filter: Document) -> AppResult<Option<T>> {
        let mut docs = self.docs.write().await;

        match docs.iter().position(|doc| matches(doc, &filter)) {
            Some(index) => {
                let removed = docs.remove(index);
                Ok(Some(bson::from_document(removed)?))
            }
            None => Ok(None),
        }
    }
}

/// Top-level equality match, the subset of the query language the repositories use
fn matches(doc: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| doc.get(key).unwrap_or(&Bson::Null) == expected)
}

fn compare_documents(a: &Document, b: &Document, sort: &Document) -> Ordering {
    for (key, direction) in sort {
        let descending = match direction {
            Bson::Int32(d) => *d < 0,
            Bson::Int64(d) => *d < 0,
            Bson::Double(d) => *d < 0.0,
            _ => false,
        };

        let ordering = compare_values(a.get(key), b.get(key));
        let ordering = if descending { ordering.reverse() } else { ordering };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    Ordering::Equal
}

// MongoDB's cross-type ordering: null < numbers < strings < objects < arrays
// < ObjectId < booleans < dates
fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) => 0,
        Some(Bson::Int32(_)) | Some(Bson::Int64(_)) | Some(Bson::Double(_)) => 1,
        Some(Bson::String(_)) => 2,
        Some(Bson::Document(_)) => 3,
        Some(Bson::Array(_)) => 4,
        Some(Bson::ObjectId(_)) => 5,
        Some(Bson::Boolean(_)) => 6,
        Some(Bson::DateTime(_)) => 7,
        Some(_) => 8,
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

fn compare_values(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }

    match (a, b) {
        (Some(Bson::String(x)), Some(Bson::String(y))) => x.cmp(y),
        (Some(Bson::ObjectId(x)), Some(Bson::ObjectId(y))) => x.cmp(y),
        (Some(Bson::Boolean(x)), Some(Bson::Boolean(y))) => x.cmp(y),
        (Some(Bson::DateTime(x)), Some(Bson::DateTime(y))) => x.cmp(y),
        (Some(x), Some(y)) => match (as_number(x), as_number(y)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn matches_on_equality() {
        let doc = doc! { "name": "Rust", "displayOrder": 1 };

        assert!(matches(&doc, &doc! {}));
        assert!(matches(&doc, &doc! { "name": "Rust" }));
        assert!(!matches(&doc, &doc! { "name": "Go" }));
        assert!(matches(&doc, &doc! { "missing": Bson::Null }));
    }

    #[test]
    fn sorts_ascending_then_descending() {
        let a = doc! { "displayOrder": 0, "name": "Vue" };
        let b = doc! { "displayOrder": 0, "name": "Angular" };
        let c = doc! { "displayOrder": -1, "name": "Zig" };

        let sort = doc! { "displayOrder": 1, "name": 1 };
        let mut docs = vec![&a, &b, &c];
        docs.sort_by(|x, y| compare_documents(x, y, &sort));
        let names: Vec<_> = docs.iter().map(|d| d.get_str("name").unwrap()).collect();
        assert_eq!(names, vec!["Zig", "Angular", "Vue"]);

        let sort = doc! { "name": -1 };
        docs.sort_by(|x, y| compare_documents(x, y, &sort));
        let names: Vec<_> = docs.iter().map(|d| d.get_str("name").unwrap()).collect();
        assert_eq!(names, vec!["Zig", "Vue", "Angular"]);
    }

    #[test]
    fn missing_fields_sort_first() {
        let with = doc! { "startDate": bson::DateTime::from_millis(10) };
        let without = doc! {};

        assert_eq!(
            compare_values(without.get("startDate"), with.get("startDate")),
            Ordering::Less
        );
    }

    #[test]
    fn mixed_integer_widths_compare_numerically() {
        assert_eq!(
            compare_values(Some(&Bson::Int32(5)), Some(&Bson::Int64(3))),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(Some(&Bson::Double(2.5)), Some(&Bson::Int32(2))),
            Ordering::Greater
        );
    }
}
