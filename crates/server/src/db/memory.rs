//! In-process document store.
//!
//! Evaluates the subset of the query language the list builder emits:
//! equality and `$gt`/`$gte`/`$lt`/`$lte` filters, single-level sort
//! keys, and inclusion/exclusion projections. Updates follow `$set`:
//! dotted paths nest, and `$`-prefixed or `_id` paths are rejected.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use shop_core::{DocumentId, FindSpec};
use tokio::sync::RwLock;

use super::{DocumentStore, StoreError};

const ID_FIELD: &str = "_id";

/// Document store held entirely in memory
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: &str, spec: FindSpec) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let mut docs: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches_filter(doc, &spec.filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(collections);

        if let Some(ref sort) = spec.sort {
            docs.sort_by(|a, b| compare_by(a, b, sort));
        }
        if let Some(ref projection) = spec.projection {
            docs = docs.into_iter().map(|doc| project(doc, projection)).collect();
        }
        Ok(docs)
    }

    async fn find_one(
        &self,
        collection: &str,
        id: DocumentId,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| has_id(doc, id)))
            .cloned())
    }

    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<DocumentId, StoreError> {
        let id = DocumentId::new();

        // _id leads, as the server stores it
        let mut stored = Document::new();
        stored.insert(ID_FIELD, id.object_id());
        for (key, value) in document {
            if key != ID_FIELD {
                stored.insert(key, value);
            }
        }

        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(stored);
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Document,
    ) -> Result<u64, StoreError> {
        for path in fields.keys() {
            check_update_path(path)?;
        }

        let mut collections = self.collections.write().await;
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| has_id(doc, id)))
        else {
            return Ok(0);
        };

        // All-or-nothing per document
        let mut updated = doc.clone();
        for (path, value) in fields {
            set_path(&mut updated, &path, value)?;
        }
        *doc = updated;
        Ok(1)
    }

    async fn delete_one(&self, collection: &str, id: DocumentId) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };

        match docs.iter().position(|doc| has_id(doc, id)) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

/// `$set` paths: dotted segments, none empty or `$`-prefixed, never `_id`
fn check_update_path(path: &str) -> Result<(), StoreError> {
    if path.split('.').next() == Some(ID_FIELD) {
        return Err(StoreError::Rejected(
            "the _id field is immutable".to_string(),
        ));
    }
    if path.split('.').any(|segment| segment.is_empty() || segment.starts_with('$')) {
        return Err(StoreError::Rejected(format!("invalid update path {path:?}")));
    }
    Ok(())
}

/// Set a dotted path, creating intermediate documents as needed.
fn set_path(doc: &mut Document, path: &str, value: Bson) -> Result<(), StoreError> {
    let Some((head, rest)) = path.split_once('.') else {
        doc.insert(path, value);
        return Ok(());
    };

    if !doc.contains_key(head) {
        doc.insert(head, Document::new());
    }
    match doc.get_mut(head) {
        Some(Bson::Document(child)) => set_path(child, rest, value),
        _ => Err(StoreError::Rejected(format!(
            "cannot create field {rest:?} in non-document {head:?}"
        ))),
    }
}

fn has_id(doc: &Document, id: DocumentId) -> bool {
    doc.get_object_id(ID_FIELD)
        .is_ok_and(|oid| oid == id.object_id())
}

fn matches_filter(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, condition)| {
        let value = doc.get(key);
        match condition {
            Bson::Document(ops) if ops.keys().all(|k| k.starts_with('$')) => ops
                .iter()
                .all(|(op, operand)| matches_operator(value, op, operand)),
            expected => value.is_some_and(|v| values_equal(v, expected)),
        }
    })
}

fn matches_operator(value: Option<&Bson>, op: &str, operand: &Bson) -> bool {
    let Some(value) = value else {
        return false;
    };
    let Some(ordering) = compare_values(value, operand) else {
        return false;
    };
    match op {
        "$eq" => ordering == Ordering::Equal,
        "$ne" => ordering != Ordering::Equal,
        "$gt" => ordering == Ordering::Greater,
        "$gte" => ordering != Ordering::Less,
        "$lt" => ordering == Ordering::Less,
        "$lte" => ordering != Ordering::Greater,
        _ => false,
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(i) => Some(f64::from(*i)),
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}

fn values_equal(a: &Bson, b: &Bson) -> bool {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Compare two values of comparable types. `None` when they are not
/// comparable (different types, or NaN involved).
fn compare_values(a: &Bson, b: &Bson) -> Option<Ordering> {
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        _ => as_number(a)?.partial_cmp(&as_number(b)?),
    }
}

/// Missing and null sort first, then numbers, then strings, then the rest
fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) => 0,
        Some(Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_)) => 1,
        Some(Bson::String(_)) => 2,
        Some(_) => 3,
    }
}

fn compare_by(a: &Document, b: &Document, sort: &Document) -> Ordering {
    for (key, direction) in sort {
        let (x, y) = (a.get(key), b.get(key));
        let ordering = type_rank(x).cmp(&type_rank(y)).then_with(|| match (x, y) {
            (Some(x), Some(y)) => compare_values(x, y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        });
        let ordering = if as_number(direction).is_some_and(|d| d < 0.0) {
            ordering.reverse()
        } else {
            ordering
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn is_included(flag: &Bson) -> bool {
    match flag {
        Bson::Boolean(b) => *b,
        other => as_number(other).is_some_and(|n| n != 0.0),
    }
}

fn project(doc: Document, projection: &Document) -> Document {
    let keep_id = projection.get(ID_FIELD).is_none_or(is_included);
    let included: Vec<&str> = projection
        .iter()
        .filter(|(key, flag)| *key != ID_FIELD && is_included(flag))
        .map(|(key, _)| key.as_str())
        .collect();

    doc.into_iter()
        .filter(|(key, _)| {
            if key == ID_FIELD {
                keep_id
            } else if included.is_empty() {
                // exclusion mode
                projection.get(key).is_none_or(is_included)
            } else {
                included.contains(&key.as_str())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        for (name, price, category) in [
            ("Dune", 12.5, "books"),
            ("Lamp", 30.0, "home"),
            ("Emma", 8.0, "books"),
            ("Atlas", 45.0, "books"),
        ] {
            store
                .insert_one("products", doc! { "name": name, "price": price, "category": category })
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn insert_assigns_leading_id() {
        let store = MemoryStore::new();
        let id = store
            .insert_one("items", doc! { "name": "lamp" })
            .await
            .unwrap();

        let doc = store.find_one("items", id).await.unwrap().unwrap();
        assert_eq!(doc.keys().next().map(String::as_str), Some("_id"));
        assert_eq!(doc.get_object_id("_id").unwrap(), id.object_id());
        assert_eq!(doc.get_str("name").unwrap(), "lamp");
    }

    #[tokio::test]
    async fn filter_sort_and_project() {
        let store = seeded().await;
        let spec = FindSpec {
            filter: doc! { "category": "books", "price": { "$gte": 10.0 } },
            sort: Some(doc! { "price": 1 }),
            projection: Some(doc! { "name": 1, "price": 1, "_id": 0 }),
        };

        let docs = store.find("products", spec).await.unwrap();
        assert_eq!(
            docs,
            vec![
                doc! { "name": "Dune", "price": 12.5 },
                doc! { "name": "Atlas", "price": 45.0 },
            ]
        );
    }

    #[tokio::test]
    async fn nan_bound_matches_nothing() {
        let store = seeded().await;
        let spec = FindSpec {
            filter: doc! { "price": { "$gte": f64::NAN } },
            ..FindSpec::all()
        };
        assert!(store.find("products", spec).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn numeric_equality_ignores_width() {
        let store = MemoryStore::new();
        store
            .insert_one("products", doc! { "price": 10_i32 })
            .await
            .unwrap();
        let spec = FindSpec {
            filter: doc! { "price": 10.0 },
            ..FindSpec::all()
        };
        assert_eq!(store.find("products", spec).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let store = MemoryStore::new();
        let id = store
            .insert_one("products", doc! { "name": "Dune", "price": 10.0, "category": "books" })
            .await
            .unwrap();

        let matched = store
            .update_one("products", id, doc! { "price": 9.99 })
            .await
            .unwrap();
        assert_eq!(matched, 1);

        let doc = store.find_one("products", id).await.unwrap().unwrap();
        assert_eq!(doc.get_f64("price").unwrap(), 9.99);
        assert_eq!(doc.get_str("name").unwrap(), "Dune");
        assert_eq!(doc.get_str("category").unwrap(), "books");
    }

    #[tokio::test]
    async fn update_rejects_id_change() {
        let store = MemoryStore::new();
        let id = store.insert_one("items", doc! { "name": "a" }).await.unwrap();
        let err = store
            .update_one("items", id, doc! { "_id": DocumentId::new().object_id() })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
    }

    #[tokio::test]
    async fn update_rejects_operator_paths() {
        let store = MemoryStore::new();
        let id = store.insert_one("items", doc! { "name": "a" }).await.unwrap();

        for fields in [
            doc! { "$inc": 1 },
            doc! { "meta.$x": 1 },
            doc! { "a..b": 1 },
            doc! { "_id.x": 1 },
        ] {
            let err = store.update_one("items", id, fields).await.unwrap_err();
            assert!(matches!(err, StoreError::Rejected(_)));
        }

        let doc = store.find_one("items", id).await.unwrap().unwrap();
        assert_eq!(doc.len(), 2);
    }

    #[tokio::test]
    async fn update_sets_dotted_paths() {
        let store = MemoryStore::new();
        let id = store
            .insert_one("items", doc! { "name": "a", "meta": { "color": "red" } })
            .await
            .unwrap();

        store
            .update_one("items", id, doc! { "meta.size": 3, "dims.w": 2 })
            .await
            .unwrap();
        let doc = store.find_one("items", id).await.unwrap().unwrap();
        assert_eq!(
            doc.get_document("meta").unwrap(),
            &doc! { "color": "red", "size": 3 }
        );
        assert_eq!(doc.get_document("dims").unwrap(), &doc! { "w": 2 });

        // A scalar in the way fails the whole update
        let err = store
            .update_one("items", id, doc! { "tag": "x", "name.first": "b" })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
        let doc = store.find_one("items", id).await.unwrap().unwrap();
        assert!(!doc.contains_key("tag"));
        assert_eq!(doc.get_str("name").unwrap(), "a");
    }

    #[tokio::test]
    async fn delete_removes_exactly_once() {
        let store = MemoryStore::new();
        let id = store.insert_one("items", doc! { "name": "a" }).await.unwrap();
        store.insert_one("items", doc! { "name": "b" }).await.unwrap();

        assert_eq!(store.delete_one("items", id).await.unwrap(), 1);
        assert_eq!(store.delete_one("items", id).await.unwrap(), 0);
        assert_eq!(store.find("items", FindSpec::all()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_collection_is_empty() {
        let store = MemoryStore::new();
        assert!(store.find("nothing", FindSpec::all()).await.unwrap().is_empty());
        let matched = store
            .update_one("nothing", DocumentId::new(), doc! { "a": 1 })
            .await
            .unwrap();
        assert_eq!(matched, 0);
    }
}
