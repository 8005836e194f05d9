//! Generic document-store adapter shared by the domain repositories.

use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{self, Binary, Bson, Document, doc, spec::BinarySubtype},
    error::{ErrorKind, WriteFailure},
    options::ReturnDocument,
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::bulk::{DEFAULT_BULK_BATCH_SIZE, insert_in_batches, without_failed};

/// Field stamped on every partial update.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

const DUPLICATE_KEY_CODE: i32 = 11000;

/// An entity persisted in its own collection, keyed by a UUID `_id`.
pub trait MongoDocument: Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;

    fn set_id(&mut self, id: Uuid);
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("No document in '{collection}' matches {filter}")]
    NotFound {
        collection: &'static str,
        filter: String,
    },

    #[error("Duplicate key: {0}")]
    Duplicate(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("MongoDB error: {0}")]
    Database(mongodb::error::Error),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

impl From<mongodb::error::Error> for DocumentError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            DocumentError::Duplicate(err.to_string())
        } else {
            DocumentError::Database(err)
        }
    }
}

impl From<bson::ser::Error> for DocumentError {
    fn from(err: bson::ser::Error) -> Self {
        DocumentError::Serialization(err.to_string())
    }
}

impl From<bson::de::Error> for DocumentError {
    fn from(err: bson::de::Error) -> Self {
        DocumentError::Serialization(err.to_string())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::InsertMany(e) => e
            .write_errors
            .as_ref()
            .is_some_and(|errors| errors.iter().all(|w| w.code == DUPLICATE_KEY_CODE)),
        _ => false,
    }
}

/// Positions of the documents the server refused in an unordered insert.
///
/// `None` when the failure is not confined to individual documents.
fn rejected_indices(err: &mongodb::error::Error) -> Option<Vec<usize>> {
    match err.kind.as_ref() {
        ErrorKind::InsertMany(failure) if failure.write_concern_error.is_none() => Some(
            failure
                .write_errors
                .iter()
                .flatten()
                .map(|w| {
                    warn!(index = w.index, code = w.code, message = %w.message, "Bulk item rejected");
                    w.index
                })
                .collect(),
        ),
        _ => None,
    }
}

/// BSON form of a UUID as the driver's serializer writes it (generic binary).
///
/// Use this when building filters so they match stored `_id`/reference fields.
pub fn uuid_bson(id: Uuid) -> Bson {
    Bson::Binary(Binary {
        subtype: BinarySubtype::Generic,
        bytes: id.as_bytes().to_vec(),
    })
}

/// Decode a document the way the driver decodes cursor results.
///
/// Going through the raw BSON codec keeps binary UUIDs readable by
/// `uuid::Uuid`'s non-human-readable deserializer.
pub fn decode_document<T: DeserializeOwned>(doc: &Document) -> DocumentResult<T> {
    let bytes = bson::to_vec(doc)?;
    Ok(bson::from_slice(&bytes)?)
}

/// Encode a value the way the driver encodes inserted documents.
///
/// Partial updates built with this keep UUID fields binary, matching
/// what `insert_one` stored.
pub fn encode_document<T: Serialize>(value: &T) -> DocumentResult<Document> {
    let bytes = bson::to_vec(value)?;
    Ok(bson::from_slice(&bytes)?)
}

/// Filter selecting a single document by id.
pub fn id_filter(id: Uuid) -> Document {
    doc! { "_id": uuid_bson(id) }
}

/// CRUD plus batched bulk insert over `Collection<T>`.
pub struct MongoRepository<T: MongoDocument> {
    collection: Collection<T>,
    bulk_batch_size: usize,
}

impl<T: MongoDocument> Clone for MongoRepository<T> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            bulk_batch_size: self.bulk_batch_size,
        }
    }
}

impl<T: MongoDocument> MongoRepository<T> {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<T>(T::COLLECTION),
            bulk_batch_size: DEFAULT_BULK_BATCH_SIZE,
        }
    }

    pub fn with_bulk_batch_size(mut self, size: usize) -> Self {
        self.bulk_batch_size = size.max(1);
        self
    }

    pub fn bulk_batch_size(&self) -> usize {
        self.bulk_batch_size
    }

    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    fn not_found(&self, filter: &Document) -> DocumentError {
        warn!(collection = T::COLLECTION, filter = %filter, "Document not found");
        DocumentError::NotFound {
            collection: T::COLLECTION,
            filter: filter.to_string(),
        }
    }

    /// Assign a fresh id and insert.
    #[instrument(skip_all, fields(collection = T::COLLECTION))]
    pub async fn create(&self, mut doc: T) -> DocumentResult<T> {
        doc.set_id(Uuid::now_v7());
        self.collection.insert_one(&doc).await?;
        info!(id = %doc.id(), "Document created");
        Ok(doc)
    }

    /// Assign ids and insert in sequential, unordered batches.
    ///
    /// Documents rejected by the server (duplicate keys and other write
    /// errors) are left out of the result; anything else aborts.
    #[instrument(skip_all, fields(collection = T::COLLECTION, count = docs.len()))]
    pub async fn bulk_create(&self, mut docs: Vec<T>) -> DocumentResult<Vec<T>> {
        for doc in docs.iter_mut() {
            doc.set_id(Uuid::now_v7());
        }

        let collection = self.collection.clone();
        insert_in_batches(docs, self.bulk_batch_size, move |batch| {
            let collection = collection.clone();
            async move {
                match collection.insert_many(&batch).ordered(false).await {
                    Ok(_) => Ok(batch),
                    Err(err) => match rejected_indices(&err) {
                        Some(failed) => Ok(without_failed(batch, &failed)),
                        None => Err(DocumentError::Database(err)),
                    },
                }
            }
        })
        .await
    }

    /// First document matching `filter`.
    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn find_one(&self, filter: Document) -> DocumentResult<T> {
        match self.collection.find_one(filter.clone()).await? {
            Some(doc) => Ok(doc),
            None => Err(self.not_found(&filter)),
        }
    }

    /// All documents matching `filter`, in natural order.
    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn find(&self, filter: Document) -> DocumentResult<Vec<T>> {
        let cursor = self.collection.find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    /// `$set` the given fields (plus `updatedAt`) and return the updated document.
    #[instrument(skip(self, partial), fields(collection = T::COLLECTION))]
    pub async fn update(&self, filter: Document, mut partial: Document) -> DocumentResult<T> {
        partial.insert(UPDATED_AT_FIELD, bson::DateTime::now());

        let updated = self
            .collection
            .find_one_and_update(filter.clone(), doc! { "$set": partial })
            .return_document(ReturnDocument::After)
            .await?;

        updated.ok_or_else(|| self.not_found(&filter))
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn delete(&self, filter: Document) -> DocumentResult<bool> {
        match self.collection.find_one_and_delete(filter.clone()).await? {
            Some(doc) => {
                info!(id = %doc.id(), "Document deleted");
                Ok(true)
            }
            None => Err(self.not_found(&filter)),
        }
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn count_documents(&self, filter: Document) -> DocumentResult<u64> {
        Ok(self.collection.count_documents(filter).await?)
    }

    /// Run an aggregation pipeline, collecting raw result documents.
    #[instrument(skip_all, fields(collection = T::COLLECTION, stages = pipeline.len()))]
    pub async fn aggregate(&self, pipeline: Vec<Document>) -> DocumentResult<Vec<Document>> {
        let cursor = self.collection.aggregate(pipeline).await?;
        Ok(cursor.try_collect().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Sample {
        #[serde(rename = "_id")]
        id: Uuid,
        name: String,
    }

    #[test]
    fn test_uuid_bson_matches_driver_serialization() {
        let id = Uuid::now_v7();
        let bytes = bson::to_vec(&Sample {
            id,
            name: "sample".to_string(),
        })
        .unwrap();
        let stored: Document = bson::from_slice(&bytes).unwrap();
        assert_eq!(stored.get("_id"), Some(&uuid_bson(id)));
    }

    #[test]
    fn test_decode_document_reads_binary_uuid() {
        let id = Uuid::now_v7();
        let doc = doc! { "_id": uuid_bson(id), "name": "sample" };
        let sample: Sample = decode_document(&doc).unwrap();
        assert_eq!(
            sample,
            Sample {
                id,
                name: "sample".to_string()
            }
        );
    }

    #[test]
    fn test_encode_document_keeps_uuid_binary() {
        let id = Uuid::now_v7();
        let doc = encode_document(&Sample {
            id,
            name: "sample".to_string(),
        })
        .unwrap();
        assert_eq!(doc.get("_id"), Some(&uuid_bson(id)));
        assert_eq!(doc.get_str("name").unwrap(), "sample");
    }

    #[test]
    fn test_id_filter_targets_underscore_id() {
        let id = Uuid::now_v7();
        let filter = id_filter(id);
        assert_eq!(filter.get("_id"), Some(&uuid_bson(id)));
    }

    #[test]
    fn test_not_found_message_names_collection() {
        let err = DocumentError::NotFound {
            collection: "products",
            filter: "{ \"sku\": \"X\" }".to_string(),
        };
        assert!(err.to_string().contains("'products'"));
    }
}
