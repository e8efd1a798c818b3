//! Document store connection lifecycle.
//!
//! A connection is acquired once per invocation and released exactly once by
//! the pipeline. `release` never fails past its caller.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::error::ErrorKind;
use mongodb::{Client, Database};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::job::JobListing;

/// URI schemes the store driver accepts.
pub const ACCEPTED_SCHEMES: [&str; 2] = ["mongodb://", "mongodb+srv://"];

/// Opens connections to the document store.
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn StoreConnection>, AppError>;
}

/// An open, exclusively owned connection handle.
#[async_trait]
pub trait StoreConnection: Send + Sync {
    /// Runs `filter` against `collection` and returns documents in store order.
    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<JobListing>, AppError>;

    /// Closes the connection. Problems are logged, never returned.
    async fn release(&self);
}

/// Checks the connection target before the driver ever sees it.
pub fn validate_store_uri(uri: &str) -> Result<(), AppError> {
    if uri.trim().is_empty() {
        return Err(AppError::Configuration(
            "MONGODB_URI environment variable is not set".to_string(),
        ));
    }
    if !ACCEPTED_SCHEMES.iter().any(|scheme| uri.starts_with(scheme)) {
        return Err(AppError::Configuration(
            "Invalid MongoDB URI format. URI must start with \"mongodb://\" or \"mongodb+srv://\""
                .to_string(),
        ));
    }
    Ok(())
}

/// MongoDB-backed connection manager.
pub struct MongoConnectionManager {
    uri: String,
    db_name: String,
}

impl MongoConnectionManager {
    pub fn new(uri: impl Into<String>, db_name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            db_name: db_name.into(),
        }
    }
}

#[async_trait]
impl ConnectionManager for MongoConnectionManager {
    async fn acquire(&self) -> Result<Box<dyn StoreConnection>, AppError> {
        validate_store_uri(&self.uri)?;
        if self.db_name.trim().is_empty() {
            return Err(AppError::Configuration(
                "DB_NAME environment variable is not set".to_string(),
            ));
        }

        info!("Connecting to MongoDB...");

        let client = Client::with_uri_str(&self.uri).await.map_err(|e| {
            error!("MongoDB connection error: {e}");
            match *e.kind {
                ErrorKind::InvalidArgument { .. } => {
                    AppError::Configuration(format!("Invalid MongoDB URI: {e}"))
                }
                _ => AppError::Connection(e.to_string()),
            }
        })?;

        // The driver connects lazily; ping forces the handshake now.
        let database = client.database(&self.db_name);
        if let Err(e) = database.run_command(doc! { "ping": 1 }, None).await {
            error!("MongoDB connection error: {e}");
            client.shutdown().await;
            return Err(AppError::Connection(e.to_string()));
        }

        info!("Connected to MongoDB");
        Ok(Box::new(MongoConnection { client, database }))
    }
}

struct MongoConnection {
    client: Client,
    database: Database,
}

#[async_trait]
impl StoreConnection for MongoConnection {
    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<JobListing>, AppError> {
        let cursor = self
            .database
            .collection::<JobListing>(collection)
            .find(filter, None)
            .await
            .map_err(|e| AppError::Query(format!("find on '{collection}' failed: {e}")))?;

        cursor
            .try_collect::<Vec<JobListing>>()
            .await
            .map_err(|e| AppError::Query(format!("reading '{collection}' failed: {e}")))
    }

    async fn release(&self) {
        // `shutdown` waits for in-flight operations and cannot fail.
        self.client.clone().shutdown().await;
        info!("Disconnected from MongoDB");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_both_mongodb_schemes() {
        assert!(validate_store_uri("mongodb://localhost:27017").is_ok());
        assert!(validate_store_uri("mongodb+srv://cluster0.example.net/careers").is_ok());
    }

    #[test]
    fn test_rejects_http_scheme() {
        let err = validate_store_uri("http://localhost:27017").unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn test_rejects_empty_uri() {
        assert!(matches!(
            validate_store_uri(""),
            Err(AppError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_acquire_with_bad_scheme_fails_before_network() {
        let manager = MongoConnectionManager::new("http://localhost:27017", "careers");
        assert!(matches!(
            manager.acquire().await,
            Err(AppError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_acquire_without_database_name_is_configuration_error() {
        let manager = MongoConnectionManager::new("mongodb://localhost:27017", " ");
        assert!(matches!(
            manager.acquire().await,
            Err(AppError::Configuration(_))
        ));
    }
}
