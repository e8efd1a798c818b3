//! Job Repository — reads listings from one named collection.

use mongodb::bson::Document;
use tracing::{error, info};

use crate::db::StoreConnection;
use crate::errors::AppError;
use crate::models::job::JobListing;

pub struct JobRepository<'a> {
    connection: &'a dyn StoreConnection,
    collection: String,
}

impl<'a> JobRepository<'a> {
    pub fn new(connection: &'a dyn StoreConnection, collection: impl Into<String>) -> Self {
        Self {
            connection,
            collection: collection.into(),
        }
    }

    /// Returns every listing matching `filter`, in the order the store yields them.
    /// An empty filter means all listings.
    pub async fn find_all(&self, filter: Document) -> Result<Vec<JobListing>, AppError> {
        if self.collection.trim().is_empty() {
            error!("Error fetching jobs: collection name is not set");
            return Err(AppError::Query(
                "COLLECTION_NAME environment variable is not set".to_string(),
            ));
        }

        match self.connection.find(&self.collection, filter).await {
            Ok(listings) => {
                info!(
                    "Fetched {} listings from '{}'",
                    listings.len(),
                    self.collection
                );
                Ok(listings)
            }
            Err(e) => {
                error!("Error fetching jobs: {e}");
                Err(match e {
                    AppError::Query(_) => e,
                    other => AppError::Query(other.to_string()),
                })
            }
        }
    }
}
