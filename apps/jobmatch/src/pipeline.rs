//! Recommendation pipeline — runs one query end to end.
//!
//! Flow: acquire connection → find_all → (empty? stop) → render → generate →
//!       release connection.
//!
//! The connection is released exactly once on every path after a successful
//! acquire. Nothing is released when acquire fails.

use std::fmt;
use std::sync::Arc;

use mongodb::bson::Document;
use tracing::{debug, error, info};

use crate::db::{ConnectionManager, StoreConnection};
use crate::errors::AppError;
use crate::jobs::formatter;
use crate::jobs::repository::JobRepository;
use crate::llm_client::RecommendationClient;

/// Reported when the collection holds no listings.
pub const NO_OPENINGS_MESSAGE: &str = "No job openings found.";

/// Pipeline stages, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Connecting,
    Fetching,
    Empty,
    Composing,
    Generating,
    Disconnecting,
    Done,
    Failed,
}

/// Successful result of one invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The store returned no listings; the model was not called.
    NoOpenings,
    /// The model's reply, verbatim.
    Recommendation(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::NoOpenings => f.write_str(NO_OPENINGS_MESSAGE),
            Outcome::Recommendation(text) => write!(f, "Assistant Response:\n{text}"),
        }
    }
}

pub struct Orchestrator {
    connections: Arc<dyn ConnectionManager>,
    recommender: Arc<dyn RecommendationClient>,
    collection: String,
}

impl Orchestrator {
    pub fn new(
        connections: Arc<dyn ConnectionManager>,
        recommender: Arc<dyn RecommendationClient>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            connections,
            recommender,
            collection: collection.into(),
        }
    }

    /// Runs the pipeline for one literal query.
    pub async fn run(&self, query: &str) -> Result<Outcome, AppError> {
        transition(Stage::Idle, Stage::Connecting);
        let connection = match self.connections.acquire().await {
            Ok(c) => c,
            Err(e) => {
                error!(code = e.code(), "Connecting failed: {e}");
                transition(Stage::Connecting, Stage::Failed);
                return Err(e);
            }
        };

        let (last, result) = self.run_connected(connection.as_ref(), query).await;

        transition(last, Stage::Disconnecting);
        connection.release().await;

        match &result {
            Ok(_) => transition(Stage::Disconnecting, Stage::Done),
            Err(e) => {
                error!(code = e.code(), "Pipeline failed during {last:?}: {e}");
                transition(Stage::Disconnecting, Stage::Failed);
            }
        }
        result
    }

    /// Every fallible step after acquire. Returns the stage it stopped in.
    async fn run_connected(
        &self,
        connection: &dyn StoreConnection,
        query: &str,
    ) -> (Stage, Result<Outcome, AppError>) {
        transition(Stage::Connecting, Stage::Fetching);
        let repository = JobRepository::new(connection, self.collection.as_str());
        let listings = match repository.find_all(Document::new()).await {
            Ok(l) => l,
            Err(e) => return (Stage::Fetching, Err(e)),
        };

        if listings.is_empty() {
            transition(Stage::Fetching, Stage::Empty);
            info!("No job openings found; skipping model call");
            return (Stage::Empty, Ok(Outcome::NoOpenings));
        }

        transition(Stage::Fetching, Stage::Composing);
        let context = formatter::render(&listings);

        transition(Stage::Composing, Stage::Generating);
        info!(
            "Requesting recommendation over {} listings",
            listings.len()
        );
        match self.recommender.generate(&context, query).await {
            Ok(text) => (Stage::Generating, Ok(Outcome::Recommendation(text))),
            Err(e) => (Stage::Generating, Err(e)),
        }
    }
}

fn transition(from: Stage, to: Stage) {
    debug!(?from, ?to, "pipeline transition");
}
