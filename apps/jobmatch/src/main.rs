mod config;
mod db;
mod errors;
mod jobs;
mod llm_client;
mod models;
mod pipeline;

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::MongoConnectionManager;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::pipeline::Orchestrator;

/// Used when no query is given on the command line.
const DEFAULT_QUERY: &str = "jobs in gurgaon";

#[tokio::main]
async fn main() -> ExitCode {
    let result = run().await;
    report(result, &mut std::io::stderr().lock())
}

/// Writes the single top-level diagnostic for a failed invocation.
/// Components have already logged the cause where it happened.
fn report(result: Result<(), AppError>, err_out: &mut impl Write) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = writeln!(err_out, "Application error [{}]: {e}", e.code());
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AppError> {
    // Load configuration first; nothing touches the network until this succeeds
    let config = Config::from_env()?;

    // Initialize structured logging. Logs go to stderr so stdout carries only the answer.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting jobmatch v{}", env!("CARGO_PKG_VERSION"));

    let query = query_from_args(std::env::args_os().skip(1));
    info!("Query: {query:?}");

    let connections = Arc::new(MongoConnectionManager::new(
        config.mongodb_uri.clone(),
        config.db_name.clone(),
    ));
    let llm = Arc::new(LlmClient::new(config.openai_api_key.clone())?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let orchestrator = Orchestrator::new(connections, llm, config.collection_name.clone());
    let outcome = orchestrator.run(&query).await?;

    println!("{outcome}");
    Ok(())
}

/// Joins the command-line words into one literal query.
/// Invalid UTF-8 is replaced rather than rejected.
fn query_from_args<I>(args: I) -> String
where
    I: IntoIterator<Item = OsString>,
{
    let query = args
        .into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    if query.trim().is_empty() {
        DEFAULT_QUERY.to_string()
    } else {
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(words: &[&str]) -> Vec<OsString> {
        words.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_words_are_joined_into_one_query() {
        assert_eq!(
            query_from_args(args(&["jobs", "in", "gurgaon"])),
            "jobs in gurgaon"
        );
    }

    #[test]
    fn test_quoted_query_is_passed_through_unmodified() {
        assert_eq!(
            query_from_args(args(&["  Senior  Rust roles, >20 LPA?"])),
            "  Senior  Rust roles, >20 LPA?"
        );
    }

    #[test]
    fn test_no_args_uses_default_query() {
        assert_eq!(query_from_args(Vec::new()), DEFAULT_QUERY);
    }

    #[cfg(unix)]
    #[test]
    fn test_invalid_utf8_argument_does_not_panic() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(vec![b'j', b'o', b'b', b's', 0xff]);
        let query = query_from_args(vec![raw, OsString::from("in pune")]);
        assert_eq!(query, "jobs\u{FFFD} in pune");
    }

    #[test]
    fn test_failure_is_reported_once() {
        let mut err_out = Vec::new();
        let code = report(
            Err(AppError::Configuration(
                "Required environment variable 'DB_NAME' is not set".to_string(),
            )),
            &mut err_out,
        );

        let written = String::from_utf8(err_out).unwrap();
        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::FAILURE));
        assert_eq!(written.lines().count(), 1);
        assert!(written.contains("CONFIGURATION_ERROR"));
        assert!(written.contains("DB_NAME"));
    }

    #[test]
    fn test_success_writes_nothing() {
        let mut err_out = Vec::new();
        let code = report(Ok(()), &mut err_out);
        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::SUCCESS));
        assert!(err_out.is_empty());
    }
}
