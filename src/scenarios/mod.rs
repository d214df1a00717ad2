// Scenario modules — each exercises one API domain end-to-end against a
// live chat service. Scenarios share the ChatApi/LogSink/cancellation
// contract so the runner can drive them uniformly.

pub mod chat;

use crate::client::ChatApi;
use crate::error::Error;
use crate::log::LogSink;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug)]
pub enum Outcome {
    Passed,
    Failed(Error),
}

#[derive(Debug)]
pub struct ScenarioReport {
    pub name: &'static str,
    pub outcome: Outcome,
    pub elapsed: Duration,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, Outcome::Passed)
    }
}

/// Runs every scenario in sequence against the same client and log sink.
/// A failing scenario is recorded and does not abort the ones after it.
pub async fn run_all<C, L>(
    user_id: &str,
    client: &C,
    log: &mut L,
    cancel: &CancellationToken,
) -> Vec<ScenarioReport>
where
    C: ChatApi + ?Sized,
    L: LogSink + Send,
{
    let mut reports = Vec::new();

    let started = Instant::now();
    let outcome = match chat::run(user_id, client, log, cancel).await {
        Ok(()) => Outcome::Passed,
        Err(e) => Outcome::Failed(e),
    };
    debug!(scenario = chat::NAME, passed = matches!(outcome, Outcome::Passed), "scenario finished");
    reports.push(ScenarioReport {
        name: chat::NAME,
        outcome,
        elapsed: started.elapsed(),
    });

    reports
}
