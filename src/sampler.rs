use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::client::SearchClient;
use crate::config::Config;
use crate::errors::SamplerError;
use crate::types::{Attempt, BatchReport, MATCH_ALL_BODY, SINGLE_SHOT_BODY, SearchResponse};

/// When the outer loop gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopPolicy {
    pub target_avg: u64,
    pub max_rounds: Option<u32>,
    pub timeout: Option<Duration>,
}

impl From<&Config> for StopPolicy {
    fn from(config: &Config) -> Self {
        StopPolicy {
            target_avg: config.target_avg_search_time,
            max_rounds: config.max_rounds,
            timeout: config.timeout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverOutcome {
    TargetReached { rounds: u32, report: BatchReport },
    RoundLimit { rounds: u32 },
    DeadlineExceeded { rounds: u32 },
}

impl DriverOutcome {
    pub fn into_result(self, target: u64) -> Result<(u32, BatchReport), SamplerError> {
        match self {
            DriverOutcome::TargetReached { rounds, report } => Ok((rounds, report)),
            DriverOutcome::RoundLimit { rounds } => Err(SamplerError::TargetNotReached {
                target,
                rounds,
                reason: "round limit reached",
            }),
            DriverOutcome::DeadlineExceeded { rounds } => Err(SamplerError::TargetNotReached {
                target,
                rounds,
                reason: "timeout elapsed",
            }),
        }
    }
}

/// Run one match-all query and read its `took`.
pub fn measure_once<C: SearchClient + ?Sized>(client: &C, index: &str) -> Attempt {
    let outcome = client
        .search(index, MATCH_ALL_BODY)
        .and_then(|body| SearchResponse::parse(&body));
    match outcome {
        Ok(resp) => {
            debug!(took = resp.took, timed_out = resp.timed_out, "search completed");
            Attempt::Took(resp.took)
        }
        Err(err) => {
            warn!(index, error = %err, "search attempt failed; excluding it from the batch");
            Attempt::Failed(err.to_string())
        }
    }
}

/// Issue `request_count` sequential queries against `index` and summarize
/// the successful ones.
///
/// Sleeps `interval` between requests. Failed attempts are counted but do
/// not contribute to the statistics.
pub fn sample<C: SearchClient + ?Sized>(
    client: &C,
    index: &str,
    request_count: usize,
    interval: Duration,
) -> BatchReport {
    let mut attempts = Vec::with_capacity(request_count);
    for i in 0..request_count {
        if i > 0 && !interval.is_zero() {
            thread::sleep(interval);
        }
        attempts.push(measure_once(client, index));
    }
    BatchReport::from_attempts(&attempts)
}

/// Sample batches until one averages at least the target, or a cap hits.
///
/// `on_batch` sees every batch, including the final one.
pub fn run_until_target<C, F>(
    client: &C,
    config: &Config,
    policy: StopPolicy,
    mut on_batch: F,
) -> DriverOutcome
where
    C: SearchClient + ?Sized,
    F: FnMut(u32, &BatchReport),
{
    // An average of 0 already meets a target of 0, so no batch runs.
    if policy.target_avg == 0 {
        return DriverOutcome::TargetReached {
            rounds: 0,
            report: BatchReport::from_attempts(&[]),
        };
    }

    let started = Instant::now();
    let mut rounds: u32 = 0;

    loop {
        let report = sample(client, &config.index_name, config.request, config.interval);
        rounds += 1;
        info!(
            round = rounds,
            avg = report.summary.avg,
            failed = report.failed,
            "batch complete"
        );
        on_batch(rounds, &report);

        if report.meets_target(policy.target_avg) {
            return DriverOutcome::TargetReached { rounds, report };
        }
        if report.succeeded == 0 {
            warn!(round = rounds, "every request in the batch failed");
        }
        if policy.max_rounds.is_some_and(|max| rounds >= max) {
            return DriverOutcome::RoundLimit { rounds };
        }
        if policy.timeout.is_some_and(|t| started.elapsed() >= t) {
            return DriverOutcome::DeadlineExceeded { rounds };
        }
    }
}

/// Issue one size-limited query and hand back the raw body.
pub fn single_shot<C: SearchClient + ?Sized>(
    client: &C,
    index: &str,
) -> Result<String, SamplerError> {
    client.search(index, SINGLE_SHOT_BODY)
}
