use std::collections::HashSet;

use tracing::{info, warn};

use crate::error::PullError;
use crate::error_log::ErrorLog;
use crate::fetch::MetadataClient;
use crate::model::ChangeList;
use crate::processor::{RecordOutcome, RecordProcessor};

pub(crate) const NOT_RETURNED_MESSAGE: &str = "not returned by metadata service";

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub batches: usize,
    pub persisted: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Requested mints the service returned no record for. Also logged to `errors.txt`.
    pub missing: usize,
    pub changes: usize,
}

/// State owned by one run: the fetcher, the per-record processor, the error log and the
/// change list that is flushed when the run finishes.
pub struct RunContext {
    client: MetadataClient,
    processor: RecordProcessor,
    error_log: ErrorLog,
    changes: ChangeList,
    summary: RunSummary,
}

impl RunContext {
    pub fn new(client: MetadataClient, processor: RecordProcessor, error_log: ErrorLog) -> Self {
        Self {
            client,
            processor,
            error_log,
            changes: ChangeList::new(),
            summary: RunSummary::default(),
        }
    }

    /// Fetches one batch and drains every returned record to a terminal state.
    ///
    /// A fetch failure is returned to the caller; record failures are logged and counted.
    pub async fn process_batch(&mut self, mints: &[String]) -> Result<(), PullError> {
        let records = self.client.fetch(mints).await?;
        self.summary.batches += 1;

        let mut returned = HashSet::with_capacity(records.len());
        for record in records {
            returned.insert(record.account.clone());
            let outcome = self.processor.process(record, &mut self.changes).await;
            self.record_outcome(outcome);
        }

        for mint in mints.iter().filter(|mint| !returned.contains(*mint)) {
            warn!(mint = %mint, "Mint missing from metadata response");
            self.summary.missing += 1;
            self.log_failure(mint, NOT_RETURNED_MESSAGE);
        }

        Ok(())
    }

    fn record_outcome(&mut self, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Persisted {
                mint,
                metadata_path,
                asset,
            } => {
                info!(
                    mint = %mint,
                    path = %metadata_path.display(),
                    asset = asset.as_deref().unwrap_or("-"),
                    "Persisted metadata"
                );
                self.summary.persisted += 1;
            }
            RecordOutcome::Skipped { mint, reason } => {
                warn!(mint = %mint, reason = %reason, "Skipped record");
                self.summary.skipped += 1;
                self.log_failure(&mint, &reason);
            }
            RecordOutcome::Failed { mint, error } => {
                warn!(mint = %mint, error = %error, "Record failed");
                self.summary.failed += 1;
                self.log_failure(&mint, &error.to_string());
            }
        }
    }

    fn log_failure(&self, mint: &str, message: &str) {
        if let Err(err) = self.error_log.append(mint, message) {
            warn!(mint, error = %err, "Failed to append to error log");
        }
    }

    /// Ends the run, handing back the summary and the accumulated change list.
    pub fn finish(self) -> (RunSummary, ChangeList) {
        let mut summary = self.summary;
        summary.changes = self.changes.len();
        (summary, self.changes)
    }
}
