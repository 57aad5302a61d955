//! Bulk transaction operations: sequential create/delete with a
//! per-item success/failure summary instead of all-or-nothing.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use crate::client::Client;

#[derive(Debug, Serialize)]
pub struct BulkFailure {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub error: String,
}

/// Outcome of a bulk run. `status` is one of `success`,
/// `partial_success`, `failed`, or `failed_fast` (stopped early with
/// items still unprocessed).
#[derive(Debug, Serialize)]
pub struct BulkSummary {
    pub status: &'static str,
    pub total: usize,
    pub success_count: usize,
    pub failure_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_count: Option<usize>,
    pub successes: Vec<Value>,
    pub failures: Vec<BulkFailure>,
}

impl BulkSummary {
    fn finished(total: usize, successes: Vec<Value>, failures: Vec<BulkFailure>) -> Self {
        let status = if failures.is_empty() {
            "success"
        } else if successes.is_empty() {
            "failed"
        } else {
            "partial_success"
        };
        Self {
            status,
            total,
            success_count: successes.len(),
            failure_count: failures.len(),
            remaining_count: None,
            successes,
            failures,
        }
    }

    fn stopped_early(
        total: usize,
        processed: usize,
        successes: Vec<Value>,
        failures: Vec<BulkFailure>,
    ) -> Self {
        Self {
            status: "failed_fast",
            total,
            success_count: successes.len(),
            failure_count: failures.len(),
            remaining_count: Some(total - processed),
            successes,
            failures,
        }
    }
}

impl Client {
    /// Create many transactions one by one, collecting failures instead
    /// of aborting. With `fail_fast`, stop at the first error and report
    /// how many items were never attempted.
    pub async fn create_transactions_bulk<T: Serialize>(
        &self,
        transactions: &[T],
        fail_fast: bool,
    ) -> Result<BulkSummary> {
        let total = transactions.len();
        let mut successes = Vec::new();
        let mut failures = Vec::new();

        for (i, txn) in transactions.iter().enumerate() {
            let payload = serde_json::to_value(txn).context("serialize transaction")?;
            let description = payload
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string);

            match self.create_transaction(&payload).await {
                Ok(created) => successes.push(created),
                Err(err) => {
                    failures.push(BulkFailure {
                        index: i,
                        id: None,
                        description,
                        error: format!("{err:#}"),
                    });
                    if fail_fast {
                        return Ok(BulkSummary::stopped_early(total, i + 1, successes, failures));
                    }
                }
            }
        }

        Ok(BulkSummary::finished(total, successes, failures))
    }

    /// Delete many transactions by id, with the same summary shape.
    pub async fn delete_transactions_bulk(
        &self,
        ids: &[i64],
        fail_fast: bool,
    ) -> Result<BulkSummary> {
        let total = ids.len();
        let mut successes = Vec::new();
        let mut failures = Vec::new();

        for (i, &id) in ids.iter().enumerate() {
            match self.delete_transaction(id).await {
                Ok(_) => successes.push(Value::from(id)),
                Err(err) => {
                    failures.push(BulkFailure {
                        index: i,
                        id: Some(id),
                        description: None,
                        error: format!("{err:#}"),
                    });
                    if fail_fast {
                        return Ok(BulkSummary::stopped_early(total, i + 1, successes, failures));
                    }
                }
            }
        }

        Ok(BulkSummary::finished(total, successes, failures))
    }
}
