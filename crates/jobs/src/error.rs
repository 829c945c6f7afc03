//! Failure reporting for job batches.

use std::fmt;

/// One failed job: its position in the batch and its error, verbatim.
#[derive(Debug)]
pub struct JobFailure {
    index: usize,
    description: String,
    error: anyhow::Error,
}

impl JobFailure {
    pub(crate) fn new(index: usize, description: &str, error: anyhow::Error) -> Self {
        Self {
            index,
            description: description.to_string(),
            error,
        }
    }

    /// Position of the job in the submitted batch.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn error(&self) -> &anyhow::Error {
        &self.error
    }

    pub fn into_error(self) -> anyhow::Error {
        self.error
    }
}

impl fmt::Display for JobFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Job failed: {}: {:#}", self.description, self.error)
    }
}

impl std::error::Error for JobFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let error: &(dyn std::error::Error + 'static) = &*self.error;
        Some(error)
    }
}

/// Every failure of one batch, plus the batch size.
///
/// Only built when at least one job failed. The message alone says how many
/// jobs failed out of how many and why. The header ends in `": "` and every
/// failure starts on its own line:
///
/// ```text
/// 2 of 101 jobs failed: create filesystem:
/// Job failed: create filesystem: filesystem already exists: pool/fs/child-007;
/// Job failed: create filesystem: parent not found: pool/fs;
/// ```
#[derive(Debug)]
pub struct AggregateError {
    description: String,
    total: usize,
    failures: Vec<JobFailure>,
}

impl AggregateError {
    /// Returns `None` when there is nothing to report.
    pub(crate) fn from_failures(
        description: &str,
        total: usize,
        mut failures: Vec<JobFailure>,
    ) -> Option<Self> {
        if failures.is_empty() {
            return None;
        }
        // Outcomes arrive in completion order; report in submission order.
        failures.sort_by_key(JobFailure::index);
        Some(Self {
            description: description.to_string(),
            total,
            failures,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Number of failed jobs.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Number of jobs in the batch.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn failures(&self) -> &[JobFailure] {
        &self.failures
    }

    pub fn iter(&self) -> impl Iterator<Item = &JobFailure> {
        self.failures.iter()
    }

    pub fn into_failures(self) -> Vec<JobFailure> {
        self.failures
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} jobs failed: {}: ",
            self.failed(),
            self.total,
            self.description
        )?;
        for failure in &self.failures {
            write!(f, "\n{failure};")?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.failures
            .first()
            .map(|f| f as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_failures_means_no_error() {
        assert!(AggregateError::from_failures("noop", 3, Vec::new()).is_none());
    }

    #[test]
    fn message_lists_counts_and_every_reason() {
        let failures = vec![
            JobFailure::new(4, "delete filesystem", anyhow::anyhow!("busy")),
            JobFailure::new(1, "delete filesystem", anyhow::anyhow!("not found")),
        ];
        let err = AggregateError::from_failures("delete filesystem", 5, failures).unwrap();

        assert_eq!(err.failed(), 2);
        assert_eq!(err.total(), 5);
        assert_eq!(
            err.to_string(),
            "2 of 5 jobs failed: delete filesystem: \n\
             Job failed: delete filesystem: not found;\n\
             Job failed: delete filesystem: busy;"
        );
    }

    #[test]
    fn failures_are_sorted_by_submission_index() {
        let failures = (0..4)
            .rev()
            .map(|i| JobFailure::new(i, "x", anyhow::anyhow!("e{i}")))
            .collect();
        let err = AggregateError::from_failures("x", 4, failures).unwrap();
        let indexes: Vec<_> = err.iter().map(JobFailure::index).collect();
        assert_eq!(indexes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn source_chain_reaches_job_error() {
        use std::error::Error as _;

        let failures = vec![JobFailure::new(0, "x", anyhow::anyhow!("root cause"))];
        let err = AggregateError::from_failures("x", 1, failures).unwrap();

        let first = err.source().unwrap();
        assert!(first.to_string().starts_with("Job failed: x"));
        assert_eq!(first.source().unwrap().to_string(), "root cause");
    }
}
