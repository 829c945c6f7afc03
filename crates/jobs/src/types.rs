//! Core job types.

use uuid::Uuid;

/// A unit of work: runs once, reports success or an opaque error.
///
/// The lifetime lets jobs borrow from the caller for the duration of a
/// single `run` call.
pub type Job<'a> = Box<dyn FnOnce() -> anyhow::Result<()> + Send + 'a>;

/// Identifier attached to every batch for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchId(pub Uuid);

impl BatchId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Jobs submitted together under one human-readable description.
///
/// The description only ever shows up in error messages and logs.
pub struct JobBatch<'a> {
    pub(crate) id: BatchId,
    pub(crate) description: String,
    pub(crate) jobs: Vec<Job<'a>>,
}

impl<'a> JobBatch<'a> {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: BatchId::new(),
            description: description.into(),
            jobs: Vec::new(),
        }
    }

    /// Build a batch from already boxed jobs.
    pub fn from_jobs(description: impl Into<String>, jobs: Vec<Job<'a>>) -> Self {
        Self {
            jobs,
            ..Self::new(description)
        }
    }

    /// Append a job.
    pub fn push<F>(&mut self, job: F)
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'a,
    {
        self.jobs.push(Box::new(job));
    }

    /// Builder-style `push`.
    pub fn with_job<F>(mut self, job: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'a,
    {
        self.push(job);
        self
    }

    pub fn id(&self) -> BatchId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl std::fmt::Debug for JobBatch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobBatch")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("jobs", &self.jobs.len())
            .finish()
    }
}

impl<'a> Extend<Job<'a>> for JobBatch<'a> {
    fn extend<T: IntoIterator<Item = Job<'a>>>(&mut self, iter: T) {
        self.jobs.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_builder_keeps_order_and_description() {
        let batch = JobBatch::new("create filesystem")
            .with_job(|| Ok(()))
            .with_job(|| anyhow::bail!("boom"));

        assert_eq!(batch.description(), "create filesystem");
        assert_eq!(batch.len(), 2);
        assert!(!batch.is_empty());
        assert!(format!("{batch:?}").contains("jobs: 2"));
    }

    #[test]
    fn batch_ids_are_unique() {
        assert_ne!(JobBatch::new("a").id(), JobBatch::new("a").id());
    }
}
