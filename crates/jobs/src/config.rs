//! Runner configuration.

use tracing::warn;

/// Environment variable overriding the worker pool size.
pub const WORKERS_ENV: &str = "NSTOR_RUNNER_WORKERS";

/// Default count of concurrent workers per batch.
pub const DEFAULT_WORKERS: usize = 20;

/// Job runner configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Worker threads spawned per batch; also the concurrency ceiling.
    pub workers: usize,
    /// Thread-name prefix and log field.
    pub name: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            name: "job-runner".to_string(),
        }
    }
}

impl RunnerConfig {
    /// Defaults, with `NSTOR_RUNNER_WORKERS` applied when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let config = Self::default();
        match lookup(WORKERS_ENV) {
            None => config,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(workers) if workers > 0 => config.with_workers(workers),
                _ => {
                    warn!(
                        var = WORKERS_ENV,
                        value = %raw,
                        default = DEFAULT_WORKERS,
                        "invalid worker count; using default"
                    );
                    config
                }
            },
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the pool size; zero is bumped to one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_twenty_workers() {
        assert_eq!(RunnerConfig::default().workers, 20);
        assert_eq!(RunnerConfig::from_lookup(|_| None), RunnerConfig::default());
    }

    #[test]
    fn lookup_overrides_workers() {
        let config = RunnerConfig::from_lookup(|key| {
            (key == WORKERS_ENV).then(|| " 8 ".to_string())
        });
        assert_eq!(config.workers, 8);
    }

    #[test]
    fn invalid_values_fall_back_to_default() {
        for raw in ["0", "-3", "many"] {
            let config = RunnerConfig::from_lookup(|_| Some(raw.to_string()));
            assert_eq!(config.workers, DEFAULT_WORKERS, "{raw}");
        }
    }

    #[test]
    fn zero_workers_is_clamped() {
        assert_eq!(RunnerConfig::default().with_workers(0).workers, 1);
    }
}
