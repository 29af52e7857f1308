//! Application Configuration
//!
//! Configuration for the solver.

use std::thread;
use std::time::Duration;

use crate::domain::search::DEFAULT_BATCH;
use crate::error::{PowError, PowResult};

/// Solver configuration
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Worker threads for one search
    pub threads: usize,
    /// Give up after this long; `None` searches until stopped
    pub budget: Option<Duration>,
    /// Counters hashed between progress updates and stop checks
    pub progress_batch: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            threads: thread::available_parallelism().map_or(1, |n| n.get()),
            budget: None,
            progress_batch: DEFAULT_BATCH,
        }
    }
}

impl SolverConfig {
    pub fn single_threaded() -> Self {
        Self {
            threads: 1,
            ..Default::default()
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn validate(&self) -> PowResult<()> {
        if self.threads == 0 {
            return Err(PowError::InvalidConfig("threads must be at least 1".into()));
        }
        if self.progress_batch == 0 {
            return Err(PowError::InvalidConfig("progress_batch must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SolverConfig::default();
        assert!(config.threads >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_threads_rejected() {
        let config = SolverConfig::default().with_threads(0);
        assert!(matches!(config.validate(), Err(PowError::InvalidConfig(_))));
    }
}
