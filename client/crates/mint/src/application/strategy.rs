//! Submission strategies

use std::fmt;
use std::time::Duration;

use platform::pacing::PacingConfig;

use crate::application::saturate::FanoutPlan;

/// How a solved nonce is delivered to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStrategy {
    /// One request at a time, waiting `backoff` between failures
    SingleRetry {
        attempt_timeout: Duration,
        retries: u32,
        backoff: Duration,
    },
    /// `copies` requests per solution, all at once
    FanoutBurst { copies: u32, attempt_timeout: Duration },
    /// `copies` requests per solution, one every `interval`
    FanoutPaced {
        copies: u32,
        interval: Duration,
        attempt_timeout: Duration,
    },
}

impl Default for SubmissionStrategy {
    fn default() -> Self {
        SubmissionStrategy::FanoutBurst {
            copies: 10,
            attempt_timeout: Duration::from_secs(10),
        }
    }
}

impl SubmissionStrategy {
    pub fn attempt_timeout(&self) -> Duration {
        match *self {
            SubmissionStrategy::SingleRetry { attempt_timeout, .. }
            | SubmissionStrategy::FanoutBurst { attempt_timeout, .. }
            | SubmissionStrategy::FanoutPaced { attempt_timeout, .. } => attempt_timeout,
        }
    }

    /// Requests sent per solution in the worst case
    pub fn requests_per_solution(&self) -> u32 {
        match *self {
            SubmissionStrategy::SingleRetry { retries, .. } => retries + 1,
            SubmissionStrategy::FanoutBurst { copies, .. }
            | SubmissionStrategy::FanoutPaced { copies, .. } => copies,
        }
    }

    /// Fan-out parameters, or `None` for single-retry
    pub fn fanout_plan(&self, drain: Duration) -> Option<FanoutPlan> {
        match *self {
            SubmissionStrategy::SingleRetry { .. } => None,
            SubmissionStrategy::FanoutBurst { copies, attempt_timeout } => Some(FanoutPlan {
                copies,
                pacing: PacingConfig::burst(),
                attempt_timeout,
                drain,
            }),
            SubmissionStrategy::FanoutPaced {
                copies,
                interval,
                attempt_timeout,
            } => Some(FanoutPlan {
                copies,
                pacing: PacingConfig::every(interval),
                attempt_timeout,
                drain,
            }),
        }
    }
}

impl fmt::Display for SubmissionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionStrategy::SingleRetry { retries, .. } => write!(f, "single-retry(retries={retries})"),
            SubmissionStrategy::FanoutBurst { copies, .. } => write!(f, "burst(copies={copies})"),
            SubmissionStrategy::FanoutPaced { copies, interval, .. } => {
                write!(f, "paced(copies={copies}, interval={}ms)", interval.as_millis())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_retry_has_no_plan() {
        let strategy = SubmissionStrategy::SingleRetry {
            attempt_timeout: Duration::from_secs(1),
            retries: 3,
            backoff: Duration::from_millis(500),
        };
        assert!(strategy.fanout_plan(Duration::ZERO).is_none());
        assert_eq!(strategy.requests_per_solution(), 4);
    }

    #[test]
    fn test_paced_plan() {
        let strategy = SubmissionStrategy::FanoutPaced {
            copies: 50,
            interval: Duration::from_millis(10),
            attempt_timeout: Duration::from_secs(10),
        };
        let plan = strategy.fanout_plan(Duration::from_secs(5)).unwrap();
        assert_eq!(plan.copies, 50);
        assert!(!plan.pacing.is_burst());
        assert_eq!(plan.drain, Duration::from_secs(5));
    }

    #[test]
    fn test_default_is_burst_of_ten() {
        let plan = SubmissionStrategy::default().fanout_plan(Duration::ZERO).unwrap();
        assert_eq!(plan.copies, 10);
        assert!(plan.pacing.is_burst());
    }
}
