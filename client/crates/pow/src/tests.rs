//! Unit tests for PoW crate

#[cfg(test)]
mod solver_tests {
    use crate::domain::search::*;
    use crate::domain::services::*;
    use crate::domain::value_objects::*;

    fn difficulty(n: u32) -> Difficulty {
        Difficulty::new(n).unwrap()
    }

    #[test]
    fn test_solution_verifies_by_recomputation() {
        let nonce = solve("abc", "id1", difficulty(1));

        let preimage = format!("abcid1{}", nonce);
        let hex = hex::encode(platform::crypto::sha256(preimage.as_bytes()));
        assert!(hex.starts_with('0'), "hash {hex} for nonce {nonce}");
        assert!(verify("abc", "id1", nonce, difficulty(1)));
    }

    #[test]
    fn test_solution_is_first_valid_counter() {
        let d = difficulty(2);
        let nonce = solve("abc", "id1", d);
        for counter in 0..nonce.counter() {
            assert!(!verify("abc", "id1", Nonce::new(counter), d));
        }
    }

    #[test]
    fn test_solve_is_deterministic() {
        let d = difficulty(2);
        let first = solve("challenge-x", "bc1qidentity", d);
        for _ in 0..3 {
            assert_eq!(solve("challenge-x", "bc1qidentity", d), first);
        }
    }

    #[test]
    fn test_difficulty_zero_returns_zero() {
        assert_eq!(solve("anything", "anyone", difficulty(0)), Nonce::new(0));
    }

    #[test]
    fn test_identity_changes_solution_hash() {
        let d = difficulty(1);
        let a = solve("abc", "id1", d);
        assert!(verify("abc", "id1", a, d));
        assert_ne!(digest("abc", "id1", a.counter()), digest("abc", "id2", a.counter()));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let d = difficulty(3);
        for (challenge, identity) in [("abc", "id1"), ("c2", "bc1p..."), ("zz", "")] {
            let expected = solve(challenge, identity, d);
            for threads in [2, 3, 8] {
                let control = SearchControl::new().with_batch(64);
                let got = solve_parallel(challenge, identity, d, threads, &control);
                assert_eq!(got, Some(expected), "{challenge}/{identity} threads={threads}");
            }
        }
    }

    #[test]
    fn test_each_extra_zero_costs_about_sixteen_times_more() {
        const TRIALS: u64 = 300;
        let mean_attempts = |d: Difficulty| {
            let total: u64 = (0..TRIALS)
                .map(|i| solve(&format!("trial-{i}"), "id", d).attempts())
                .sum();
            total as f64 / TRIALS as f64
        };

        let ratio = mean_attempts(difficulty(2)) / mean_attempts(difficulty(1));
        assert!((10.0..=24.0).contains(&ratio), "ratio {ratio}");
    }
}

#[cfg(test)]
mod value_object_tests {
    use crate::domain::value_objects::*;

    #[test]
    fn test_difficulty_bounds() {
        assert!(Difficulty::new(0).is_some());
        assert!(Difficulty::new(64).is_some());
        assert!(Difficulty::new(65).is_none());
        assert_eq!(Difficulty::default().zeros(), 4);
    }

    #[test]
    fn test_difficulty_prefix_and_expectation() {
        let d = Difficulty::new(3).unwrap();
        assert_eq!(d.prefix(), "000");
        assert_eq!(d.expected_attempts(), 4096.0);
    }

    #[test]
    fn test_nonce_decimal_form() {
        let nonce: Nonce = " 12345 ".parse().unwrap();
        assert_eq!(nonce.counter(), 12345);
        assert_eq!(nonce.to_string(), "12345");
        assert!("-1".parse::<Nonce>().is_err());
        assert!("abc".parse::<Nonce>().is_err());
    }
}

#[cfg(test)]
mod entity_tests {
    use crate::domain::entities::Challenge;
    use crate::domain::value_objects::Difficulty;
    use chrono::{Duration, Utc};

    #[test]
    fn test_fresh_challenge_not_expired() {
        let challenge = Challenge::new("abc", Difficulty::default(), 5);
        assert!(!challenge.is_expired());
        assert_eq!(challenge.expires_at() - challenge.issued_at, Duration::minutes(5));
    }

    #[test]
    fn test_old_challenge_expired() {
        let issued = Utc::now() - Duration::minutes(10);
        let challenge = Challenge::issued_at("abc", Difficulty::default(), 5, issued);
        assert!(challenge.is_expired());
    }
}

#[cfg(test)]
mod use_case_tests {
    use crate::application::config::SolverConfig;
    use crate::application::solve_challenge::SolveChallengeUseCase;
    use crate::domain::entities::Challenge;
    use crate::domain::search::{SearchControl, solve};
    use crate::domain::value_objects::Difficulty;
    use crate::error::PowError;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_execute_returns_smallest_nonce() {
        let config = Arc::new(SolverConfig::default().with_threads(4));
        let use_case = SolveChallengeUseCase::new(config);
        let challenge = Challenge::new("abc", Difficulty::new(2).unwrap(), 5);

        let output = assert_ok!(use_case.execute(&challenge, "id1", SearchControl::new()).await);

        assert_eq!(output.nonce, solve("abc", "id1", challenge.difficulty));
        assert!(output.attempts >= 1);
    }

    #[tokio::test]
    async fn test_budget_exhausted() {
        let config = Arc::new(
            SolverConfig::default()
                .with_threads(2)
                .with_budget(Duration::from_millis(50)),
        );
        let use_case = SolveChallengeUseCase::new(config);
        let challenge = Challenge::new("abc", Difficulty::new(64).unwrap(), 5);

        let result = use_case.execute(&challenge, "id1", SearchControl::new()).await;
        assert!(matches!(result, Err(PowError::BudgetExhausted { .. })));
    }

    #[tokio::test]
    async fn test_external_stop_cancels() {
        let use_case = SolveChallengeUseCase::new(Arc::new(SolverConfig::single_threaded()));
        let challenge = Challenge::new("abc", Difficulty::new(64).unwrap(), 5);
        let control = SearchControl::new();
        let handle = control.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            handle.stop();
        });

        let result = use_case.execute(&challenge, "id1", control).await;
        assert!(matches!(result, Err(PowError::Cancelled { .. })));
    }

    #[tokio::test]
    async fn test_control_reusable_across_solves() {
        let use_case = SolveChallengeUseCase::new(Arc::new(SolverConfig::single_threaded()));
        let control = SearchControl::new();
        let first = Challenge::new("abc", Difficulty::new(1).unwrap(), 5);
        let second = Challenge::new("def", Difficulty::new(1).unwrap(), 5);

        let a = assert_ok!(use_case.execute(&first, "id1", control.clone()).await);
        assert!(!control.is_stopped());
        let b = assert_ok!(use_case.execute(&second, "id1", control.clone()).await);

        assert_eq!(b.nonce, solve("def", "id1", second.difficulty));
        assert_eq!(a.attempts + b.attempts, control.progress().attempts());
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let use_case = SolveChallengeUseCase::new(Arc::new(SolverConfig::default().with_threads(0)));
        let challenge = Challenge::new("abc", Difficulty::new(1).unwrap(), 5);
        let result = use_case.execute(&challenge, "id1", SearchControl::new()).await;
        assert!(matches!(result, Err(PowError::InvalidConfig(_))));
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::PowError;
    use kernel::error::{app_error::AppError, kind::ErrorKind};
    use std::time::Duration;

    #[test]
    fn test_error_kinds() {
        assert_eq!(PowError::Cancelled { attempts: 1 }.kind(), ErrorKind::Cancelled);
        assert_eq!(
            PowError::BudgetExhausted { budget: Duration::from_secs(1), attempts: 1 }.kind(),
            ErrorKind::Timeout
        );
        assert_eq!(PowError::InvalidConfig("x".into()).kind(), ErrorKind::Config);
        assert_eq!(PowError::Internal("x".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = PowError::Cancelled { attempts: 42 }.into();
        assert_eq!(app.kind(), ErrorKind::Cancelled);
        assert!(app.message().contains("42"));
    }
}
