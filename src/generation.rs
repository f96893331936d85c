//! Generation lifecycle: `Idle → Requesting → Succeeded/Failed → Idle`.
//!
//! At most one request is in flight. A second `begin` while `Requesting` is
//! rejected rather than queued.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenerationState {
    #[default]
    Idle,
    Requesting {
        started_at: Instant,
    },
    Succeeded {
        elapsed: Duration,
    },
    Failed {
        message: String,
    },
}

/// Returned when a request is already outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a generation request is already in flight")]
pub struct AlreadyRequesting;

impl GenerationState {
    pub fn is_requesting(&self) -> bool {
        matches!(self, Self::Requesting { .. })
    }

    /// Time since the current request started, if one is running.
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            Self::Requesting { started_at } => Some(started_at.elapsed()),
            _ => None,
        }
    }

    /// Enter `Requesting`. Any terminal state is implicitly acknowledged.
    pub fn begin(&mut self) -> Result<(), AlreadyRequesting> {
        if self.is_requesting() {
            warn!("generation_already_requesting");
            return Err(AlreadyRequesting);
        }
        *self = Self::Requesting {
            started_at: Instant::now(),
        };
        info!("generation_started");
        Ok(())
    }

    pub fn succeed(&mut self) {
        let elapsed = self.elapsed().unwrap_or_default();
        info!(elapsed_ms = elapsed.as_millis() as u64, "generation_succeeded");
        *self = Self::Succeeded { elapsed };
    }

    pub fn fail(&mut self, message: String) {
        warn!(message = %message, "generation_failed");
        *self = Self::Failed { message };
    }

    /// Return to `Idle` once the user has seen the outcome. A running
    /// request is left alone.
    pub fn acknowledge(&mut self) {
        if !self.is_requesting() {
            debug!("generation_acknowledged");
            *self = Self::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_from_idle() {
        let mut state = GenerationState::default();
        assert!(state.begin().is_ok());
        assert!(state.is_requesting());
        assert!(state.elapsed().is_some());
    }

    #[test]
    fn test_begin_while_requesting_rejected() {
        let mut state = GenerationState::default();
        state.begin().unwrap();
        assert_eq!(state.begin(), Err(AlreadyRequesting));
        assert!(state.is_requesting());
    }

    #[test]
    fn test_success_then_acknowledge() {
        let mut state = GenerationState::default();
        state.begin().unwrap();
        state.succeed();
        assert!(matches!(state, GenerationState::Succeeded { .. }));
        state.acknowledge();
        assert_eq!(state, GenerationState::Idle);
    }

    #[test]
    fn test_failure_keeps_message() {
        let mut state = GenerationState::default();
        state.begin().unwrap();
        state.fail("boom".to_string());
        assert_eq!(
            state,
            GenerationState::Failed {
                message: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_begin_after_failure_allowed() {
        let mut state = GenerationState::Failed {
            message: "x".to_string(),
        };
        assert!(state.begin().is_ok());
    }

    #[test]
    fn test_acknowledge_ignored_while_requesting() {
        let mut state = GenerationState::default();
        state.begin().unwrap();
        state.acknowledge();
        assert!(state.is_requesting());
    }
}
