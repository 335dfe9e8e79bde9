//! State machine for catalog status transitions
//!
//! Catalog states: Unknown → Ok | Broken; Broken → Ok; Ok → Ok
//! A failed initial load is the only way into Broken. A failed refresh never
//! changes the status.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("Invalid transition: cannot apply {event} to a catalog in {from} state")]
    InvalidTransition { from: String, event: String },
}

/// Catalog status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CatalogStatus {
    /// Not loaded yet
    #[default]
    Unknown,
    /// Last (re)load succeeded; views are trustworthy
    Ok,
    /// Initial load failed; views are empty
    Broken,
}

impl CatalogStatus {
    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [CatalogStatus] {
        match self {
            Self::Unknown => &[Self::Ok, Self::Broken],
            Self::Ok => &[Self::Ok],
            Self::Broken => &[Self::Ok, Self::Broken],
        }
    }
}

impl std::fmt::Display for CatalogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Ok => write!(f, "ok"),
            Self::Broken => write!(f, "broken"),
        }
    }
}

/// Events that trigger catalog status transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CatalogEvent {
    /// A manifest was fetched and parsed
    LoadSucceeded,
    /// The first load failed
    InitialLoadFailed,
    /// A background refresh failed
    RefreshFailed,
}

impl std::fmt::Display for CatalogEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoadSucceeded => write!(f, "load_succeeded"),
            Self::InitialLoadFailed => write!(f, "initial_load_failed"),
            Self::RefreshFailed => write!(f, "refresh_failed"),
        }
    }
}

/// Catalog state machine
pub struct CatalogStateMachine;

impl CatalogStateMachine {
    /// Attempt a state transition
    pub fn transition(
        current: CatalogStatus,
        event: CatalogEvent,
    ) -> Result<CatalogStatus, StateError> {
        let next = match (&current, &event) {
            (_, CatalogEvent::LoadSucceeded) => CatalogStatus::Ok,
            (CatalogStatus::Unknown | CatalogStatus::Broken, CatalogEvent::InitialLoadFailed) => {
                CatalogStatus::Broken
            }
            (status, CatalogEvent::RefreshFailed) => *status,
            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: CatalogStatus, event: &CatalogEvent) -> bool {
        Self::transition(current, *event).is_ok()
    }
}
