//! Philosopher API reachability, tracked for logging and the UI hint.
use bevy::prelude::Resource;

/// Last known reachability of the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendConnectionState {
    #[default]
    Unknown,
    Live,
    Unreachable,
}

impl BackendConnectionState {
    /// Human-readable label for logging.
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Live => "live",
            Self::Unreachable => "unreachable",
        }
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct DialogueBackendStatus {
    connection_state: BackendConnectionState,
    version: Option<String>,
}

impl DialogueBackendStatus {
    pub fn connection_state(&self) -> BackendConnectionState {
        self.connection_state
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn is_unreachable(&self) -> bool {
        self.connection_state == BackendConnectionState::Unreachable
    }

    pub fn record_version(&mut self, version: impl Into<String>) {
        self.version = Some(version.into());
    }

    /// Records a call outcome and reports whether the state changed.
    pub fn record_outcome(&mut self, reachable: bool) -> bool {
        let next = if reachable {
            BackendConnectionState::Live
        } else {
            BackendConnectionState::Unreachable
        };
        let changed = self.connection_state != next;
        self.connection_state = next;
        changed
    }
}
