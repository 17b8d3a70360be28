//! Failures surfaced by the conversation backend.
use std::{fmt, time::Duration};

/// The only failure kind the dialogue session recognises. Every variant is
/// rendered to the player as the same fallback line.
#[derive(Debug, Clone, PartialEq)]
pub enum CommunicationError {
    Transport { message: String },
    Status { code: u16, detail: Option<String> },
    Decode { message: String },
    Timeout { elapsed: Duration },
    Unavailable { reason: String },
}

impl CommunicationError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Short machine-friendly label used by telemetry.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Status { .. } => "status",
            Self::Decode { .. } => "decode",
            Self::Timeout { .. } => "timeout",
            Self::Unavailable { .. } => "unavailable",
        }
    }

    /// True when the backend never answered. An HTTP status or an
    /// undecodable body still proves the server is up.
    pub fn indicates_unreachable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::Unavailable { .. }
        )
    }
}

impl fmt::Display for CommunicationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { message } => write!(f, "Transport failure: {}", message),
            Self::Status {
                code,
                detail: Some(detail),
            } => write!(f, "Backend returned HTTP {}: {}", code, detail),
            Self::Status { code, detail: None } => write!(f, "Backend returned HTTP {}", code),
            Self::Decode { message } => write!(f, "Malformed backend reply: {}", message),
            Self::Timeout { elapsed } => {
                write!(f, "No reply after {:.1}s", elapsed.as_secs_f32())
            }
            Self::Unavailable { reason } => write!(f, "Backend unavailable: {}", reason),
        }
    }
}

impl std::error::Error for CommunicationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_details() {
        let status = CommunicationError::Status {
            code: 500,
            detail: Some("philosopher not found".into()),
        };
        assert_eq!(
            status.to_string(),
            "Backend returned HTTP 500: philosopher not found"
        );

        let bare = CommunicationError::Status {
            code: 502,
            detail: None,
        };
        assert_eq!(bare.to_string(), "Backend returned HTTP 502");

        let timeout = CommunicationError::Timeout {
            elapsed: Duration::from_millis(2500),
        };
        assert_eq!(timeout.to_string(), "No reply after 2.5s");
        assert_eq!(timeout.kind_label(), "timeout");

        assert!(CommunicationError::unavailable("offline")
            .to_string()
            .contains("offline"));
    }

    #[test]
    fn only_unanswered_calls_count_as_unreachable() {
        assert!(CommunicationError::transport("connection refused").indicates_unreachable());
        assert!(CommunicationError::unavailable("no url").indicates_unreachable());
        assert!(CommunicationError::Timeout {
            elapsed: Duration::from_secs(5)
        }
        .indicates_unreachable());

        assert!(!CommunicationError::Status {
            code: 500,
            detail: None
        }
        .indicates_unreachable());
        assert!(!CommunicationError::decode("missing field `response`").indicates_unreachable());
    }
}
