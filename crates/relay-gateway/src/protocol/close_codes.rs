//! WebSocket close codes
//!
//! Every protocol violation ends the connection; the close code is the only
//! signal the client gets.

/// Relay WebSocket close codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CloseCode {
    /// Unknown error occurred
    UnknownError = 4000,
    /// Frame was not a JSON object with a string `type`
    DecodeError = 4002,
    /// Sent a non-auth frame before authenticating
    NotAuthenticated = 4003,
    /// Credential rejected
    AuthenticationFailed = 4004,
    /// Sent auth twice
    AlreadyAuthenticated = 4005,
}

impl CloseCode {
    /// Get the raw u16 value
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Get the description for this close code (logs only)
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::UnknownError => "Unknown error occurred",
            Self::DecodeError => "Invalid payload encoding",
            Self::NotAuthenticated => "Not authenticated",
            Self::AuthenticationFailed => "Authentication failed",
            Self::AlreadyAuthenticated => "Already authenticated",
        }
    }

    /// Reason text sent in the close frame
    ///
    /// A rejected credential gets an empty reason so nothing beyond the code
    /// says why the credential failed.
    #[must_use]
    pub const fn close_reason(self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "",
            other => other.description(),
        }
    }

    /// Get the name of this close code
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UnknownError => "UnknownError",
            Self::DecodeError => "DecodeError",
            Self::NotAuthenticated => "NotAuthenticated",
            Self::AuthenticationFailed => "AuthenticationFailed",
            Self::AlreadyAuthenticated => "AlreadyAuthenticated",
        }
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.as_u16(), self.description())
    }
}
