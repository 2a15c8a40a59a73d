//! # Error Types
//!
//! Error handling shared by every kube-elector crate.

use thiserror::Error;

/// Error types that can occur while taking part in an election.
///
/// Only the fatal kinds (see [`ElectorError::is_fatal`]) ever reach the
/// process exit code. Side-effect failures of a leadership transition are
/// logged by the caller and the transition carries on.
///
/// # Examples
///
/// ```rust
/// use elector_core::ElectorError;
///
/// let error = ElectorError::config("--election cannot be empty");
/// assert!(error.is_fatal());
///
/// let error = ElectorError::webhook("connection refused");
/// assert!(!error.is_fatal());
/// ```
#[derive(Error, Debug)]
pub enum ElectorError {
    /// Invalid or missing configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The control-plane client could not be built
    #[error("Client error: {message}")]
    Client { message: String },

    /// The election handle could not be constructed
    #[error("Election error: {message}")]
    Election { message: String },

    /// An optimistic-concurrency write lost against another participant
    #[error("Conflict writing {object}")]
    Conflict { object: String },

    /// A control-plane request failed
    #[error("Control plane error: {message}")]
    ControlPlane { message: String },

    /// Applying the leader label to the workload failed
    #[error("Label patch failed for pod {pod}: {message}")]
    LabelPatch { pod: String, message: String },

    /// The webhook call failed or returned a non-success status
    #[error("Webhook error: {message}")]
    Webhook { message: String },

    /// The HTTP status surface failed
    #[error("HTTP server error: {message}")]
    Http { message: String },

    /// Graceful shutdown did not complete
    #[error("Shutdown error: {message}")]
    Shutdown { message: String },

    /// JSON serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Socket or file I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unexpected internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Type alias for Results returned by kube-elector operations.
pub type ElectorResult<T> = std::result::Result<T, ElectorError>;

impl ElectorError {
    /// Creates a new configuration error with the given message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a new client construction error with the given message.
    pub fn client(message: impl Into<String>) -> Self {
        Self::Client {
            message: message.into(),
        }
    }

    /// Creates a new election construction error with the given message.
    pub fn election(message: impl Into<String>) -> Self {
        Self::Election {
            message: message.into(),
        }
    }

    /// Creates a new conflict error for the named object.
    pub fn conflict(object: impl Into<String>) -> Self {
        Self::Conflict {
            object: object.into(),
        }
    }

    /// Creates a new control-plane error with the given message.
    pub fn control_plane(message: impl Into<String>) -> Self {
        Self::ControlPlane {
            message: message.into(),
        }
    }

    /// Creates a new label patch error for `pod`.
    pub fn label_patch(pod: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LabelPatch {
            pod: pod.into(),
            message: message.into(),
        }
    }

    /// Creates a new webhook error with the given message.
    pub fn webhook(message: impl Into<String>) -> Self {
        Self::Webhook {
            message: message.into(),
        }
    }

    /// Creates a new HTTP server error with the given message.
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
        }
    }

    /// Creates a new shutdown error with the given message.
    pub fn shutdown(message: impl Into<String>) -> Self {
        Self::Shutdown {
            message: message.into(),
        }
    }

    /// Creates a new internal error with the given message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` for errors that must terminate the process.
    ///
    /// Configuration, client and election construction failures abort
    /// start-up; a failed HTTP drain makes the exit code non-zero.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::Client { .. } | Self::Election { .. } | Self::Shutdown { .. }
        )
    }

    /// Returns `true` if this error signals a lost optimistic-concurrency race.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
