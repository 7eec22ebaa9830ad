//! Error types for Care Assist.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Controller error: {0}")]
    Controller(#[from] ControllerError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Failures of a round trip against the remote assessment service.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP request to {endpoint} failed: {reason}")]
    Http { endpoint: String, reason: String },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Could not decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("{endpoint} reported failure: {reason}")]
    Rejected { endpoint: String, reason: String },
}

/// Reasons the controller refuses a user action.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("A request is already in flight")]
    Busy,

    #[error("Input is closed while the prediction is pending")]
    InputClosed,

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
