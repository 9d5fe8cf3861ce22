//! Error types for Torah-portion sources.
//!
//! Portion errors never abort a resolution: the parsha resolver turns them
//! into an absent parsha. The structured context is kept for logging.

use std::fmt;

/// Result type for portion source operations
pub type PortionResult<T> = Result<T, PortionError>;

/// Structured context for portion source errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "fetch_year")
    pub operation: Option<String>,
    /// Gregorian year that was requested
    pub year: Option<i32>,
    /// Request URL, when the source is remote
    pub url: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
    /// Whether a later attempt could succeed
    pub retryable: bool,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(year) = self.year {
            parts.push(format!("year={}", year));
        }
        if let Some(ref url) = self.url {
            parts.push(format!("url={}", url));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        if self.retryable {
            parts.push("retryable=true".to_string());
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Failure of a Torah-portion source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortionError {
    /// The request did not complete within the configured timeout.
    #[error("Timeout error: {message} {context}")]
    Timeout {
        message: String,
        context: ErrorContext,
    },

    /// Connection failure or non-success HTTP status.
    #[error("Transport error: {message} {context}")]
    Transport {
        message: String,
        context: ErrorContext,
    },

    /// The payload could not be decoded.
    #[error("Decode error: {message} {context}")]
    Decode {
        message: String,
        context: ErrorContext,
    },

    /// The source has nothing for the requested year.
    #[error("Unavailable: {message} {context}")]
    Unavailable {
        message: String,
        context: ErrorContext,
    },
}

impl PortionError {
    pub fn timeout(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Timeout {
            message: message.into(),
            context: context.retryable(),
        }
    }

    pub fn transport(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Transport {
            message: message.into(),
            context,
        }
    }

    pub fn decode(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Decode {
            message: message.into(),
            context,
        }
    }

    pub fn unavailable(year: i32) -> Self {
        Self::Unavailable {
            message: format!("no portion data for {}", year),
            context: ErrorContext::new("fetch_year").with_year(year),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn is_retryable(&self) -> bool {
        self.context().retryable
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Timeout { context, .. }
            | Self::Transport { context, .. }
            | Self::Decode { context, .. }
            | Self::Unavailable { context, .. } => context,
        }
    }
}
