use std::fmt;
use thiserror::Error;
use tokio::time::Duration;

#[derive(Error, Debug)]
pub enum StdError {
    #[error("Kube Error: {0}")]
    KubeError(#[source] kube::Error),

    #[error("PvcFetchError: problem of getting pvc {name}: {source}")]
    PvcFetchError {
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("PvcUpdateError: PVC {name} has problems while updating: {source}")]
    PvcUpdateError {
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("PvFetchError: problem of getting pv {name}: {source}")]
    PvFetchError {
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("WaitExceeded: max amount of wait iterations ({iterations}) for pvc {name} being bound is expired")]
    WaitExceeded { name: String, iterations: u32 },

    #[error("AttemptsExceeded: the number of attempts ({attempts}) to delete {kind} {name} has exceeded: {source}")]
    AttemptsExceeded {
        kind: &'static str,
        name: String,
        attempts: u32,
        #[source]
        source: kube::Error,
    },

    #[error("SecretFetchError: unable to fetch secret {name}: {source}")]
    SecretFetchError {
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("SecretKeyMissing: secret {name} has no key {key}")]
    SecretKeyMissing { name: String, key: String },

    #[error("DecodingError: {0}")]
    DecodingError(String),

    #[error("MetadataMissing: {0}")]
    MetadataMissing(String),

    #[error("InvalidQuantity: {0}")]
    InvalidQuantity(String),

    #[error("ConfigError: {0}")]
    ConfigError(String),
}

impl StdError {
    /// Variant name only, so failure metrics keep a bounded label set.
    pub fn metric_label(&self) -> String {
        let debug = format!("{self:?}");
        debug
            .split(|c: char| c == '(' || c == ' ' || c == '{')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }
}

#[derive(Error, Debug)]
pub struct ErrorWithRequeue {
    pub duration: Duration,
    pub error: StdError,
}

impl ErrorWithRequeue {
    pub fn new(error: StdError, duration: Duration) -> ErrorWithRequeue {
        ErrorWithRequeue { error, duration }
    }

    pub fn metric_label(&self) -> String {
        self.error.metric_label()
    }
}

impl fmt::Display for ErrorWithRequeue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Standard Error: {0}")]
    StdError(#[source] StdError),

    #[error("Error With Requeue: {0}")]
    ErrorWithRequeue(#[source] ErrorWithRequeue),
}

impl Error {
    pub fn metric_label(&self) -> String {
        match self {
            Error::StdError(e) => e.metric_label(),
            Error::ErrorWithRequeue(e) => e.metric_label(),
        }
    }

    /// The leaf cause, whether or not a requeue was attached.
    pub fn std_error(&self) -> &StdError {
        match self {
            Error::StdError(e) => e,
            Error::ErrorWithRequeue(e) => &e.error,
        }
    }

    /// Suggested delay before the outer loop retries, if any.
    pub fn requeue_after(&self) -> Option<Duration> {
        match self {
            Error::StdError(_) => None,
            Error::ErrorWithRequeue(e) => Some(e.duration),
        }
    }
}

impl From<StdError> for Error {
    fn from(error: StdError) -> Self {
        Error::StdError(error)
    }
}

impl From<kube::Error> for Error {
    fn from(error: kube::Error) -> Self {
        Error::StdError(StdError::KubeError(error))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// True when the API server answered 404 for the requested object.
pub fn is_not_found(error: &kube::Error) -> bool {
    matches!(error, kube::Error::Api(api_err) if api_err.code == 404)
}
