use thiserror::Error;

/// Failures raised by the metric functions themselves.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    #[error("could not convert price {raw:?} at index {index} to float")]
    MalformedPrice { index: usize, raw: String },
}

/// Failures raised while deploying to or querying a function registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("an endpoint named '{0}' already exists; deploy with override to replace it")]
    AlreadyExists(String),

    #[error("unknown endpoint '{0}'")]
    UnknownEndpoint(String),

    #[error("endpoint '{name}' expects {expected} positional argument(s), got {got}")]
    Arity {
        name: String,
        expected: &'static str,
        got: usize,
    },

    #[error("argument {position} of '{name}': {source}")]
    InvalidArgument {
        name: String,
        position: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Metric(#[from] MetricError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
