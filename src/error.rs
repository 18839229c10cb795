use serde_json::Value;

pub type Result<T> = std::result::Result<T, BlueError>;

#[derive(Debug, thiserror::Error)]
pub enum BlueError {
    /// Network failure, timeout or an undecodable body.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The API answered with a non-empty `errors` array. Messages are joined with ", ".
    #[error("GraphQL Error: {0}")]
    GraphQl(String),

    /// The `data` object did not have the shape a typed query expected.
    #[error("Unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),

    /// Local parameter validation failed before anything was sent.
    #[error("{0}")]
    Validation(String),

    /// A later step of a multi-step operation failed. `applied` holds the
    /// results of the steps that already went through; they are not undone.
    #[error("{step}: {source}")]
    Step {
        step: String,
        #[source]
        source: Box<BlueError>,
        applied: Vec<Value>,
    },

    #[error("Item {index} ({operation}) failed: {message}")]
    Item {
        index: usize,
        operation: String,
        message: String,
    },
}

impl BlueError {
    pub fn validation(message: impl Into<String>) -> Self {
        BlueError::Validation(message.into())
    }
}
