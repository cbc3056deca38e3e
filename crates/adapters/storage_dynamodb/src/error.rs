//! Storage-specific error type wrapping AWS SDK errors.

use todohub_domain::error::TodoError;

/// Errors originating from the `DynamoDB` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A request to the service failed.
    #[error("dynamodb request failed")]
    Dynamo(#[from] aws_sdk_dynamodb::Error),

    /// A request could not be assembled.
    #[error("invalid dynamodb request")]
    Build(#[from] aws_sdk_dynamodb::error::BuildError),

    /// A stored item is missing an attribute or holds an unexpected type.
    #[error("item attribute {attribute:?} is missing or not a string")]
    MissingAttribute { attribute: &'static str },

    /// A stored attribute holds a value the domain rejects.
    #[error("item attribute {attribute:?} is malformed")]
    MalformedAttribute {
        attribute: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StorageError {
    /// Convert any operation-level SDK error into the service-wide error.
    pub(crate) fn sdk<E>(err: E) -> Self
    where
        aws_sdk_dynamodb::Error: From<E>,
    {
        Self::Dynamo(aws_sdk_dynamodb::Error::from(err))
    }
}

impl From<StorageError> for TodoError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
