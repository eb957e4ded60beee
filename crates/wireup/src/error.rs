//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for bootstrap wiring
#[derive(Error, Debug)]
pub enum Error {
    /// Module dependency declarations form a cycle
    #[error("cyclic module dependency: {cycle}")]
    CyclicDependency {
        /// The offending path, rendered as `A -> B -> A`
        cycle: String,
    },

    /// A declared dependency does not name a registered module type
    #[error("invalid dependency declaration: `{module}` is not a registered module")]
    InvalidDependencyDeclaration {
        /// Canonical name of the declared dependency type
        module: String,
    },

    /// No constructor registered for the requested type and signature
    #[error("no constructor registered for `{key}`")]
    NoMatchingConstructor {
        /// Canonical key of the requested (type, signature) pair
        key: String,
    },

    /// A constructor exists for the key but cannot be invoked
    #[error("constructor for `{key}` cannot be invoked: {reason}")]
    AmbiguousOrInaccessibleConstructor {
        /// Canonical key of the requested (type, signature) pair
        key: String,
        /// Why the constructor is unusable
        reason: String,
    },

    /// A module's own registration body failed
    #[error("registration failed in `{module}`: {message}")]
    Registration {
        /// Name of the module whose `apply` failed
        module: String,
        /// Description of the failure
        message: String,
    },

    /// Configuration-related error
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generic error from external sources
    #[error("generic error: {0}")]
    Generic(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Create a configuration error from a message
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a registration-body error for the named module
    pub fn registration(module: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Registration {
            module: module.into(),
            message: message.into(),
        }
    }
}
