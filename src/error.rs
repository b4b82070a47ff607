//! Error types for looking up and fetching recipes.

use thiserror::Error;

use crate::client::TransportError;

/// Which of the two remote calls failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Stage {
    /// Resolving a dish name to a recipe id
    #[strum(serialize = "Search")]
    Search,
    /// Fetching the full recipe information
    #[strum(serialize = "Recipe Info")]
    Info,
}

/// Failures of a single lookup
///
/// Missing optional fields in an otherwise valid response are not errors,
/// they are [`None`]s in the [`model`](crate::model).
#[derive(Debug, Error)]
pub enum RecipeError {
    /// The request never got a response (DNS, refused connection, timeout...)
    #[error("Network error: {source}")]
    Network {
        stage: Stage,
        #[source]
        source: TransportError,
    },

    /// The API answered with a non success status
    #[error("{stage} API error: {status} - {body}")]
    Api {
        stage: Stage,
        status: u16,
        body: String,
    },

    /// The search came back empty
    #[error("No recipe found for '{query}'. Try another dish name!")]
    NotFound { query: String },

    /// The API answered with success but the body is not what we expect
    #[error("{stage} API returned an unreadable response: {source}")]
    Decode {
        stage: Stage,
        #[source]
        source: serde_json::Error,
    },
}

impl RecipeError {
    /// The user can fix this by changing the query
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Trying again later may work
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// The call that failed, if any was made
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Network { stage, .. } | Self::Api { stage, .. } | Self::Decode { stage, .. } => {
                Some(*stage)
            }
            Self::NotFound { .. } => Some(Stage::Search),
        }
    }
}
