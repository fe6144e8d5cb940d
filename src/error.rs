use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    // Configuration errors
    #[error("Missing required environment variable '{name}'")]
    MissingEnv { name: String },

    #[error("Invalid config: {message}")]
    ConfigValidation { message: String },

    // HTTP client errors
    #[error("Failed to build HTTP client: {source}")]
    HttpClient {
        #[source]
        source: reqwest::Error,
    },
}

pub type Result<T> = std::result::Result<T, BotError>;

/// Failure to obtain a user's raw profile from the REST API.
///
/// This is the only failure a profile lookup can report. Missing optional
/// profile data (no banner, no badges, no clan) is never an error.
#[derive(Error, Debug)]
pub enum ProfileFetchError {
    #[error("API returned status {status} for user {user_id}")]
    Status {
        user_id: u64,
        status: reqwest::StatusCode,
    },

    #[error("Request for user {user_id} failed: {source}")]
    Transport {
        user_id: u64,
        #[source]
        source: reqwest::Error,
    },

    #[error("Could not decode profile of user {user_id}: {message}")]
    Decode { user_id: u64, message: String },
}

impl ProfileFetchError {
    pub fn user_id(&self) -> u64 {
        match self {
            ProfileFetchError::Status { user_id, .. }
            | ProfileFetchError::Transport { user_id, .. }
            | ProfileFetchError::Decode { user_id, .. } => *user_id,
        }
    }

    /// Whether the request gave up because the client timeout elapsed
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProfileFetchError::Transport { source, .. } if source.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = ProfileFetchError::Status {
            user_id: 42,
            status: reqwest::StatusCode::NOT_FOUND,
        };
        assert_eq!(err.user_id(), 42);
        assert!(!err.is_timeout());
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_missing_env_message() {
        let err = BotError::MissingEnv {
            name: "DISCORD_TOKEN".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing required environment variable 'DISCORD_TOKEN'"
        );
    }
}
