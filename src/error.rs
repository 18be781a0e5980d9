use thiserror::Error;

/// Errors that can occur while analysing an ingredient list.
///
/// The `Display` output of every variant is meant to be shown to the user
/// as-is.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The ingredient list was empty or whitespace-only
    #[error("Please enter some ingredients.")]
    Validation,

    /// The API answered with a non-success status
    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// The API answered successfully but carried no generated text
    #[error("The AI returned an empty or invalid response.")]
    EmptyResponse,

    /// The generated text was not valid JSON
    #[error("The AI's response was not in a valid format.")]
    MalformedResponse,

    /// The request never produced an HTTP response
    ///
    /// Built through `From`, which strips the URL: it carries the API key.
    #[error("Failed to reach the AI service: {0}")]
    Transport(reqwest::Error),

    /// No API key was found in the config file or environment
    #[error("GEMINI_API_KEY is not set (config file or environment)")]
    MissingApiKey,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        AnalysisError::Transport(err.without_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_includes_status_and_server_text() {
        let err = AnalysisError::Api {
            status: 500,
            message: "quota exceeded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API request failed with status 500: quota exceeded"
        );
    }

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            AnalysisError::Validation.to_string(),
            "Please enter some ingredients."
        );
        assert!(AnalysisError::EmptyResponse.to_string().contains("empty"));
        assert!(AnalysisError::MalformedResponse
            .to_string()
            .contains("not in a valid format"));
    }
}
