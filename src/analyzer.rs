use log::{debug, error, info};
use serde_json::Value;

use crate::config::AnalystConfig;
use crate::error::AnalysisError;
use crate::model::{AnalysisRequest, AnalysisResult, DietaryFlags};
use crate::providers::{build_prompt, GeminiProvider, LlmProvider};

/// Sends ingredient lists to a model and parses what comes back.
pub struct NutritionAnalyzer {
    provider: Box<dyn LlmProvider>,
}

impl NutritionAnalyzer {
    /// Analyzer backed by the Gemini API described by `config`
    pub fn from_config(config: &AnalystConfig) -> Result<Self, AnalysisError> {
        Ok(Self::with_provider(Box::new(GeminiProvider::new(config)?)))
    }

    pub fn with_provider(provider: Box<dyn LlmProvider>) -> Self {
        NutritionAnalyzer { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Ask the model for a dish, nutrients and steps for `ingredients`.
    ///
    /// Whitespace-only input fails before any request is made. The parsed
    /// JSON is returned as-is; checking its shape is left to
    /// [`crate::render`].
    pub async fn analyze(
        &self,
        ingredients: &str,
        flags: DietaryFlags,
    ) -> Result<AnalysisResult, AnalysisError> {
        if ingredients.trim().is_empty() {
            return Err(AnalysisError::Validation);
        }

        let prompt = build_prompt(ingredients, &flags);
        info!(
            "Analyzing ingredients with {} (flags: {:?})",
            self.provider.provider_name(),
            flags
        );

        let text = self.provider.generate(&prompt).await.map_err(|e| {
            error!("Error in analyze: {}", e);
            e
        })?;

        let value: Value = serde_json::from_str(&text).map_err(|e| {
            error!("Failed to parse JSON response from AI ({}): {}", e, text);
            AnalysisError::MalformedResponse
        })?;
        debug!("Parsed analysis: {}", value);

        Ok(AnalysisResult::new(value))
    }

    /// Same as [`analyze`](Self::analyze), taking a request value
    pub async fn analyze_request(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        self.analyze(&request.ingredients, request.flags).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Provider that replays a canned answer and records prompts
    struct ScriptedProvider {
        reply: Mutex<Option<Result<String, AnalysisError>>>,
        calls: Arc<AtomicUsize>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedProvider {
        fn new(reply: Result<String, AnalysisError>) -> Self {
            ScriptedProvider {
                reply: Mutex::new(Some(reply)),
                calls: Arc::new(AtomicUsize::new(0)),
                prompts: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn provider_name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(AnalysisError::EmptyResponse))
        }
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_call() {
        let provider = ScriptedProvider::new(Ok("{}".to_string()));
        let calls = provider.calls.clone();
        let analyzer = NutritionAnalyzer::with_provider(Box::new(provider));

        for input in ["", "   ", "\n\t "] {
            let result = analyzer.analyze(input, DietaryFlags::default()).await;
            assert!(matches!(result, Err(AnalysisError::Validation)));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_parses_model_json() {
        let provider = ScriptedProvider::new(Ok(
            r#"{"dishName": "Tofu Scramble", "nutrients": []}"#.to_string(),
        ));
        let prompts = provider.prompts.clone();
        let analyzer = NutritionAnalyzer::with_provider(Box::new(provider));

        let flags = DietaryFlags {
            vegan: true,
            ..Default::default()
        };
        let result = analyzer.analyze("tofu, spinach", flags).await.unwrap();
        assert_eq!(result.dish_name(), Some("Tofu Scramble"));

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("tofu, spinach"));
        assert!(prompts[0].contains("strictly vegan"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_malformed() {
        let provider = ScriptedProvider::new(Ok("Here is your dish: Pasta!".to_string()));
        let analyzer = NutritionAnalyzer::with_provider(Box::new(provider));

        let result = analyzer.analyze("pasta", DietaryFlags::default()).await;
        let err = result.unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse));
        // The raw text is not part of the user message
        assert!(!err.to_string().contains("Pasta"));
    }

    #[tokio::test]
    async fn test_shape_is_not_checked_here() {
        let provider = ScriptedProvider::new(Ok(r#"{"unexpected": true}"#.to_string()));
        let analyzer = NutritionAnalyzer::with_provider(Box::new(provider));

        let result = analyzer.analyze("kale", DietaryFlags::default()).await.unwrap();
        assert_eq!(result.dish_name(), None);
    }

    #[tokio::test]
    async fn test_provider_errors_pass_through() {
        let provider = ScriptedProvider::new(Err(AnalysisError::Api {
            status: 500,
            message: "quota exceeded".to_string(),
        }));
        let analyzer = NutritionAnalyzer::with_provider(Box::new(provider));

        let err = analyzer
            .analyze_request(&AnalysisRequest::new("beans", DietaryFlags::default()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_from_config_requires_key() {
        let result = NutritionAnalyzer::from_config(&AnalystConfig::default());
        assert!(matches!(result, Err(AnalysisError::MissingApiKey)));
    }

    #[test]
    fn test_from_config_uses_gemini() {
        let config = AnalystConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        let analyzer = NutritionAnalyzer::from_config(&config).unwrap();
        assert_eq!(analyzer.provider_name(), "google");
    }
}
