//! Invent a dish from a list of ingredients and estimate its nutrients.
//!
//! The ingredient list and dietary toggles are turned into a prompt for
//! Google's Gemini API, the JSON answer is validated and converted into
//! proportional nutrient bars, and the dish name can be revealed with a
//! [`Typewriter`].
//!
//! ```no_run
//! # use nutrition_analyst::{analyze_nutrition, render, DietaryFlags};
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let result = analyze_nutrition("avocado, whole wheat bread", DietaryFlags::default()).await?;
//! match render(&result) {
//!     Ok(rendered) => println!("{}", rendered),
//!     Err(notice) => eprintln!("{}", notice),
//! }
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod config;
pub mod error;
pub mod model;
pub mod providers;
pub mod render;
pub mod session;
pub mod typewriter;
pub mod value;

pub use analyzer::NutritionAnalyzer;
pub use config::AnalystConfig;
pub use error::AnalysisError;
pub use model::{AnalysisRequest, AnalysisResult, DietaryFlags, NutrientEntry};
pub use providers::{build_prompt, GeminiProvider, LlmProvider};
pub use render::{render, to_display_bars, DisplayBar, RenderedAnalysis, ShapeValidationFailure};
pub use session::AnalysisSession;
pub use typewriter::Typewriter;
pub use value::{parse_leading_number, parse_leading_number_value};

/// Analyse `ingredients` using the process-wide configuration.
///
/// Loads the configuration on first use; fails with
/// [`AnalysisError::MissingApiKey`] when no key is configured.
pub async fn analyze_nutrition(
    ingredients: &str,
    flags: DietaryFlags,
) -> Result<AnalysisResult, AnalysisError> {
    let config = config::init()?;
    NutritionAnalyzer::from_config(config)?
        .analyze(ingredients, flags)
        .await
}
