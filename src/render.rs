use log::{error, warn};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::model::{AnalysisResult, NutrientEntry};
use crate::value::parse_leading_number;

/// Reference maximum for nutrients missing from [`REFERENCE_MAXIMUMS`]
pub const DEFAULT_REFERENCE_MAX: f64 = 100.0;

/// Per-nutrient upper bounds used only to size the bars
pub const REFERENCE_MAXIMUMS: [(&str, f64); 6] = [
    ("Calories", 1000.0),
    ("Protein", 50.0),
    ("Carbohydrates", 100.0),
    ("Fat", 50.0),
    ("Fiber", 20.0),
    ("Sugar", 50.0),
];

/// Characters used for a full terminal bar
pub const BAR_COLUMNS: usize = 30;

/// The model answered with JSON that lacks `dishName` or a `nutrients` array
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("The AI returned data in an unexpected format.")]
pub struct ShapeValidationFailure;

/// One nutrient ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayBar {
    pub name: String,
    pub value: String,
    pub width_percent: f64,
}

impl DisplayBar {
    fn from_entry(entry: NutrientEntry) -> Self {
        let width_percent = bar_width(&entry.name, &entry.value);
        DisplayBar {
            name: entry.name,
            value: entry.value,
            width_percent,
        }
    }

    /// Filled/empty block gauge `columns` characters wide
    pub fn gauge(&self, columns: usize) -> String {
        let filled = ((self.width_percent / 100.0) * columns as f64).round() as usize;
        let filled = filled.min(columns);
        format!("{}{}", "█".repeat(filled), "░".repeat(columns - filled))
    }
}

/// A validated result, ready to be printed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedAnalysis {
    pub dish_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub bars: Vec<DisplayBar>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipe_steps: Vec<String>,
}

pub fn reference_max(name: &str) -> f64 {
    REFERENCE_MAXIMUMS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, max)| *max)
        .unwrap_or(DEFAULT_REFERENCE_MAX)
}

/// Proportional width in percent, clamped to 100
pub fn bar_width(name: &str, value: &str) -> f64 {
    let numeric = parse_leading_number(value);
    (numeric / reference_max(name) * 100.0).min(100.0)
}

fn dish_name(result: &AnalysisResult) -> Result<&str, ShapeValidationFailure> {
    result
        .dish_name()
        .filter(|name| !name.is_empty())
        .ok_or(ShapeValidationFailure)
}

fn nutrient_array(result: &AnalysisResult) -> Result<&Vec<Value>, ShapeValidationFailure> {
    result.as_value()["nutrients"]
        .as_array()
        .ok_or(ShapeValidationFailure)
}

fn nutrient_entry(value: &Value) -> Option<NutrientEntry> {
    let name = value["name"].as_str()?;
    let display = value["value"].as_str()?;
    Some(NutrientEntry {
        name: name.to_string(),
        value: display.to_string(),
    })
}

/// Turn the nutrients of a result into display bars.
///
/// Entries without a string `name` and `value` are skipped; the rest keep
/// their original order.
pub fn to_display_bars(result: &AnalysisResult) -> Result<Vec<DisplayBar>, ShapeValidationFailure> {
    if let Err(failure) = dish_name(result) {
        error!("Invalid analysis data: 'dishName' is missing: {}", result.as_value());
        return Err(failure);
    }
    let nutrients = nutrient_array(result).map_err(|failure| {
        error!("Invalid analysis data: 'nutrients' array is missing: {}", result.as_value());
        failure
    })?;

    let bars: Vec<DisplayBar> = nutrients
        .iter()
        .filter_map(nutrient_entry)
        .map(DisplayBar::from_entry)
        .collect();

    let dropped = nutrients.len() - bars.len();
    if dropped > 0 {
        warn!("Skipped {} malformed nutrient entries", dropped);
    }

    Ok(bars)
}

/// Validate a result and build everything the display needs.
pub fn render(result: &AnalysisResult) -> Result<RenderedAnalysis, ShapeValidationFailure> {
    let bars = to_display_bars(result)?;
    let value = result.as_value();

    let description = value["description"]
        .as_str()
        .filter(|description| !description.is_empty())
        .map(String::from);

    let recipe_steps = value["recipeSteps"]
        .as_array()
        .map(|steps| {
            steps
                .iter()
                .filter_map(|step| step.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default();

    Ok(RenderedAnalysis {
        dish_name: dish_name(result)?.to_string(),
        description,
        bars,
        recipe_steps,
    })
}

impl RenderedAnalysis {
    /// Width of the longest nutrient name, for aligning columns
    pub fn name_width(&self) -> usize {
        self.bars
            .iter()
            .map(|bar| bar.name.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// One aligned `name value gauge` line
    pub fn bar_line(&self, bar: &DisplayBar) -> String {
        format!(
            "  {:<width$}  {:>10}  {}",
            bar.name,
            bar.value,
            bar.gauge(BAR_COLUMNS),
            width = self.name_width()
        )
    }
}

impl fmt::Display for RenderedAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.dish_name)?;
        if let Some(description) = &self.description {
            writeln!(f, "{}", description)?;
        }

        writeln!(f)?;
        writeln!(f, "Estimated Nutritional Values")?;
        for bar in &self.bars {
            writeln!(f, "{}", self.bar_line(bar))?;
        }

        if !self.recipe_steps.is_empty() {
            writeln!(f)?;
            writeln!(f, "How to Make It")?;
            for (index, step) in self.recipe_steps.iter().enumerate() {
                writeln!(f, "  {}. {}", index + 1, step)?;
            }
        }
        Ok(())
    }
}
