use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Dietary toggles chosen alongside the ingredient list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietaryFlags {
    pub vegetarian: bool,
    pub vegan: bool,
    pub high_protein: bool,
}

impl DietaryFlags {
    /// Apply the input-side rule that vegan implies vegetarian.
    pub fn normalized(self) -> Self {
        Self {
            vegetarian: self.vegetarian || self.vegan,
            ..self
        }
    }
}

/// One submission: the ingredients as typed plus the dietary toggles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub ingredients: String,
    pub flags: DietaryFlags,
}

impl AnalysisRequest {
    pub fn new(ingredients: impl Into<String>, flags: DietaryFlags) -> Self {
        Self {
            ingredients: ingredients.into(),
            flags,
        }
    }
}

/// A nutrient as the model reported it, e.g. `Protein` / `"15g"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutrientEntry {
    pub name: String,
    pub value: String,
}

/// The JSON object returned by the model, parsed but not yet validated.
///
/// Expected shape:
/// `{ dishName, description?, nutrients: [{ name, value }], recipeSteps? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult(Value);

impl AnalysisResult {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn dish_name(&self) -> Option<&str> {
        self.0["dishName"].as_str()
    }
}
