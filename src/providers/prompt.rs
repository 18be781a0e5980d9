use crate::model::DietaryFlags;

/// The prompt template sent to the model for every analysis.
///
/// It asks for an invented dish, a one-sentence description, six nutrient
/// estimates and cooking steps, and spells out the JSON object the response
/// must consist of.
///
/// The prompt is loaded from `prompt.txt` at compile time using the
/// `include_str!` macro, making it easy to edit without dealing with
/// Rust string syntax.
///
/// Contains `{{INGREDIENTS}}` and `{{CONSTRAINTS}}` placeholders that are
/// filled in by [`build_prompt`].
pub const NUTRITION_ANALYST_PROMPT: &str = include_str!("prompt.txt");

const VEGAN: &str = "strictly vegan (no meat, dairy, eggs, or honey)";
const VEGETARIAN: &str = "vegetarian (no meat or fish)";
const HIGH_PROTEIN: &str = "high in protein";

/// Build the dietary constraint sentence, or `None` when no flag is set.
///
/// Vegan takes precedence over vegetarian, so the two never appear together.
pub fn dietary_constraints(flags: &DietaryFlags) -> Option<String> {
    let mut constraints = Vec::new();
    if flags.vegan {
        constraints.push(VEGAN);
    } else if flags.vegetarian {
        constraints.push(VEGETARIAN);
    }
    if flags.high_protein {
        constraints.push(HIGH_PROTEIN);
    }

    if constraints.is_empty() {
        None
    } else {
        Some(format!(
            "The suggested dish must adhere to the following dietary constraints: {}.",
            constraints.join(" and ")
        ))
    }
}

/// Injects the ingredient list and dietary constraints into the template.
pub fn build_prompt(ingredients: &str, flags: &DietaryFlags) -> String {
    let constraints = dietary_constraints(flags).unwrap_or_default();
    // Constraints first so user text can never be mistaken for a placeholder
    NUTRITION_ANALYST_PROMPT
        .replace("{{CONSTRAINTS}}", &constraints)
        .replace("{{INGREDIENTS}}", ingredients)
}
