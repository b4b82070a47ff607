//! Plain text presentation of a scaled recipe

use std::io::{self, Write};

use crate::{
    error::RecipeError,
    instructions::{strip_tags, Instructions},
    model::Diet,
    price::{CurrencyConversion, PricePerServing},
    scale::{ScaledIngredient, ScaledRecipe},
};

/// Shown in place of any missing value
pub const UNAVAILABLE: &str = "N/A";

const BADGES: [(Diet, &str, &str); 5] = [
    (Diet::VEGETARIAN, "green_salad", "Vegetarian"),
    (Diet::VEGAN, "seedling", "Vegan"),
    (Diet::GLUTEN_FREE, "ear_of_rice", "Gluten-Free"),
    (Diet::DAIRY_FREE, "milk_glass", "Dairy-Free"),
    (Diet::VERY_HEALTHY, "muscle", "Very Healthy"),
];

fn emoji(shortcode: &str) -> &'static str {
    emojis::get_by_shortcode(shortcode).map_or("", |e| e.as_str())
}

/// Heading with its emoji
fn heading(shortcode: &str, text: &str) -> String {
    match emoji(shortcode) {
        "" => text.to_string(),
        e => format!("{e} {text}"),
    }
}

/// A value followed by `suffix`, or [`UNAVAILABLE`]
pub fn format_amount(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(v) => format!("{v}{suffix}"),
        None => UNAVAILABLE.to_string(),
    }
}

/// Badges of the diet in a fixed order, joined by a dot
pub fn diet_badges(diet: Diet) -> String {
    BADGES
        .iter()
        .filter(|(flag, _, _)| diet.contains(*flag))
        .map(|(_, code, label)| heading(code, label))
        .collect::<Vec<_>>()
        .join("  ·  ")
}

/// One ingredient line, like `- Penne — 2 lb`
pub fn ingredient_line(ingredient: &ScaledIngredient) -> String {
    let line = format!(
        "- {} — {} {}",
        ingredient.ingredient.display_name(),
        format_amount(ingredient.amount, ""),
        ingredient.ingredient.unit.as_deref().unwrap_or("")
    );
    line.trim().to_string()
}

/// Writes the whole recipe
pub fn write_recipe(
    recipe: &ScaledRecipe,
    currency: &CurrencyConversion,
    w: &mut impl Write,
) -> io::Result<()> {
    let detail = recipe.recipe;
    let target = recipe.target;

    writeln!(w, "{}", heading("pushpin", &detail.display_title()))?;
    if let Some(image) = &detail.image_url {
        writeln!(w, "{}", heading("camera", image))?;
    }
    if let Some(summary) = &detail.summary_html {
        let summary = strip_tags(summary);
        if !summary.trim().is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", summary.trim())?;
        }
    }
    let badges = diet_badges(detail.diet);
    if !badges.is_empty() {
        writeln!(w)?;
        writeln!(w, "{badges}")?;
    }

    writeln!(w)?;
    writeln!(w, "{}", heading("bar_chart", "Details"))?;
    let ready = detail
        .ready_in_minutes
        .map(|m| format!("{m} min"))
        .unwrap_or_else(|| UNAVAILABLE.to_string());
    let price = match PricePerServing::from_cents(detail.price_per_serving, currency) {
        Some(p) => format!(
            "{} ({})",
            p.primary_display(currency),
            p.secondary_display(currency)
        ),
        None => format!("{UNAVAILABLE} ({UNAVAILABLE})"),
    };
    writeln!(w, "  {}: {}", heading("plate_with_cutlery", "Servings"), target.desired())?;
    writeln!(w, "  {}: {ready}", heading("stopwatch", "Ready In"))?;
    writeln!(w, "  {}: {price}", heading("moneybag", "Price/Serving"))?;

    writeln!(w)?;
    writeln!(w, "{}", heading("carrot", "Ingredients"))?;
    if !target.is_identity() {
        let caption = format!(
            "Scaled from {} → {} serving(s)",
            target.original(),
            target.desired()
        );
        writeln!(w, "  {}", heading("triangular_ruler", &caption))?;
    }
    if recipe.ingredients.is_empty() {
        writeln!(w, "  No ingredients available.")?;
    }
    for ingredient in &recipe.ingredients {
        writeln!(w, "  {}", ingredient_line(ingredient))?;
    }

    writeln!(w)?;
    writeln!(w, "{}", heading("memo", "Instructions"))?;
    match Instructions::parse(detail.instructions_html.as_deref()) {
        Instructions::Steps(steps) => {
            for step in steps {
                writeln!(w, "  Step {}. {}", step.number, step.text)?;
            }
        }
        Instructions::Text(text) => writeln!(w, "  {text}")?,
        Instructions::Missing => writeln!(w, "  No instructions available.")?,
    }

    writeln!(w)?;
    writeln!(w, "{}", heading("bento", "Nutrition Information"))?;
    if !target.is_identity() {
        let caption = format!("Nutrition scaled for {} serving(s)", target.desired());
        writeln!(w, "  {}", heading("triangular_ruler", &caption))?;
    }
    match &recipe.nutrition {
        Some(facts) => {
            for (nutrient, amount) in facts.iter() {
                writeln!(
                    w,
                    "  {}: {}",
                    heading(nutrient.emoji_shortcode(), nutrient.label()),
                    format_amount(amount, nutrient.suffix())
                )?;
            }
        }
        None => writeln!(w, "  Nutrition data not available for this recipe.")?,
    }

    Ok(())
}

/// Writes a failed lookup as a message for the user
pub fn write_error(err: &RecipeError, w: &mut impl Write) -> io::Result<()> {
    let shortcode = match err {
        RecipeError::NotFound { .. } => "confused",
        RecipeError::Network { .. } => "boom",
        RecipeError::Api { .. } | RecipeError::Decode { .. } => "warning",
    };
    writeln!(w, "{}", heading(shortcode, &err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Ingredient, RecipeDetail};

    fn render(recipe: &RecipeDetail, servings: u32) -> String {
        let mut out = Vec::new();
        write_recipe(
            &recipe.scale_to_servings(servings),
            &CurrencyConversion::default(),
            &mut out,
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn amounts() {
        assert_eq!(format_amount(Some(2.0), ""), "2");
        assert_eq!(format_amount(Some(18.75), " g"), "18.75 g");
        assert_eq!(format_amount(None, " g"), "N/A");
    }

    #[test]
    fn badges_in_order() {
        let badges = diet_badges(Diet::VERY_HEALTHY | Diet::VEGAN);
        let vegan = badges.find("Vegan").unwrap();
        let healthy = badges.find("Very Healthy").unwrap();
        assert!(vegan < healthy);
        assert!(badges.contains("  ·  "));
        assert_eq!(diet_badges(Diet::empty()), "");
    }

    #[test]
    fn ingredient_without_unit_or_amount() {
        let ingredient = Ingredient {
            name: Some("salt".into()),
            amount: None,
            unit: None,
        };
        let recipe: RecipeDetail = serde_json::from_str("{}").unwrap();
        let target = recipe.scale_to_servings(1).target;
        assert_eq!(ingredient_line(&ingredient.scale(target)), "- Salt — N/A");
    }

    #[test]
    fn empty_recipe_degrades() {
        let recipe: RecipeDetail = serde_json::from_str("{}").unwrap();
        let text = render(&recipe, 1);
        assert!(text.contains("Unknown"));
        assert!(text.contains("Ready In: N/A"));
        assert!(text.contains("Price/Serving: N/A (N/A)"));
        assert!(text.contains("No ingredients available."));
        assert!(text.contains("No instructions available."));
        assert!(text.contains("Nutrition data not available for this recipe."));
        assert!(!text.contains("Scaled from"));
    }

    #[test]
    fn scaled_captions() {
        let recipe: RecipeDetail = serde_json::from_str(
            r#"{"title": "soup", "servings": 2, "pricePerServing": 150,
                "extendedIngredients": [{"name": "water", "amount": 1.5, "unit": "l"}],
                "nutrition": {"nutrients": [{"name": "Calories", "amount": 100}]}}"#,
        )
        .unwrap();
        let text = render(&recipe, 4);
        assert!(text.contains("Scaled from 2 → 4 serving(s)"));
        assert!(text.contains("Nutrition scaled for 4 serving(s)"));
        assert!(text.contains("- Water — 3 l"));
        assert!(text.contains("Calories: 200"));
        assert!(text.contains("Protein: N/A"));
        assert!(text.contains("$1.50 (approx Rs. 210)"));
    }
}
