//! Recipe representation
//!
//! These types are decoded straight from the recipe API responses. Decoding
//! is lenient: every field but the recipe id of a search result may be
//! missing or `null`, and numbers may come as strings.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    nutrition::Nutrient,
    scale::{number_from_json, Servings},
};

/// Identifier of a recipe in the remote database
pub type RecipeId = u64;

/// Body of a search call
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResponse {
    /// Ranked matches, empty when the field is missing or `null`
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<SearchResult>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl SearchResponse {
    /// The best match, which is the first one returned
    pub fn best_match(&self) -> Option<&SearchResult> {
        self.results.first()
    }
}

/// One candidate of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "id")]
    pub recipe_id: RecipeId,
}

bitflags! {
    /// Dietary properties of a recipe
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct Diet: u8 {
        const VEGETARIAN   = 1 << 0;
        const VEGAN        = 1 << 1;
        const GLUTEN_FREE  = 1 << 2;
        const DAIRY_FREE   = 1 << 3;
        const VERY_HEALTHY = 1 << 4;
    }
}

/// A complete recipe, as fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecipe")]
pub struct RecipeDetail {
    pub id: Option<RecipeId>,
    /// Title as sent by the API, [`None`] if missing
    pub title: Option<String>,
    pub image_url: Option<String>,
    /// Servings the amounts are written for
    pub servings: Servings,
    pub ready_in_minutes: Option<u64>,
    /// Price per serving in cents
    pub price_per_serving: Option<f64>,
    pub diet: Diet,
    /// Summary with HTML markup
    pub summary_html: Option<String>,
    /// Instructions with HTML markup
    pub instructions_html: Option<String>,
    /// All the ingredients, in the order of the recipe
    pub ingredients: Vec<Ingredient>,
    /// Nutrients of one serving, empty if not available
    pub nutrition: Vec<Nutrient>,
}

impl RecipeDetail {
    /// Title for display, `"Unknown"` if the recipe has none
    pub fn display_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => title_case(t),
            _ => "Unknown".to_string(),
        }
    }
}

/// A recipe ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawIngredient")]
pub struct Ingredient {
    pub name: Option<String>,
    /// Amount for the recipe servings
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

impl Ingredient {
    /// Name for display: first letter uppercase, the rest lowercase
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => capitalize(n),
            _ => "Unknown".to_string(),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Every word starts uppercase, the rest lowercase
///
/// A word starts after anything that is not a letter, so
/// `"mom's pot-roast"` becomes `"Mom'S Pot-Roast"`.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecipe {
    #[serde(default)]
    id: Option<RecipeId>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    servings: Option<serde_json::Value>,
    #[serde(default)]
    ready_in_minutes: Option<serde_json::Value>,
    #[serde(default)]
    price_per_serving: Option<serde_json::Value>,
    #[serde(default)]
    vegetarian: Option<bool>,
    #[serde(default)]
    vegan: Option<bool>,
    #[serde(default)]
    gluten_free: Option<bool>,
    #[serde(default)]
    dairy_free: Option<bool>,
    #[serde(default)]
    very_healthy: Option<bool>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    instructions: Option<String>,
    #[serde(default)]
    extended_ingredients: Option<Vec<Ingredient>>,
    #[serde(default)]
    nutrition: Option<RawNutrition>,
}

#[derive(Deserialize)]
struct RawNutrition {
    #[serde(default)]
    nutrients: Option<Vec<Nutrient>>,
}

#[derive(Deserialize)]
struct RawIngredient {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    amount: Option<serde_json::Value>,
    #[serde(default)]
    unit: Option<String>,
}

impl From<RawIngredient> for Ingredient {
    fn from(raw: RawIngredient) -> Self {
        Self {
            name: raw.name,
            amount: raw.amount.as_ref().and_then(number_from_json),
            unit: raw.unit.filter(|u| !u.trim().is_empty()),
        }
    }
}

impl From<RawRecipe> for RecipeDetail {
    fn from(raw: RawRecipe) -> Self {
        let mut diet = Diet::empty();
        diet.set(Diet::VEGETARIAN, raw.vegetarian.unwrap_or(false));
        diet.set(Diet::VEGAN, raw.vegan.unwrap_or(false));
        diet.set(Diet::GLUTEN_FREE, raw.gluten_free.unwrap_or(false));
        diet.set(Diet::DAIRY_FREE, raw.dairy_free.unwrap_or(false));
        diet.set(Diet::VERY_HEALTHY, raw.very_healthy.unwrap_or(false));

        let non_empty = |s: Option<String>| s.filter(|s| !s.trim().is_empty());

        Self {
            id: raw.id,
            title: raw.title,
            image_url: non_empty(raw.image),
            servings: Servings::from_json(raw.servings.as_ref()),
            ready_in_minutes: raw
                .ready_in_minutes
                .as_ref()
                .and_then(number_from_json)
                .filter(|m| *m > 0.0)
                .map(|m| m.round() as u64),
            price_per_serving: raw.price_per_serving.as_ref().and_then(number_from_json),
            diet,
            summary_html: non_empty(raw.summary),
            instructions_html: non_empty(raw.instructions),
            ingredients: raw.extended_ingredients.unwrap_or_default(),
            nutrition: raw
                .nutrition
                .and_then(|n| n.nutrients)
                .unwrap_or_default(),
        }
    }
}
