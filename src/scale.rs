//! Support for recipe scaling
//!
//! Scaling never touches the fetched [`RecipeDetail`]. It produces a
//! [`ScaledRecipe`] that borrows from it and holds the scaled amounts.

use std::fmt::Display;

use serde::Serialize;

use crate::{
    model::{Ingredient, RecipeDetail},
    nutrition::NutritionFacts,
};

/// Number of servings a recipe is written for
///
/// Always a finite, positive number. Anything else found in a recipe is
/// replaced by 1.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Servings(f64);

impl Servings {
    /// Creates a new [`Servings`] if `value` is usable
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    /// Reads the servings field of a recipe as the API sent it
    ///
    /// Missing, zero, negative or non numeric values default to 1.
    pub fn from_json(value: Option<&serde_json::Value>) -> Self {
        let servings = value.and_then(number_from_json).and_then(Self::new);
        if servings.is_none() {
            tracing::warn!(raw = ?value, "unusable servings in recipe, assuming 1");
        }
        servings.unwrap_or_default()
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Servings {
    fn default() -> Self {
        Self(1.0)
    }
}

impl Display for Servings {
    /// Whole part only, the way the servings are shown to the user
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.trunc() as u64)
    }
}

/// Reads a JSON number, or a string holding one
pub(crate) fn number_from_json(value: &serde_json::Value) -> Option<f64> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Configures the scaling target
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleTarget {
    original: Servings,
    desired: u32,
    factor: f64,
}

impl ScaleTarget {
    /// Creates a new [`ScaleTarget`].
    ///
    /// The factor is `desired / original`.
    pub fn new(original: Servings, desired: u32) -> Self {
        Self {
            original,
            desired,
            factor: desired as f64 / original.value(),
        }
    }

    /// Get the calculated scaling factor
    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn original(&self) -> Servings {
        self.original
    }

    pub fn desired(&self) -> u32 {
        self.desired
    }

    /// Scaling to this target leaves every amount as it was
    pub fn is_identity(&self) -> bool {
        self.factor == 1.0
    }

    /// Scale a single amount
    ///
    /// See [`scale_value`].
    pub fn apply(&self, value: Option<f64>) -> Option<f64> {
        scale_value(value, self.factor)
    }
}

/// Rounds to 2 decimal places, on the exact binary value
///
/// `2.005` is stored as `2.00499999...` so it rounds down to `2.0`, and
/// `0.015` (`0.01499999...`) to `0.01`. Exact ties, only possible for
/// multiples of `1/8`, go to the even neighbour: `0.125` gives `0.12`.
pub fn round_to_hundredths(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // multiples of 1/8 are the only values with an exact tie, and for them
    // `value * 100` is exact
    if value.abs() < 1e15 && (value * 8.0).fract() == 0.0 {
        return (value * 100.0).round_ties_even() / 100.0;
    }
    // formatting rounds the exact value and there is no tie to break
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Multiplies a value by `factor` and rounds it with [`round_to_hundredths`]
///
/// A missing or non finite value stays unavailable.
pub fn scale_value(value: Option<f64>, factor: f64) -> Option<f64> {
    value
        .filter(|v| v.is_finite())
        .map(|v| round_to_hundredths(v * factor))
}

/// Possible outcomes from scaling a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScaleOutcome {
    /// Success
    Scaled,
    /// It has no amount, so it can't be scaled
    NoQuantity,
}

/// An ingredient with its amount scaled
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledIngredient<'a> {
    /// The original, untouched ingredient
    pub ingredient: &'a Ingredient,
    /// Scaled amount, if the ingredient had one
    pub amount: Option<f64>,
    pub outcome: ScaleOutcome,
}

impl Ingredient {
    /// Scale the amount of this ingredient
    pub fn scale(&self, target: ScaleTarget) -> ScaledIngredient<'_> {
        let amount = target.apply(self.amount);
        let outcome = if amount.is_some() {
            ScaleOutcome::Scaled
        } else {
            ScaleOutcome::NoQuantity
        };
        ScaledIngredient {
            ingredient: self,
            amount,
            outcome,
        }
    }
}

/// A recipe after being scaled
///
/// Derived from a [`RecipeDetail`] with [`RecipeDetail::scale_to_servings`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledRecipe<'a> {
    /// The original recipe
    pub recipe: &'a RecipeDetail,
    pub target: ScaleTarget,
    /// Same order as in the recipe
    pub ingredients: Vec<ScaledIngredient<'a>>,
    /// [`None`] when the recipe came without nutrition data
    pub nutrition: Option<NutritionFacts>,
}

impl RecipeDetail {
    /// Scale a recipe to a number of servings
    pub fn scale_to_servings(&self, desired: u32) -> ScaledRecipe<'_> {
        self.scale(ScaleTarget::new(self.servings, desired))
    }

    /// Scale a recipe to a target
    #[tracing::instrument(level = "debug", skip_all, fields(factor = target.factor()))]
    pub fn scale(&self, target: ScaleTarget) -> ScaledRecipe<'_> {
        let ingredients = self.ingredients.iter().map(|i| i.scale(target)).collect();
        let nutrition = if self.nutrition.is_empty() {
            None
        } else {
            Some(NutritionFacts::scaled(&self.nutrition, target))
        };
        ScaledRecipe {
            recipe: self,
            target,
            ingredients,
            nutrition,
        }
    }
}
