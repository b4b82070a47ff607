//! Nutrients of a recipe and the ones we track

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::scale::{number_from_json, ScaleTarget};

/// A named measurement, like calories or protein
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNutrient")]
pub struct Nutrient {
    pub name: String,
    /// Amount for one serving of the recipe
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Deserialize)]
struct RawNutrient {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    amount: Option<serde_json::Value>,
    #[serde(default)]
    unit: Option<String>,
}

impl From<RawNutrient> for Nutrient {
    fn from(raw: RawNutrient) -> Self {
        let amount = raw.amount.as_ref().and_then(number_from_json);
        if raw.amount.is_some() && amount.is_none() {
            tracing::warn!(name = ?raw.name, raw = ?raw.amount, "unreadable nutrient amount");
        }
        Self {
            name: raw.name.unwrap_or_default(),
            amount,
            unit: raw.unit,
        }
    }
}

/// Finds a nutrient by name, ignoring case
///
/// If more than one matches, the first one wins.
pub fn find_nutrient<'a>(nutrients: &'a [Nutrient], name: &str) -> Option<&'a Nutrient> {
    let name = name.to_lowercase();
    nutrients.iter().find(|n| n.name.to_lowercase() == name)
}

/// Amount of a nutrient by name, ignoring case
pub fn nutrient_amount(nutrients: &[Nutrient], name: &str) -> Option<f64> {
    find_nutrient(nutrients, name).and_then(|n| n.amount)
}

/// The nutrients shown for every recipe
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
pub enum TrackedNutrient {
    Calories,
    Protein,
    Carbohydrates,
    Fat,
    Sugar,
    Fiber,
}

impl TrackedNutrient {
    /// Name used by the API
    pub fn api_name(self) -> &'static str {
        self.into()
    }

    /// Short name for display
    pub fn label(self) -> &'static str {
        match self {
            Self::Carbohydrates => "Carbs",
            other => other.api_name(),
        }
    }

    /// Appended to the amount when displayed
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Calories => "",
            _ => " g",
        }
    }

    pub(crate) fn emoji_shortcode(self) -> &'static str {
        match self {
            Self::Calories => "fire",
            Self::Protein => "cut_of_meat",
            Self::Carbohydrates => "bread",
            Self::Fat => "butter",
            Self::Sugar => "candy",
            Self::Fiber => "ear_of_rice",
        }
    }
}

/// Scaled amounts of every [`TrackedNutrient`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionFacts {
    values: Vec<(TrackedNutrient, Option<f64>)>,
}

impl NutritionFacts {
    /// Looks up every [`TrackedNutrient`] and scales its amount
    pub fn scaled(nutrients: &[Nutrient], target: ScaleTarget) -> Self {
        let values = TrackedNutrient::iter()
            .map(|n| (n, target.apply(nutrient_amount(nutrients, n.api_name()))))
            .collect();
        Self { values }
    }

    /// Scaled amount of a tracked nutrient, [`None`] if the recipe lacks it
    pub fn get(&self, nutrient: TrackedNutrient) -> Option<f64> {
        self.values
            .iter()
            .find(|(n, _)| *n == nutrient)
            .and_then(|(_, v)| *v)
    }

    /// All tracked nutrients in display order
    pub fn iter(&self) -> impl Iterator<Item = (TrackedNutrient, Option<f64>)> + '_ {
        self.values.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::Servings;

    fn nutrient(name: &str, amount: f64) -> Nutrient {
        Nutrient {
            name: name.to_string(),
            amount: Some(amount),
            unit: None,
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let nutrients = vec![nutrient("CALORIES", 250.0)];
        assert_eq!(nutrient_amount(&nutrients, "calories"), Some(250.0));
        assert_eq!(nutrient_amount(&nutrients, "Protein"), None);
    }

    #[test]
    fn first_match_wins() {
        let nutrients = vec![nutrient("Fat", 10.0), nutrient("fat", 99.0)];
        assert_eq!(nutrient_amount(&nutrients, "FAT"), Some(10.0));
    }

    #[test]
    fn no_partial_matches() {
        let nutrients = vec![nutrient("Saturated Fat", 3.0)];
        assert_eq!(nutrient_amount(&nutrients, "Fat"), None);
    }

    #[test]
    fn facts_are_scaled() {
        let nutrients = vec![
            nutrient("Calories", 300.0),
            nutrient("Protein", 12.5),
            nutrient("Net Carbohydrates", 40.0),
        ];
        let target = ScaleTarget::new(Servings::new(2.0).unwrap(), 3);
        let facts = NutritionFacts::scaled(&nutrients, target);
        assert_eq!(facts.get(TrackedNutrient::Calories), Some(450.0));
        assert_eq!(facts.get(TrackedNutrient::Protein), Some(18.75));
        assert_eq!(facts.get(TrackedNutrient::Carbohydrates), None);
        assert_eq!(facts.iter().count(), 6);
    }

    #[test]
    fn amount_as_string() {
        let n: Nutrient = serde_json::from_str(r#"{"name": "Sugar", "amount": "7.5"}"#).unwrap();
        assert_eq!(n.amount, Some(7.5));
        let n: Nutrient = serde_json::from_str(r#"{"name": "Sugar", "amount": "lots"}"#).unwrap();
        assert_eq!(n.amount, None);
    }
}
