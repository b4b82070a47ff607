//! What the user asks for

use serde::Serialize;
use thiserror::Error;

/// Smallest number of servings that can be requested
pub const MIN_SERVINGS: u32 = 1;
/// Largest number of servings that can be requested
pub const MAX_SERVINGS: u32 = 50;

/// A validated user submission
///
/// The dish name is trimmed and never empty, and the servings are always in
/// [`MIN_SERVINGS`]`..=`[`MAX_SERVINGS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    dish_name: String,
    desired_servings: u32,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Enter a dish name, for example: lentil soup, chocolate cake, spaghetti")]
    EmptyDish,

    #[error("Servings must be between {MIN_SERVINGS} and {MAX_SERVINGS}, got {0}")]
    ServingsOutOfRange(u32),
}

impl Query {
    pub fn new(dish_name: impl AsRef<str>, desired_servings: u32) -> Result<Self, QueryError> {
        let dish_name = dish_name.as_ref().trim();
        if dish_name.is_empty() {
            return Err(QueryError::EmptyDish);
        }
        if !(MIN_SERVINGS..=MAX_SERVINGS).contains(&desired_servings) {
            return Err(QueryError::ServingsOutOfRange(desired_servings));
        }
        Ok(Self {
            dish_name: dish_name.to_string(),
            desired_servings,
        })
    }

    pub fn dish_name(&self) -> &str {
        &self.dish_name
    }

    pub fn desired_servings(&self) -> u32 {
        self.desired_servings
    }
}
