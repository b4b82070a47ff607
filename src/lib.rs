//! Find a recipe by dish name and scale it to any number of servings.
//!
//! Recipes come from the [Spoonacular](https://spoonacular.com/food-api)
//! recipe API. A lookup makes two sequential requests, a search for the dish
//! and a request for the full information of the best match. The result is
//! a [`RecipeDetail`] which can be [scaled](RecipeDetail::scale_to_servings)
//! to any number of servings without changing it.
//!
//! Also includes:
//! - Splitting instruction markup into numbered [steps](Instructions).
//! - Lookup of the [tracked nutrients](nutrition::TrackedNutrient).
//! - Price per serving [conversion](PricePerServing) to a second currency.
//! - A plain text [renderer](render).
//!
//! # Basic usage
//!
//! ```no_run
//! # use recipe_finder::{Config, Query, RecipeFinder};
//! let config = Config::load(None)?;
//! let finder = RecipeFinder::new(&config)?;
//!
//! let query = Query::new("lentil soup", 4)?;
//! let recipe = finder.find(&query)?;
//! let scaled = recipe.scale_to_servings(query.desired_servings());
//!
//! recipe_finder::render::write_recipe(&scaled, finder.currency(), &mut std::io::stdout())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The HTTP layer can be replaced with anything implementing
//! [`client::Transport`], like the [`client::FakeTransport`] used in tests.

#![warn(rustdoc::broken_intra_doc_links, clippy::doc_markdown)]

pub mod client;
pub mod config;
pub mod error;
pub mod instructions;
pub mod model;
pub mod nutrition;
pub mod price;
pub mod query;
pub mod render;
pub mod scale;

pub use client::{HttpTransport, RecipeClient, Transport, TransportError};
pub use config::Config;
pub use error::RecipeError;
pub use instructions::{Instructions, ParsedStep};
pub use model::*;
pub use nutrition::{Nutrient, NutritionFacts, TrackedNutrient};
pub use price::{CurrencyConversion, PricePerServing};
pub use query::Query;
pub use scale::{ScaleTarget, ScaledRecipe, Servings};

/// Looks up recipes
///
/// Holds the API client and the display settings from a [`Config`]. One
/// instance can serve any number of queries, each one independent from the
/// others.
#[derive(Debug, Clone)]
pub struct RecipeFinder<T = HttpTransport> {
    client: RecipeClient<T>,
    currency: CurrencyConversion,
}

impl RecipeFinder<HttpTransport> {
    /// Creates a new finder doing real HTTP requests
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        Ok(Self {
            client: RecipeClient::new(config)?,
            currency: config.currency.clone(),
        })
    }
}

impl<T: Transport> RecipeFinder<T> {
    /// Creates a new finder with a custom transport
    pub fn with_transport(transport: T, config: &Config) -> Self {
        Self {
            client: RecipeClient::with_transport(transport, config),
            currency: config.currency.clone(),
        }
    }

    pub fn client(&self) -> &RecipeClient<T> {
        &self.client
    }

    /// Currency settings used to show prices
    pub fn currency(&self) -> &CurrencyConversion {
        &self.currency
    }

    /// Search the dish and fetch the best match
    ///
    /// If the search fails, no second request is made.
    #[tracing::instrument(level = "debug", name = "find", skip_all, fields(dish = query.dish_name()))]
    pub fn find(&self, query: &Query) -> Result<RecipeDetail, RecipeError> {
        let id = self.client.locate(query.dish_name())?;
        self.client.fetch(id)
    }
}
