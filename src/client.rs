//! Talking to the recipe API
//!
//! A lookup is two sequential GET requests: a search that resolves a dish
//! name to the id of the best match, and a request for the full recipe
//! information of that id. There are no retries and no caching.
//!
//! HTTP goes through the [`Transport`] trait so the calls can be tested
//! without a network. [`HttpTransport`] is the real one, [`FakeTransport`]
//! serves canned responses.

use std::{cell::RefCell, collections::HashMap, time::Duration};

use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::{
    config::Config,
    error::{RecipeError, Stage},
    model::{RecipeDetail, RecipeId, SearchResponse},
};

const SEARCH_PATH: &str = "recipes/complexSearch";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// A response with any status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request could not be completed
#[derive(Debug, Error)]
#[error(transparent)]
pub struct TransportError(Box<dyn std::error::Error + Send + Sync>);

impl TransportError {
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(err.into())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err)
    }
}

/// Something that can perform a GET request
pub trait Transport {
    fn get(&self, url: &Url) -> Result<HttpResponse, TransportError>;
}

/// Blocking HTTP transport with a per request timeout
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let inner = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { inner })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        let response = self.inner.get(url.clone()).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}

/// Canned response for a [`FakeTransport`]
#[derive(Debug, Clone)]
pub enum FakeResponse {
    /// Respond with a status and body
    Http(HttpResponse),
    /// Fail as if the network was down
    Unreachable(String),
}

/// Transport for tests
///
/// Responses are looked up by URL path, ignoring the query. Every requested
/// URL is recorded.
#[derive(Debug, Default)]
pub struct FakeTransport {
    responses: HashMap<String, FakeResponse>,
    requests: RefCell<Vec<Url>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response for a path
    pub fn with_response(mut self, path: &str, response: FakeResponse) -> Self {
        self.responses.insert(path.to_string(), response);
        self
    }

    /// Add a JSON response with status 200
    pub fn with_json(self, path: &str, body: &str) -> Self {
        self.with_status(path, 200, body)
    }

    /// Add a response with any status
    pub fn with_status(self, path: &str, status: u16, body: &str) -> Self {
        self.with_response(
            path,
            FakeResponse::Http(HttpResponse {
                status,
                body: body.to_string(),
            }),
        )
    }

    /// Make requests to a path fail at the network level
    pub fn with_unreachable(self, path: &str, reason: &str) -> Self {
        self.with_response(path, FakeResponse::Unreachable(reason.to_string()))
    }

    /// All the requested URLs, in order
    pub fn requests(&self) -> Vec<Url> {
        self.requests.borrow().clone()
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(url.clone());
        match self.responses.get(url.path()) {
            Some(FakeResponse::Http(response)) => Ok(response.clone()),
            Some(FakeResponse::Unreachable(reason)) => Err(TransportError::new(reason.clone())),
            None => Ok(HttpResponse {
                status: 404,
                body: format!("no fake response for {}", url.path()),
            }),
        }
    }
}

/// Client for the recipe search and recipe information endpoints
#[derive(Debug, Clone)]
pub struct RecipeClient<T = HttpTransport> {
    transport: T,
    base_url: Url,
    api_key: String,
}

impl RecipeClient<HttpTransport> {
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        Ok(Self::with_transport(HttpTransport::new(config.timeout)?, config))
    }
}

impl<T: Transport> RecipeClient<T> {
    pub fn with_transport(transport: T, config: &Config) -> Self {
        Self {
            transport,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path.split('/'));
        }
        url
    }

    /// URL of the search for a dish, asking for a single result
    pub fn search_url(&self, dish_name: &str) -> Url {
        let mut url = self.endpoint(SEARCH_PATH);
        url.query_pairs_mut()
            .append_pair("query", dish_name)
            .append_pair("number", "1")
            .append_pair("apiKey", &self.api_key);
        url
    }

    /// URL of the full information of a recipe, nutrition included
    pub fn info_url(&self, id: RecipeId) -> Url {
        let mut url = self.endpoint(&format!("recipes/{id}/information"));
        url.query_pairs_mut()
            .append_pair("includeNutrition", "true")
            .append_pair("apiKey", &self.api_key);
        url
    }

    /// Resolve a dish name to the id of the best matching recipe
    ///
    /// The API ranks the results, the first one is taken.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn locate(&self, dish_name: &str) -> Result<RecipeId, RecipeError> {
        let response: SearchResponse = self.get_json(Stage::Search, &self.search_url(dish_name))?;
        let best = response.best_match().ok_or_else(|| RecipeError::NotFound {
            query: dish_name.to_string(),
        })?;
        tracing::debug!(id = best.recipe_id, "search match");
        Ok(best.recipe_id)
    }

    /// Fetch the full information of a recipe
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn fetch(&self, id: RecipeId) -> Result<RecipeDetail, RecipeError> {
        self.get_json(Stage::Info, &self.info_url(id))
    }

    fn get_json<D: DeserializeOwned>(&self, stage: Stage, url: &Url) -> Result<D, RecipeError> {
        tracing::debug!(url = %redacted(url), "GET");
        let response = self
            .transport
            .get(url)
            .map_err(|source| RecipeError::Network { stage, source })?;

        if !response.is_success() {
            tracing::debug!(status = response.status, "unsuccessful response");
            return Err(RecipeError::Api {
                stage,
                status: response.status,
                body: response.body,
            });
        }

        serde_json::from_str(&response.body).map_err(|source| RecipeError::Decode { stage, source })
    }
}

/// The URL with the API key hidden, for logs
fn redacted(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "apiKey" { "***".into() } else { v };
            (k.into_owned(), v.into_owned())
        })
        .collect();
    let mut url = url.clone();
    url.query_pairs_mut().clear().extend_pairs(pairs);
    url
}
