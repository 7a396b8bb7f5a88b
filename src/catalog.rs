//! Read access to the hosted knowledge base.

use std::future::Future;
use std::time::Duration;

use reqwest::Url;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use crate::config::BackendConfig;
use crate::model::{Category, Question, Subcategory};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("backend URL is not configured (set [backend].url or PREP_SUPABASE_URL)")]
    NotConfigured,
    #[error("invalid backend URL `{0}`")]
    InvalidUrl(String),
    #[error("anon key contains characters not allowed in an HTTP header")]
    InvalidKey,
    #[error("category `{0}` not found")]
    NotFound(String),
    #[error("topic `{topic}` not found in category `{category}`")]
    TopicNotFound { category: String, topic: String },
    #[error("failed to load {table}: {source}")]
    Fetch {
        table: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to load {table}: HTTP {status}: {body}")]
    Status {
        table: &'static str,
        status: u16,
        body: String,
    },
}

/// The three read operations the browser needs from a backend.
pub trait Catalog {
    /// All categories, ordered by name.
    fn list_categories(&self) -> impl Future<Output = Result<Vec<Category>, CatalogError>> + Send;

    /// Topics of one category, ordered by name.
    fn list_subcategories(
        &self,
        category_id: i64,
    ) -> impl Future<Output = Result<Vec<Subcategory>, CatalogError>> + Send;

    /// Questions of one topic, ordered by id.
    fn list_questions(
        &self,
        subcategory_id: i64,
    ) -> impl Future<Output = Result<Vec<Question>, CatalogError>> + Send;
}

/// Catalog backed by a Supabase project's PostgREST endpoint.
pub struct SupabaseCatalog {
    base: Url,
    http: reqwest::Client,
}

impl SupabaseCatalog {
    pub fn new(config: &BackendConfig) -> Result<Self, CatalogError> {
        let url = config.url.trim();
        if url.is_empty() {
            return Err(CatalogError::NotConfigured);
        }

        // Trailing slash so `join` appends instead of replacing the last segment
        let base = Url::parse(&format!("{}/rest/v1/", url.trim_end_matches('/')))
            .map_err(|_| CatalogError::InvalidUrl(url.to_string()))?;

        let http = reqwest::Client::builder()
            .default_headers(build_headers(&config.anon_key)?)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| CatalogError::Fetch {
                table: "client",
                source,
            })?;

        Ok(Self { base, http })
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &'static str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, CatalogError> {
        let url = self
            .base
            .join(table)
            .map_err(|_| CatalogError::InvalidUrl(self.base.to_string()))?;

        tracing::debug!(%url, ?query, "fetching {table}");

        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| fetch_failed(table, source))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(table, status = status.as_u16(), %body, "backend rejected request");
            return Err(CatalogError::Status {
                table,
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<T> = response
            .json()
            .await
            .map_err(|source| fetch_failed(table, source))?;
        tracing::debug!(table, rows = rows.len(), "fetched");
        Ok(rows)
    }
}

impl Catalog for SupabaseCatalog {
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.select(
            "categories",
            &[
                ("select", "id,name,slug,description,overview".to_string()),
                ("order", "name.asc".to_string()),
            ],
        )
        .await
    }

    async fn list_subcategories(&self, category_id: i64) -> Result<Vec<Subcategory>, CatalogError> {
        self.select(
            "subcategories",
            &[
                ("select", "id,name,slug,category_id".to_string()),
                ("category_id", format!("eq.{category_id}")),
                ("order", "name.asc".to_string()),
            ],
        )
        .await
    }

    async fn list_questions(&self, subcategory_id: i64) -> Result<Vec<Question>, CatalogError> {
        self.select(
            "questions",
            &[
                ("select", "id,question,answer,difficulty".to_string()),
                ("subcategory_id", format!("eq.{subcategory_id}")),
                ("order", "id.asc".to_string()),
            ],
        )
        .await
    }
}

fn fetch_failed(table: &'static str, source: reqwest::Error) -> CatalogError {
    tracing::error!(table, error = %source, "fetch failed");
    CatalogError::Fetch { table, source }
}

fn build_headers(anon_key: &str) -> Result<HeaderMap, CatalogError> {
    let mut headers = HeaderMap::new();
    if anon_key.is_empty() {
        return Ok(headers);
    }
    let key = HeaderValue::from_str(anon_key).map_err(|_| CatalogError::InvalidKey)?;
    let bearer = HeaderValue::from_str(&format!("Bearer {anon_key}")).map_err(|_| CatalogError::InvalidKey)?;
    headers.insert("apikey", key);
    headers.insert(AUTHORIZATION, bearer);
    Ok(headers)
}
