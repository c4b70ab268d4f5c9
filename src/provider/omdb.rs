use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{MovieProvider, Person, ProviderError, ProviderRecord};

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error", default)]
    error: Option<String>,
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Type")]
    kind: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbDetail {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error", default)]
    error: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Type")]
    kind: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "imdbRating")]
    rating: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
}

/// OMDb (https://www.omdbapi.com) client.
pub struct OmdbProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OmdbProvider {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn request(&self, params: &[(&str, &str)]) -> reqwest::RequestBuilder {
        self.client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .header("Accept", "application/json")
    }

    async fn get_text(&self, params: &[(&str, &str)]) -> Result<String, ProviderError> {
        let response = self
            .request(params)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(format!("Failed to reach OMDb: {}", e)))?;

        if !response.status().is_success() {
            return Err(ProviderError::Transport(format!("OMDb API error: {}", response.status())));
        }

        response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(format!("Failed to read OMDb response: {}", e)))
    }
}

#[async_trait]
impl MovieProvider for OmdbProvider {
    async fn search(&self, title: &str) -> Result<Vec<ProviderRecord>, ProviderError> {
        log::info!("🎬 Searching OMDb for title: {}", title);

        let body = self.get_text(&[("s", title)]).await?;
        let records = parse_search(&body)?;

        log::info!("✅ Found {} results for '{}'", records.len(), title);
        Ok(records)
    }

    async fn fetch_by_id(&self, external_id: &str) -> Result<Option<ProviderRecord>, ProviderError> {
        log::info!("🎬 Fetching OMDb details: {}", external_id);

        let body = self.get_text(&[("i", external_id), ("plot", "full")]).await?;
        parse_detail(&body)
    }
}

fn parse_search(body: &str) -> Result<Vec<ProviderRecord>, ProviderError> {
    let parsed: OmdbSearchResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Malformed(format!("search: {}", e)))?;

    if parsed.response != "True" {
        let error = parsed.error.unwrap_or_default();
        // Very short titles are answered with "Too many results."
        if is_not_found(&error) || error.to_lowercase().contains("too many results") {
            return Ok(vec![]);
        }
        return Err(ProviderError::Transport(format!("OMDb refused search: {}", error)));
    }

    Ok(parsed
        .search
        .into_iter()
        .map(|item| ProviderRecord {
            id: item.imdb_id,
            kind: available(item.kind),
            title: available(item.title),
            year: available(item.year).as_deref().and_then(parse_year),
            cover_url: available(item.poster),
            ..Default::default()
        })
        .collect())
}

fn parse_detail(body: &str) -> Result<Option<ProviderRecord>, ProviderError> {
    let parsed: OmdbDetail = serde_json::from_str(body)
        .map_err(|e| ProviderError::Malformed(format!("detail: {}", e)))?;

    if parsed.response != "True" {
        let error = parsed.error.unwrap_or_default();
        if is_not_found(&error) {
            return Ok(None);
        }
        return Err(ProviderError::Transport(format!("OMDb refused lookup: {}", error)));
    }

    let id = parsed
        .imdb_id
        .ok_or_else(|| ProviderError::Malformed("detail without imdbID".to_string()))?;

    Ok(Some(ProviderRecord {
        id,
        kind: available(parsed.kind),
        title: available(parsed.title),
        year: available(parsed.year).as_deref().and_then(parse_year),
        cover_url: available(parsed.poster),
        rating: available(parsed.rating).and_then(|r| r.parse::<f64>().ok()),
        genres: available(parsed.genre).map(|g| split_list(&g)),
        directors: available(parsed.director)
            .map(|d| split_list(&d).into_iter().map(|name| Person { name }).collect()),
        synopsis: available(parsed.plot).map(|p| vec![p]),
    }))
}

fn is_not_found(error: &str) -> bool {
    let lowered = error.to_lowercase();
    lowered.contains("not found") || lowered.contains("incorrect imdb id")
}

/// OMDb spells absent values as "N/A".
fn available(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != NOT_AVAILABLE)
}

/// Leading four digits, so "2010–2013" gives 2010.
fn parse_year(raw: &str) -> Option<i32> {
    raw.get(..4).and_then(|y| y.parse::<i32>().ok())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
