//! TMDB (The Movie Database) v3 client.
//!
//! Covers the three calls the club needs: movie search, movie details with
//! credits, and a person's external ids (for IMDb profile links).

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::TmdbConfig;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<MovieSearchResult>,
}

#[derive(Debug, Deserialize)]
struct ExternalIds {
    imdb_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSearchResult {
    pub id: i32,
    #[serde(default)]
    pub title: String,
    pub original_title: Option<String>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
}

impl MovieSearchResult {
    /// Release year taken from `release_date` (`YYYY-MM-DD`).
    #[must_use]
    pub fn year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .filter(|year| year.chars().all(|c| c.is_ascii_digit()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: i32,
    #[serde(default)]
    pub title: String,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub credits: Credits,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    pub job: Option<String>,
    pub department: Option<String>,
    pub profile_path: Option<String>,
}

fn is_blank(value: Option<&String>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

impl MovieDetails {
    /// True when the overview or the tagline is missing.
    #[must_use]
    pub fn needs_fallback_text(&self) -> bool {
        is_blank(self.overview.as_ref()) || is_blank(self.tagline.as_ref())
    }

    /// Copies overview and tagline from `fallback`, but only into fields that are blank here.
    pub fn fill_missing_text(&mut self, fallback: Self) {
        if is_blank(self.overview.as_ref()) && !is_blank(fallback.overview.as_ref()) {
            self.overview = fallback.overview;
        }
        if is_blank(self.tagline.as_ref()) && !is_blank(fallback.tagline.as_ref()) {
            self.tagline = fallback.tagline;
        }
    }
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    config: TmdbConfig,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("filmclub/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build TMDB HTTP client")?;

        Ok(Self::with_shared_client(client, config))
    }

    #[must_use]
    pub const fn with_shared_client(client: Client, config: TmdbConfig) -> Self {
        Self { client, config }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.config.api_key.trim().is_empty()
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        let query = std::iter::once(("api_key", self.config.api_key.as_str()))
            .chain(params.iter().copied());

        Url::parse_with_params(&format!("{base}{path}"), query)
            .with_context(|| format!("Invalid TMDB URL for {path}"))
    }

    /// Sends a GET and decodes the JSON body. Error messages never carry the
    /// request URL, which contains the API key.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        if !self.is_configured() {
            anyhow::bail!("TMDB API key is not configured");
        }

        let url = self.endpoint(path, params)?;
        debug!(path, "TMDB request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("TMDB request failed: {path}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("TMDB API error on {path}: {status} - {body}");
        }

        response
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to decode TMDB response for {path}"))
    }

    pub async fn search_movies(&self, query: &str) -> Result<Vec<MovieSearchResult>> {
        let response: SearchResponse = self
            .get_json(
                "/search/movie",
                &[
                    ("query", query),
                    ("language", self.config.language.as_str()),
                    ("region", self.config.region.as_str()),
                ],
            )
            .await?;

        Ok(response.results)
    }

    /// Fetches details and credits in the primary language.
    ///
    /// A blank overview or tagline triggers a second request in the fallback
    /// language; its values only fill the blanks. When that second request
    /// fails the primary record is returned as is.
    pub async fn movie_details(&self, tmdb_id: i32) -> Result<MovieDetails> {
        let path = format!("/movie/{tmdb_id}");

        let mut details: MovieDetails = self
            .get_json(
                &path,
                &[
                    ("language", self.config.language.as_str()),
                    ("append_to_response", "credits"),
                ],
            )
            .await?;

        if details.needs_fallback_text() && self.config.fallback_language != self.config.language
        {
            match self
                .get_json::<MovieDetails>(&path, &[("language", self.config.fallback_language.as_str())])
                .await
            {
                Ok(fallback) => details.fill_missing_text(fallback),
                Err(e) => debug!("TMDB fallback lookup for {} failed: {:#}", tmdb_id, e),
            }
        }

        Ok(details)
    }

    pub async fn person_imdb_id(&self, person_id: i64) -> Result<Option<String>> {
        let ids: ExternalIds = self
            .get_json(&format!("/person/{person_id}/external_ids"), &[])
            .await?;

        Ok(ids.imdb_id.filter(|id| !id.trim().is_empty()))
    }

    /// IMDb profile URL for a TMDB person, if TMDB knows the mapping.
    pub async fn person_profile_url(&self, person_id: i64) -> Result<Option<String>> {
        Ok(self
            .person_imdb_id(person_id)
            .await?
            .map(|imdb_id| format!("{}{}/", self.config.profile_base_url, imdb_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TmdbClient {
        let config = TmdbConfig {
            api_key: "test-key".to_string(),
            base_url: server.uri(),
            ..TmdbConfig::default()
        };
        TmdbClient::new(config).unwrap()
    }

    fn details_body(overview: &str, tagline: &str) -> serde_json::Value {
        json!({
            "id": 10,
            "title": "Roma",
            "overview": overview,
            "tagline": tagline,
            "poster_path": "/roma.jpg",
            "genres": [{ "id": 18, "name": "Drama" }],
            "credits": {
                "cast": [{ "id": 1, "name": "Yalitza Aparicio", "character": "Cleo" }],
                "crew": [{ "id": 2, "name": "Alfonso Cuarón", "job": "Director" }]
            }
        })
    }

    #[test]
    fn test_fill_missing_text_keeps_primary_values() {
        let mut primary = MovieDetails {
            overview: Some(String::new()),
            tagline: Some("Primaria".to_string()),
            ..MovieDetails::default()
        };
        let fallback = MovieDetails {
            overview: Some("Fallback overview".to_string()),
            tagline: Some("Fallback tagline".to_string()),
            ..MovieDetails::default()
        };

        assert!(primary.needs_fallback_text());
        primary.fill_missing_text(fallback);

        assert_eq!(primary.overview.as_deref(), Some("Fallback overview"));
        assert_eq!(primary.tagline.as_deref(), Some("Primaria"));
        assert!(!primary.needs_fallback_text());
    }

    #[test]
    fn test_search_result_year() {
        let result = MovieSearchResult {
            id: 1,
            title: "Roma".to_string(),
            original_title: None,
            release_date: Some("2018-08-30".to_string()),
            poster_path: None,
            overview: None,
        };
        assert_eq!(result.year(), Some("2018"));

        let undated = MovieSearchResult {
            release_date: Some(String::new()),
            ..result
        };
        assert_eq!(undated.year(), None);
    }

    #[tokio::test]
    async fn test_details_fill_blank_fields_from_fallback_language() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/movie/10"))
            .and(query_param("language", "es-MX"))
            .and(query_param("append_to_response", "credits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(details_body("", "Hola")))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/movie/10"))
            .and(query_param("language", "en-US"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(details_body("Hello", "Hi there")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let details = client_for(&server).movie_details(10).await.unwrap();

        assert_eq!(details.overview.as_deref(), Some("Hello"));
        assert_eq!(details.tagline.as_deref(), Some("Hola"));
        assert_eq!(details.credits.cast.len(), 1);
        assert_eq!(details.credits.crew[0].job.as_deref(), Some("Director"));
    }

    #[tokio::test]
    async fn test_details_skip_fallback_when_text_present() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/movie/10"))
            .and(query_param("language", "es-MX"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(details_body("Resumen", "Lema")),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/movie/10"))
            .and(query_param("language", "en-US"))
            .respond_with(ResponseTemplate::new(200).set_body_json(details_body("x", "y")))
            .expect(0)
            .mount(&server)
            .await;

        let details = client_for(&server).movie_details(10).await.unwrap();
        assert_eq!(details.overview.as_deref(), Some("Resumen"));
        assert_eq!(details.tagline.as_deref(), Some("Lema"));
    }

    #[tokio::test]
    async fn test_details_keep_primary_when_fallback_fails() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/movie/10"))
            .and(query_param("language", "es-MX"))
            .respond_with(ResponseTemplate::new(200).set_body_json(details_body("", "")))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/movie/10"))
            .and(query_param("language", "en-US"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let details = client_for(&server).movie_details(10).await.unwrap();
        assert_eq!(details.title, "Roma");
        assert_eq!(details.overview.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_details_http_error_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/movie/404"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let err = client_for(&server).movie_details(404).await.unwrap_err();
        assert!(err.to_string().contains("404"));
        assert!(!err.to_string().contains("test-key"));
    }

    #[tokio::test]
    async fn test_search_uses_language_and_region() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("query", "roma"))
            .and(query_param("language", "es-MX"))
            .and(query_param("region", "MX"))
            .and(query_param("api_key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "results": [
                    { "id": 426426, "title": "Roma", "release_date": "2018-08-30", "poster_path": "/r.jpg" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = client_for(&server).search_movies("roma").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 426426);
        assert_eq!(results[0].year(), Some("2018"));
    }

    #[tokio::test]
    async fn test_person_profile_url() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/person/2/external_ids"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "imdb_id": "nm0190859" })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/person/3/external_ids"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "imdb_id": null })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(
            client.person_profile_url(2).await.unwrap().as_deref(),
            Some("https://www.imdb.com/name/nm0190859/")
        );
        assert_eq!(client.person_profile_url(3).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = TmdbClient::new(TmdbConfig {
            base_url: server.uri(),
            ..TmdbConfig::default()
        })
        .unwrap();

        assert!(!client.is_configured());
        assert!(client.search_movies("roma").await.is_err());
    }
}
