//! Domain models for movie metadata
//!
//! The minimal set of payload shapes the typed surfaces need: genres,
//! search pages and movie details. The remote API exposes far more
//! fields than these; only the ones the library itself touches are
//! modeled, and unknown fields are ignored on deserialization.

use serde::{Deserialize, Serialize};

/// A movie genre
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    /// API-assigned genre identifier
    pub id: u32,
    /// Display name of the genre
    pub name: String,
}

/// Genre catalogue as returned by the genre list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreList {
    /// All genres known to the API
    pub genres: Vec<Genre>,
}

/// One movie in a search result page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// API-assigned movie identifier
    pub id: u64,
    /// Display title
    pub title: String,
    /// Short synopsis; absent for obscure titles
    #[serde(default)]
    pub overview: Option<String>,
    /// Release date in `YYYY-MM-DD` form; empty or absent when unannounced
    #[serde(default)]
    pub release_date: Option<String>,
    /// Average user rating on the API's 0-10 scale
    #[serde(default)]
    pub vote_average: f64,
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    /// 1-based page number
    pub page: u32,
    /// Total number of pages for the query
    pub total_pages: u32,
    /// Total number of matching movies
    pub total_results: u32,
    /// Movies on this page
    pub results: Vec<MovieSummary>,
}

/// Detailed record for a single movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    /// API-assigned movie identifier
    pub id: u64,
    /// Display title
    pub title: String,
    /// Short synopsis
    #[serde(default)]
    pub overview: Option<String>,
    /// Runtime in minutes, when known
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Genres the movie is filed under
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Release date in `YYYY-MM-DD` form
    #[serde(default)]
    pub release_date: Option<String>,
    /// Average user rating on the API's 0-10 scale
    #[serde(default)]
    pub vote_average: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_list_serialization_roundtrip() {
        let original = GenreList {
            genres: vec![
                Genre {
                    id: 28,
                    name: "Action".to_string(),
                },
                Genre {
                    id: 35,
                    name: "Comedy".to_string(),
                },
            ],
        };

        let json = serde_json::to_string(&original).expect("Failed to serialize GenreList");
        let deserialized: GenreList =
            serde_json::from_str(&json).expect("Failed to deserialize GenreList");

        assert_eq!(deserialized, original);
    }

    #[test]
    fn test_search_page_parses_api_shape() {
        let json = r#"{
            "page": 1,
            "total_pages": 3,
            "total_results": 41,
            "results": [
                {
                    "id": 603,
                    "title": "The Matrix",
                    "overview": "A computer hacker learns about the true nature of reality.",
                    "release_date": "1999-03-30",
                    "vote_average": 8.2,
                    "popularity": 83.7
                }
            ]
        }"#;

        let page: SearchPage = serde_json::from_str(json).expect("Failed to parse SearchPage");

        assert_eq!(page.page, 1);
        assert_eq!(page.total_results, 41);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].title, "The Matrix");
        assert_eq!(page.results[0].release_date.as_deref(), Some("1999-03-30"));
    }

    #[test]
    fn test_movie_summary_defaults_for_sparse_records() {
        // Obscure titles come back with most fields missing
        let json = r#"{"id": 99, "title": "Unknown Short"}"#;

        let summary: MovieSummary = serde_json::from_str(json).expect("Failed to parse summary");

        assert_eq!(summary.id, 99);
        assert!(summary.overview.is_none());
        assert!(summary.release_date.is_none());
        assert_eq!(summary.vote_average, 0.0);
    }

    #[test]
    fn test_movie_details_serialization_roundtrip() {
        let original = MovieDetails {
            id: 550,
            title: "Fight Club".to_string(),
            overview: Some("An insomniac office worker and a soap maker.".to_string()),
            runtime: Some(139),
            genres: vec![Genre {
                id: 18,
                name: "Drama".to_string(),
            }],
            release_date: Some("1999-10-15".to_string()),
            vote_average: 8.4,
        };

        let json = serde_json::to_string(&original).expect("Failed to serialize MovieDetails");
        let deserialized: MovieDetails =
            serde_json::from_str(&json).expect("Failed to deserialize MovieDetails");

        assert_eq!(deserialized, original);
    }
}
