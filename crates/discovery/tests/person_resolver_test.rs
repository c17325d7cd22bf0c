mod common;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;

use cinescout_core::MediaType;
use cinescout_discovery::catalog::CatalogClient;
use cinescout_discovery::{ActorCredits, PeopleConfig, PersonResolver, ResultNormalizer};

use common::{person_record, MockCatalog};

fn resolver(catalog: MockCatalog) -> PersonResolver {
    PersonResolver::new(Arc::new(catalog), PeopleConfig::default())
}

#[tokio::test]
async fn test_exact_name_resolves_from_primary_search() {
    let catalog = MockCatalog {
        person_results: HashMap::from([(
            "Tom Hanks".to_string(),
            vec![
                person_record(2, "Thomas Hanks"),
                person_record(1, "Tom Hanks"),
                person_record(3, "Tom Hardy"),
            ],
        )]),
        ..MockCatalog::default()
    };

    let hit = resolver(catalog).resolve("Tom Hanks").await.unwrap();
    assert_eq!(hit.id, 1);
    assert_eq!(hit.name, "Tom Hanks");
}

#[tokio::test]
async fn test_near_miss_still_clears_threshold() {
    let catalog = MockCatalog {
        person_results: HashMap::from([(
            "Tom Hanks".to_string(),
            vec![person_record(2, "Thomas Hanks")],
        )]),
        ..MockCatalog::default()
    };

    // 0.4 * lcs("tom","thomas") + 0.6 * 1.0 = 0.867
    let hit = resolver(catalog).resolve("Tom Hanks").await.unwrap();
    assert_eq!(hit.id, 2);
}

#[tokio::test]
async fn test_unrelated_candidates_fall_through_to_no_match() {
    // no token overlap, no substring containment, popular listing down
    let catalog = MockCatalog {
        person_results: HashMap::from([(
            "Jon Snow".to_string(),
            vec![
                person_record(10, "Alice Walker"),
                person_record(11, "Bob Odenkirk"),
            ],
        )]),
        ..MockCatalog::default()
    };

    assert!(resolver(catalog).resolve("Jon Snow").await.is_none());
}

#[tokio::test]
async fn test_substring_fallback_matches_last_token() {
    let catalog = MockCatalog {
        person_results: HashMap::from([(
            "Jon Snow".to_string(),
            vec![
                person_record(10, "Alice Walker"),
                person_record(12, "Sansa Snowden"),
            ],
        )]),
        ..MockCatalog::default()
    };

    // scoring rejects both; the substring strategy finds "snow" in the name
    let hit = resolver(catalog).resolve("Jon Snow").await.unwrap();
    assert_eq!(hit.id, 12);
}

#[tokio::test]
async fn test_sanitized_requery_accepts_first_hit_outright() {
    let catalog = MockCatalog {
        person_results: HashMap::from([
            ("Tom H@nks 3".to_string(), Vec::new()),
            (
                "Tom Hnks".to_string(),
                vec![person_record(1, "Tom Hanks"), person_record(3, "Tom Hardy")],
            ),
        ]),
        ..MockCatalog::default()
    };

    let hit = resolver(catalog).resolve("Tom H@nks 3").await.unwrap();
    assert_eq!(hit.id, 1);
}

#[tokio::test]
async fn test_popular_pool_rescues_empty_primary_search() {
    let catalog = MockCatalog {
        person_results: HashMap::from([("Keanu Reeves".to_string(), Vec::new())]),
        popular_pages: vec![
            vec![person_record(20, "Margot Robbie")],
            vec![person_record(21, "Keanu Reeves")],
        ],
        ..MockCatalog::default()
    };

    let hit = resolver(catalog).resolve("Keanu Reeves").await.unwrap();
    assert_eq!(hit.id, 21);
}

#[tokio::test]
async fn test_primary_search_failure_degrades_to_no_match() {
    // every endpoint unset: person search errors, popular listing errors
    let catalog = MockCatalog::default();
    assert!(resolver(catalog).resolve("Tom Hanks").await.is_none());
}

fn credit(media: &str, id: i64, title: &str, release: Option<&str>) -> serde_json::Value {
    let mut record = json!({
        "media_type": media,
        "id": id,
        "title": title,
        "poster_path": format!("/c{id}.jpg")
    });
    if let Some(date) = release {
        record["release_date"] = json!(date);
    }
    record
}

#[tokio::test]
async fn test_credits_sort_newest_first_with_unknown_dates_last() {
    let catalog = MockCatalog {
        combined_credits: HashMap::from([(
            31,
            vec![
                credit("movie", 1, "Old One", Some("1995-06-30")),
                credit("movie", 2, "Undated", None),
                credit("movie", 3, "New One", Some("2023-10-06")),
                credit("tv", 4, "Mid Show", Some("2010-04-17")),
                // duplicate role rows collapse to one credit
                credit("movie", 3, "New One", Some("2023-10-06")),
                json!({"media_type": "person", "id": 9, "name": "Not a title"}),
            ],
        )]),
        ..MockCatalog::default()
    };

    let credits = ActorCredits::new(
        Arc::new(catalog) as Arc<dyn CatalogClient>,
        ResultNormalizer::new("https://image.test/"),
    );

    let page = credits.credits(31, 1).await;
    let ids: Vec<i64> = page.items.iter().map(|summary| summary.id).collect();

    assert_eq!(ids, vec![3, 4, 1, 2]);
    assert_eq!(page.items[1].media_type, MediaType::Tv);
    assert!(!page.has_prev);
    assert!(!page.has_next);
}

#[tokio::test]
async fn test_credits_window_past_the_end_is_empty() {
    let catalog = MockCatalog {
        combined_credits: HashMap::from([(
            31,
            vec![credit("movie", 1, "Only One", Some("2001-01-01"))],
        )]),
        ..MockCatalog::default()
    };

    let credits = ActorCredits::new(
        Arc::new(catalog) as Arc<dyn CatalogClient>,
        ResultNormalizer::new("https://image.test/"),
    );

    let page = credits.credits(31, 3).await;
    assert!(page.items.is_empty());
    assert!(!page.has_next);
}

#[tokio::test]
async fn test_credits_fetch_failure_yields_empty_page() {
    let credits = ActorCredits::new(
        Arc::new(MockCatalog::default()) as Arc<dyn CatalogClient>,
        ResultNormalizer::new("https://image.test/"),
    );

    let page = credits.credits(404, 1).await;
    assert!(page.items.is_empty());
    assert!(!page.has_prev);
    assert!(!page.has_next);
}
