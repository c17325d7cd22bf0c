//! Person name resolution and actor filmographies
//!
//! Free-text actor lookups rarely match catalog names exactly. The resolver
//! scores person-search candidates with a token-weighted similarity ratio and
//! falls back through a fixed sequence of cheaper strategies before giving
//! up: sanitized re-query, popular-people pool, substring containment.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use cinescout_core::{window, MediaKey, MediaSummary, Page, PersonCandidate};

use crate::catalog::CatalogClient;
use crate::config::PeopleConfig;
use crate::normalize::ResultNormalizer;

/// Window size for filmography listings.
const CREDITS_PAGE_SIZE: usize = 16;

/// Weight of the given-name similarity in the combined score.
const FIRST_NAME_WEIGHT: f64 = 0.4;

/// Weight of the surname similarity; surnames disambiguate better.
const LAST_NAME_WEIGHT: f64 = 0.6;

/// Neutral surname score when the query has a single token.
const NEUTRAL_LAST_SCORE: f64 = 0.5;

/// Similarity ratio in [0, 1] between two strings, based on the length of
/// their longest common subsequence: `2 * lcs / (len_a + len_b)`.
///
/// Two empty strings are identical (1.0); one empty string matches nothing.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (len_a, len_b) = (a_chars.len(), b_chars.len());

    if len_a == 0 && len_b == 0 {
        return 1.0;
    }
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }

    let mut table: Vec<Vec<usize>> = vec![vec![0; len_b + 1]; len_a + 1];
    for i in 1..=len_a {
        for j in 1..=len_b {
            table[i][j] = if a_chars[i - 1] == b_chars[j - 1] {
                table[i - 1][j - 1] + 1
            } else {
                std::cmp::max(table[i - 1][j], table[i][j - 1])
            };
        }
    }

    2.0 * table[len_a][len_b] as f64 / (len_a + len_b) as f64
}

/// Score one candidate name against the query.
///
/// Both names are case-folded and split on whitespace; the first tokens and
/// last tokens are compared separately, with the surname weighted higher. A
/// single-token query gets a neutral surname score.
pub fn name_score(query: &str, candidate: &str) -> f64 {
    let (query_first, query_last) = split_name(query);
    let (candidate_first, candidate_last) = split_name(candidate);

    let first_ratio = similarity_ratio(&query_first, &candidate_first);
    let last_ratio = if query_last.is_empty() {
        NEUTRAL_LAST_SCORE
    } else {
        similarity_ratio(&query_last, &candidate_last)
    };

    FIRST_NAME_WEIGHT * first_ratio + LAST_NAME_WEIGHT * last_ratio
}

/// Pick the best-scoring candidate if it clears the threshold.
///
/// Strict greedy argmax: ties resolve to the first-encountered candidate.
pub fn best_match(
    query: &str,
    candidates: &[PersonCandidate],
    threshold: f64,
) -> Option<PersonCandidate> {
    let mut best: Option<(&PersonCandidate, f64)> = None;

    for candidate in candidates {
        let score = name_score(query, &candidate.name);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((candidate, score));
        }
    }

    best.filter(|(_, score)| *score >= threshold)
        .map(|(candidate, _)| candidate.clone())
}

fn split_name(name: &str) -> (String, String) {
    let folded = name.trim().to_lowercase();
    let tokens: Vec<&str> = folded.split_whitespace().collect();

    let first = tokens.first().copied().unwrap_or("").to_string();
    let last = if tokens.len() >= 2 {
        tokens.last().copied().unwrap_or("").to_string()
    } else {
        String::new()
    };

    (first, last)
}

/// Resolves free-text actor names to catalog person records.
pub struct PersonResolver {
    catalog: Arc<dyn CatalogClient>,
    config: PeopleConfig,
}

impl PersonResolver {
    pub fn new(catalog: Arc<dyn CatalogClient>, config: PeopleConfig) -> Self {
        Self { catalog, config }
    }

    fn candidates(records: &[Value]) -> Vec<PersonCandidate> {
        records
            .iter()
            .filter_map(|record| {
                let id = record.get("id").and_then(Value::as_i64)?;
                let name = record.get("name").and_then(Value::as_str)?;
                if name.trim().is_empty() {
                    return None;
                }
                Some(PersonCandidate {
                    id,
                    name: name.to_string(),
                })
            })
            .collect()
    }

    /// Resolve a free-text name, trying each strategy in order until one
    /// produces a candidate. No match is `None`, never an error.
    #[instrument(skip(self), fields(name = %name))]
    pub async fn resolve(&self, name: &str) -> Option<PersonCandidate> {
        let primary = match self.catalog.search_person(name, 1).await {
            Ok(listing) => Self::candidates(&listing.results),
            Err(e) => {
                warn!(error = %e, "person search failed");
                Vec::new()
            }
        };

        if let Some(hit) = best_match(name, &primary, self.config.match_threshold) {
            debug!(person = %hit.name, "resolved by similarity score");
            return Some(hit);
        }

        if let Some(hit) = self.sanitized_requery(name).await {
            debug!(person = %hit.name, "resolved by sanitized re-query");
            return Some(hit);
        }

        if let Some(hit) = self.popular_pool(name).await {
            debug!(person = %hit.name, "resolved from popular-people pool");
            return Some(hit);
        }

        self.substring_fallback(name, &primary)
    }

    /// Strip everything but letters and spaces, re-query, and accept the
    /// first upstream hit outright.
    async fn sanitized_requery(&self, name: &str) -> Option<PersonCandidate> {
        let cleaned: String = name
            .chars()
            .filter(|c| c.is_alphabetic() || c.is_whitespace())
            .collect();
        let cleaned = cleaned.trim();

        if cleaned.is_empty() || cleaned == name.trim() {
            return None;
        }

        match self.catalog.search_person(cleaned, 1).await {
            Ok(listing) => Self::candidates(&listing.results).into_iter().next(),
            Err(e) => {
                debug!(error = %e, "sanitized person search failed");
                None
            }
        }
    }

    /// Pool several pages of the popular-people listing and re-run the
    /// similarity scorer over the pool.
    async fn popular_pool(&self, name: &str) -> Option<PersonCandidate> {
        let mut pool: Vec<PersonCandidate> = Vec::new();

        for page in 1..=self.config.popular_scan_pages {
            match self.catalog.popular_people(page).await {
                Ok(listing) => pool.extend(Self::candidates(&listing.results)),
                Err(e) => {
                    debug!(error = %e, page, "popular people fetch failed");
                    break;
                }
            }
        }

        best_match(name, &pool, self.config.match_threshold)
    }

    /// Last resort: the first primary candidate whose name contains the
    /// query's last token, else the full normalized query.
    fn substring_fallback(
        &self,
        name: &str,
        candidates: &[PersonCandidate],
    ) -> Option<PersonCandidate> {
        let folded = name.trim().to_lowercase();
        let (_, last) = split_name(name);

        if !last.is_empty() {
            if let Some(hit) = candidates
                .iter()
                .find(|candidate| candidate.name.to_lowercase().contains(&last))
            {
                return Some(hit.clone());
            }
        }

        candidates
            .iter()
            .find(|candidate| candidate.name.to_lowercase().contains(&folded))
            .cloned()
    }
}

/// Filmography listings backed by the combined-credits endpoint.
pub struct ActorCredits {
    catalog: Arc<dyn CatalogClient>,
    normalizer: ResultNormalizer,
}

impl ActorCredits {
    pub fn new(catalog: Arc<dyn CatalogClient>, normalizer: ResultNormalizer) -> Self {
        Self {
            catalog,
            normalizer,
        }
    }

    /// One window of a person's combined movie/TV credits, newest first;
    /// titles without a release indicator sort last.
    #[instrument(skip(self))]
    pub async fn credits(&self, person_id: i64, page: usize) -> Page<MediaSummary> {
        let records = match self.catalog.person_combined_credits(person_id).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, person_id, "combined credits fetch failed");
                return Page::empty();
            }
        };

        let mut seen: HashSet<MediaKey> = HashSet::new();
        let mut entries: Vec<MediaSummary> = Vec::new();
        for record in &records {
            let Some(summary) = self.normalizer.summary(record) else {
                continue;
            };
            // a person can hold several roles on the same title
            if seen.insert(summary.key()) {
                entries.push(summary);
            }
        }

        entries.sort_by(|a, b| match (&a.release, &b.release) {
            (Some(left), Some(right)) => right.cmp(left),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        window(entries, page, CREDITS_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: i64, name: &str) -> PersonCandidate {
        PersonCandidate {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_similarity_ratio_bounds() {
        assert_eq!(similarity_ratio("", ""), 1.0);
        assert_eq!(similarity_ratio("tom", ""), 0.0);
        assert_eq!(similarity_ratio("", "tom"), 0.0);
        assert_eq!(similarity_ratio("hanks", "hanks"), 1.0);
    }

    #[test]
    fn test_similarity_ratio_partial() {
        // lcs("tom", "thomas") = "tom" -> 2*3/9
        let ratio = similarity_ratio("tom", "thomas");
        assert!((ratio - 2.0 / 3.0).abs() < 1e-9);

        // lcs("hanks", "hardy") = "ha" -> 2*2/10
        let ratio = similarity_ratio("hanks", "hardy");
        assert!((ratio - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_name_score_exact_match() {
        assert!((name_score("Tom Hanks", "Tom Hanks") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_name_score_single_token_gets_neutral_surname() {
        let score = name_score("Zendaya", "Zendaya");
        assert!((score - (0.4 + 0.6 * 0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_best_match_picks_exact_over_near() {
        let candidates = vec![
            candidate(1, "Tom Hanks"),
            candidate(2, "Thomas Hanks"),
            candidate(3, "Tom Hardy"),
        ];

        let hit = best_match("Tom Hanks", &candidates, 0.68).unwrap();
        assert_eq!(hit.id, 1);
    }

    #[test]
    fn test_best_match_ties_resolve_to_first_encountered() {
        let candidates = vec![candidate(7, "Jane Doe"), candidate(8, "Jane Doe")];
        let hit = best_match("Jane Doe", &candidates, 0.68).unwrap();
        assert_eq!(hit.id, 7);
    }

    #[test]
    fn test_best_match_below_threshold_is_none() {
        let candidates = vec![candidate(1, "Alice Walker"), candidate(2, "Bob Odenkirk")];
        assert!(best_match("Jon Snow", &candidates, 0.68).is_none());
    }

    #[test]
    fn test_best_match_empty_candidates() {
        assert!(best_match("Tom Hanks", &[], 0.68).is_none());
    }

    #[test]
    fn test_split_name_trims_and_folds() {
        assert_eq!(
            split_name("  Tom  HANKS "),
            ("tom".to_string(), "hanks".to_string())
        );
        assert_eq!(split_name("Zendaya"), ("zendaya".to_string(), String::new()));
        assert_eq!(split_name(""), (String::new(), String::new()));
    }

    #[test]
    fn test_middle_names_use_outer_tokens() {
        let score = name_score("Samuel Leroy Jackson", "Samuel Jackson");
        assert!((score - 1.0).abs() < 1e-9);
    }
}
