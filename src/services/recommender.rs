use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::models::{MovieDetails, Recommendation};
use crate::services::enrichment::MetadataProvider;
use crate::store::{Catalog, FeatureMatrix};

/// Cosine similarity between two feature rows.
///
/// A zero vector has no defined angle; it scores 0.0 instead of producing
/// NaN downstream.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a.sqrt() * norm_b.sqrt())
    }
}

/// Ranks every catalog row against the query row and returns the indices of
/// its `n` nearest neighbours, most similar first.
///
/// The query row itself always scores 1.0 and sorts to the front, so the top
/// n+1 entries are taken and the leading one dropped. The sort is stable:
/// equal scores keep their original row order.
pub fn rank_similar(matrix: &FeatureMatrix, query_row: usize, n: usize) -> Vec<usize> {
    let query = matrix.row(query_row);

    let mut scored: Vec<(usize, f32)> = (0..matrix.rows)
        .map(|row| (row, cosine_similarity(query, matrix.row(row))))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    scored
        .into_iter()
        .take(n.saturating_add(1))
        .skip(1)
        .map(|(row, _)| row)
        .collect()
}

/// Resolves a title to its feature row, ranks the catalog by similarity and
/// assembles the enriched response list.
///
/// Enrichment and id lookups are best-effort and never fail the request;
/// missing artifacts rows do, as a 500.
pub async fn recommend(
    catalog: &Catalog,
    id_map: &HashMap<String, u64>,
    provider: &dyn MetadataProvider,
    title: &str,
    n: usize,
) -> AppResult<Vec<Recommendation>> {
    let query_row = *catalog
        .index
        .get(title)
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    if query_row >= catalog.matrix.rows {
        return Err(AppError::Internal(format!(
            "title index points at row {} but the feature matrix has {} rows",
            query_row, catalog.matrix.rows
        )));
    }

    let neighbours = rank_similar(&catalog.matrix, query_row, n);

    let mut recommendations = Vec::with_capacity(neighbours.len());
    for row in neighbours {
        let record = catalog
            .records
            .get(row)
            .ok_or_else(|| AppError::Internal(format!("record table has no row {}", row)))?;

        let movie_id = id_map.get(&record.title).copied();
        let details = match movie_id {
            Some(id) => provider.fetch_details(id).await,
            None => MovieDetails::no_id(),
        };

        recommendations.push(Recommendation {
            title: record.title.clone(),
            poster: details.poster,
            overview: details.overview,
            id: movie_id,
        });
    }

    tracing::debug!(
        title,
        requested = n,
        returned = recommendations.len(),
        "Recommendations assembled"
    );

    Ok(recommendations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogRecord;
    use crate::services::enrichment::{MockMetadataProvider, OVERVIEW_NO_ID, POSTER_NO_ID};

    fn matrix(rows: Vec<Vec<f32>>) -> FeatureMatrix {
        let cols = rows[0].len();
        FeatureMatrix {
            rows: rows.len(),
            cols,
            values: rows.into_iter().flatten().collect(),
        }
    }

    /// A=[1,0], B=[1,1], C=[0,1]: sim(A,B) ~ 0.707 > sim(A,C) = 0
    fn abc_catalog() -> Catalog {
        Catalog {
            index: HashMap::from([
                ("A".to_string(), 0),
                ("B".to_string(), 1),
                ("C".to_string(), 2),
            ]),
            matrix: matrix(vec![vec![1.0, 0.0], vec![1.0, 1.0], vec![0.0, 1.0]]),
            records: vec![
                CatalogRecord {
                    title: "A".to_string(),
                },
                CatalogRecord {
                    title: "B".to_string(),
                },
                CatalogRecord {
                    title: "C".to_string(),
                },
            ],
        }
    }

    fn stub_details(id: u64) -> MovieDetails {
        MovieDetails {
            poster: format!("poster-{}", id),
            overview: format!("overview-{}", id),
        }
    }

    #[test]
    fn test_cosine_similarity_identical_direction() {
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_rank_similar_orders_by_descending_similarity() {
        let catalog = abc_catalog();
        assert_eq!(rank_similar(&catalog.matrix, 0, 2), vec![1, 2]);
    }

    #[test]
    fn test_rank_similar_excludes_query_row() {
        let catalog = abc_catalog();
        for (row, n) in [(0, 3), (1, 3), (2, 3)] {
            let ranked = rank_similar(&catalog.matrix, row, n);
            assert!(!ranked.contains(&row));
        }
    }

    #[test]
    fn test_rank_similar_n_zero_is_empty() {
        let catalog = abc_catalog();
        assert!(rank_similar(&catalog.matrix, 0, 0).is_empty());
    }

    #[test]
    fn test_rank_similar_caps_at_catalog_size() {
        let catalog = abc_catalog();
        assert_eq!(rank_similar(&catalog.matrix, 0, 50).len(), 2);
    }

    #[test]
    fn test_rank_similar_ties_keep_row_order() {
        // rows 1..=3 are identical, so all tie against row 0
        let m = matrix(vec![
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
        ]);
        assert_eq!(rank_similar(&m, 0, 3), vec![1, 2, 3]);
    }

    #[test]
    fn test_rank_similar_is_idempotent() {
        let catalog = abc_catalog();
        assert_eq!(
            rank_similar(&catalog.matrix, 1, 2),
            rank_similar(&catalog.matrix, 1, 2)
        );
    }

    #[tokio::test]
    async fn test_recommend_returns_spec_example_order() {
        let catalog = abc_catalog();
        let id_map = HashMap::from([("B".to_string(), 10), ("C".to_string(), 20)]);

        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_details()
            .returning(|id| stub_details(id));

        let recs = recommend(&catalog, &id_map, &provider, "A", 2)
            .await
            .unwrap();

        let titles: Vec<&str> = recs.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "C"]);
        assert_eq!(recs[0].id, Some(10));
        assert_eq!(recs[0].poster, "poster-10");
        assert_eq!(recs[1].overview, "overview-20");
    }

    #[tokio::test]
    async fn test_recommend_unknown_title_is_not_found() {
        let catalog = abc_catalog();
        let provider = MockMetadataProvider::new();

        let err = recommend(&catalog, &HashMap::new(), &provider, "Zardoz", 5)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_recommend_unmapped_title_gets_no_id_pair() {
        let catalog = abc_catalog();
        // only C is mapped; B must come back with the no-id placeholders
        let id_map = HashMap::from([("C".to_string(), 20)]);

        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_details()
            .returning(|id| stub_details(id));

        let recs = recommend(&catalog, &id_map, &provider, "A", 2)
            .await
            .unwrap();

        assert_eq!(recs[0].title, "B");
        assert_eq!(recs[0].id, None);
        assert_eq!(recs[0].poster, POSTER_NO_ID);
        assert_eq!(recs[0].overview, OVERVIEW_NO_ID);
        assert_eq!(recs[1].id, Some(20));
    }

    #[tokio::test]
    async fn test_recommend_n_zero_returns_empty_list() {
        let catalog = abc_catalog();
        let provider = MockMetadataProvider::new();

        let recs = recommend(&catalog, &HashMap::new(), &provider, "A", 0)
            .await
            .unwrap();

        assert!(recs.is_empty());
    }

    #[tokio::test]
    async fn test_recommend_out_of_range_index_row_is_internal_error() {
        let mut catalog = abc_catalog();
        catalog.index.insert("Ghost".to_string(), 7);
        // keep the row-count invariant plausible for the other titles
        catalog.index.remove("C");

        let provider = MockMetadataProvider::new();
        let err = recommend(&catalog, &HashMap::new(), &provider, "Ghost", 2)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
    }
}
