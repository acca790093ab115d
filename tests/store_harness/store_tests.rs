//! Macro-generated test suite for `EdtoyStore` contract validation.
//!
//! The `edtoy_store_tests!` macro generates a test module that validates
//! any `EdtoyStore` implementation against the full contract: CRUD,
//! optimistic concurrency, search, ordering and pagination.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//!
//! use store_harness::*;
//! use edtoys::storage::InMemoryEdtoyStore;
//!
//! edtoy_store_tests!(InMemoryEdtoyStore::new());
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_insert_then_get`: caller fields round-trip, version 1, id > 0
//! - `test_get_nonexistent` / `test_get_non_positive_id`: RecordNotFound
//! - `test_delete_then_get`: delete removes, following get is RecordNotFound
//! - `test_delete_nonexistent`: RecordNotFound
//!
//! ## Optimistic concurrency
//! - `test_update_bumps_version`: version + 1, fields persisted
//! - `test_update_with_stale_version`: EditConflict, stored row untouched
//! - `test_update_nonexistent`: EditConflict
//! - `test_racing_updates_same_version`: first wins, second conflicts
//! - `test_concurrent_updates_exactly_one_commits`: spawned tasks race
//!
//! ## Search & pagination
//! - `test_sort_desc_with_id_tie_break`: years [2001, 2010, 2010, 1999]
//! - `test_unsafelisted_sort_rejected`: Validation, nothing returned
//! - `test_empty_result`: empty page, zero metadata
//! - `test_title_search` / `test_genre_superset_filter`

/// Generate a full `EdtoyStore` conformance test suite.
///
/// `$factory` must be an expression that evaluates to a fresh, empty store.
/// It is re-evaluated for each test to ensure isolation. For the concurrent
/// update test, the returned store must also implement `Clone + 'static`.
#[macro_export]
macro_rules! edtoy_store_tests {
    ($factory:expr) => {
        mod edtoy_store_contract_tests {
            use super::*;
            use edtoys::core::error::StoreError;
            use edtoys::core::model::Runtime;
            use edtoys::core::query::{EdtoySearch, Filters};
            use edtoys::core::store::EdtoyStore;

            fn sorted(sort: &str, page: i64, page_size: i64) -> Filters {
                Filters {
                    page,
                    page_size,
                    sort: sort.to_string(),
                    ..Default::default()
                }
            }

            // ==================================================================
            // CRUD: Insert & Get
            // ==================================================================

            #[tokio::test]
            async fn test_insert_then_get() {
                let store = $factory;
                let input = sample_edtoy_with_genres("Magnetic Tiles", 2018, &["stem", "construction"]);

                let created = store.insert(input.clone()).await.unwrap();
                assert!(created.id > 0);
                assert_eq!(created.version, 1);

                let fetched = store.get(created.id).await.unwrap();
                assert_eq!(fetched.id, created.id);
                assert_eq!(fetched.version, 1);
                assert_eq!(fetched.title, input.title);
                assert_eq!(fetched.year, input.year);
                assert_eq!(fetched.target_age, input.target_age);
                assert_eq!(fetched.genres, input.genres);
                assert_eq!(fetched.skill_focus, input.skill_focus);
                assert_eq!(fetched.runtime, input.runtime);
                assert_eq!(fetched.created_at, created.created_at);
            }

            #[tokio::test]
            async fn test_ids_increase() {
                let store = $factory;
                let created = insert_years(&store, &[2000, 2001, 2002]).await;
                let ids = ids(&created);
                assert!(ids.windows(2).all(|w| w[0] < w[1]), "ids {:?}", ids);
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let store = $factory;
                let result = store.get(987_654).await;
                assert!(matches!(result, Err(StoreError::RecordNotFound)));
            }

            #[tokio::test]
            async fn test_get_non_positive_id() {
                let store = $factory;
                assert!(matches!(store.get(0).await, Err(StoreError::RecordNotFound)));
                assert!(matches!(store.get(-1).await, Err(StoreError::RecordNotFound)));
            }

            // ==================================================================
            // CRUD: Delete
            // ==================================================================

            #[tokio::test]
            async fn test_delete_then_get() {
                let store = $factory;
                let created = store.insert(sample_edtoy("Abacus", 1999)).await.unwrap();

                store.delete(created.id).await.unwrap();

                assert!(matches!(
                    store.get(created.id).await,
                    Err(StoreError::RecordNotFound)
                ));
                assert!(matches!(
                    store.delete(created.id).await,
                    Err(StoreError::RecordNotFound)
                ));
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let store = $factory;
                assert!(matches!(store.delete(987_654).await, Err(StoreError::RecordNotFound)));
                assert!(matches!(store.delete(0).await, Err(StoreError::RecordNotFound)));
            }

            #[tokio::test]
            async fn test_delete_ignores_version() {
                let store = $factory;
                let created = store.insert(sample_edtoy("Abacus", 1999)).await.unwrap();
                let mut changed = created.clone();
                changed.title = "Abacus II".to_string();
                store.update(changed).await.unwrap();

                // created still carries version 1; delete does not care
                store.delete(created.id).await.unwrap();
            }

            // ==================================================================
            // Optimistic concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_update_bumps_version() {
                let store = $factory;
                let created = store.insert(sample_edtoy("Puzzle Box", 2015)).await.unwrap();

                let mut changed = created.clone();
                changed.title = "Puzzle Box XL".to_string();
                changed.runtime = Runtime(90);
                changed.genres = vec!["logic".to_string(), "stem".to_string()];

                let updated = store.update(changed).await.unwrap();
                assert_eq!(updated.version, created.version + 1);

                let fetched = store.get(created.id).await.unwrap();
                assert_eq!(fetched.version, 2);
                assert_eq!(fetched.title, "Puzzle Box XL");
                assert_eq!(fetched.runtime, Runtime(90));
                assert_eq!(fetched.genres, vec!["logic", "stem"]);
            }

            #[tokio::test]
            async fn test_update_with_stale_version() {
                let store = $factory;
                let created = store.insert(sample_edtoy("Puzzle Box", 2015)).await.unwrap();

                let mut stale = created.clone();
                stale.version = 42;
                stale.title = "Should not land".to_string();

                assert!(matches!(store.update(stale).await, Err(StoreError::EditConflict)));
                let fetched = store.get(created.id).await.unwrap();
                assert_eq!(fetched.title, "Puzzle Box");
                assert_eq!(fetched.version, 1);
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let store = $factory;
                let mut ghost = sample_edtoy("Ghost", 2001);
                ghost.id = 987_654;
                ghost.version = 1;

                assert!(matches!(store.update(ghost).await, Err(StoreError::EditConflict)));
            }

            #[tokio::test]
            async fn test_racing_updates_same_version() {
                let store = $factory;
                let created = store.insert(sample_edtoy("Robot Kit", 2020)).await.unwrap();

                let mut first = created.clone();
                first.title = "Robot Kit (first)".to_string();
                let mut second = created.clone();
                second.title = "Robot Kit (second)".to_string();

                let won = store.update(first).await.unwrap();
                assert_eq!(won.version, created.version + 1);

                let lost = store.update(second).await;
                assert!(matches!(lost, Err(StoreError::EditConflict)));

                let fetched = store.get(created.id).await.unwrap();
                assert_eq!(fetched.version, created.version + 1);
                assert_eq!(fetched.title, "Robot Kit (first)");
            }

            #[tokio::test]
            async fn test_concurrent_updates_exactly_one_commits() {
                let store = $factory;
                let created = store.insert(sample_edtoy("Robot Kit", 2020)).await.unwrap();

                let mut handles = Vec::new();
                for i in 0..8 {
                    let store = store.clone();
                    let mut attempt = created.clone();
                    attempt.title = format!("Robot Kit #{}", i);
                    handles.push(tokio::spawn(async move { store.update(attempt).await }));
                }

                let mut committed = 0;
                let mut conflicts = 0;
                for handle in handles {
                    match handle.await.unwrap() {
                        Ok(updated) => {
                            assert_eq!(updated.version, 2);
                            committed += 1;
                        }
                        Err(StoreError::EditConflict) => conflicts += 1,
                        Err(other) => panic!("unexpected error: {:?}", other),
                    }
                }

                assert_eq!(committed, 1);
                assert_eq!(conflicts, 7);
                assert_eq!(store.get(created.id).await.unwrap().version, 2);
            }

            // ==================================================================
            // Search & pagination
            // ==================================================================

            #[tokio::test]
            async fn test_sort_desc_with_id_tie_break() {
                let store = $factory;
                let created = insert_years(&store, &[2001, 2010, 2010, 1999]).await;

                let page = store
                    .get_all(&EdtoySearch::default(), &sorted("-year", 1, 2))
                    .await
                    .unwrap();
                assert_eq!(years(&page.records), vec![2010, 2010]);
                assert_eq!(ids(&page.records), vec![created[1].id, created[2].id]);
                assert_eq!(page.metadata.total_records, 4);
                assert_eq!(page.metadata.current_page, 1);
                assert_eq!(page.metadata.last_page, 2);

                let next = store
                    .get_all(&EdtoySearch::default(), &sorted("-year", 2, 2))
                    .await
                    .unwrap();
                assert_eq!(years(&next.records), vec![2001, 1999]);
                assert_eq!(next.metadata.total_records, 4);
            }

            #[tokio::test]
            async fn test_total_independent_of_page_size() {
                let store = $factory;
                insert_years(&store, &[2001, 2010, 2010, 1999]).await;

                for page_size in [1, 2, 3, 100] {
                    let page = store
                        .get_all(&EdtoySearch::default(), &sorted("year", 1, page_size))
                        .await
                        .unwrap();
                    assert_eq!(page.metadata.total_records, 4);
                    assert_eq!(page.records.len() as i64, page_size.min(4));
                }
            }

            #[tokio::test]
            async fn test_ascending_sort_with_id_tie_break() {
                let store = $factory;
                let created = insert_years(&store, &[2010, 2001, 2010]).await;

                let page = store
                    .get_all(&EdtoySearch::default(), &sorted("year", 1, 10))
                    .await
                    .unwrap();
                assert_eq!(
                    ids(&page.records),
                    vec![created[1].id, created[0].id, created[2].id]
                );
            }

            #[tokio::test]
            async fn test_page_past_end_keeps_total() {
                let store = $factory;
                insert_years(&store, &[2001, 2002, 2003]).await;

                let page = store
                    .get_all(&EdtoySearch::default(), &sorted("id", 5, 2))
                    .await
                    .unwrap();
                assert!(page.records.is_empty());
                assert_eq!(page.metadata.total_records, 3);
                assert_eq!(page.metadata.last_page, 2);
            }

            #[tokio::test]
            async fn test_unsafelisted_sort_rejected() {
                let store = $factory;
                insert_years(&store, &[2001]).await;

                let result = store
                    .get_all(&EdtoySearch::default(), &sorted("created_at", 1, 10))
                    .await;
                match result {
                    Err(StoreError::Validation(errors)) => {
                        assert_eq!(errors.get("sort"), Some("invalid sort value"));
                    }
                    other => panic!("expected validation error, got {:?}", other),
                }

                let injected = store
                    .get_all(
                        &EdtoySearch::default(),
                        &sorted("year; DROP TABLE edtoys", 1, 10),
                    )
                    .await;
                assert!(matches!(injected, Err(StoreError::Validation(_))));

                // table still intact
                assert!(store.get_all(&EdtoySearch::default(), &Filters::default()).await.is_ok());
            }

            #[tokio::test]
            async fn test_invalid_page_size_rejected() {
                let store = $factory;
                let result = store
                    .get_all(&EdtoySearch::default(), &sorted("id", 1, 101))
                    .await;
                assert!(matches!(result, Err(StoreError::Validation(_))));
            }

            #[tokio::test]
            async fn test_empty_result() {
                let store = $factory;
                let page = store
                    .get_all(&EdtoySearch::default(), &Filters::default())
                    .await
                    .unwrap();
                assert!(page.records.is_empty());
                assert_eq!(page.metadata, Default::default());
            }

            #[tokio::test]
            async fn test_title_search() {
                let store = $factory;
                store.insert(sample_edtoy("Wooden Stacking Blocks", 2010)).await.unwrap();
                store.insert(sample_edtoy("Foam Blocks", 2012)).await.unwrap();
                store.insert(sample_edtoy("Train Set", 2014)).await.unwrap();

                let blocks = store
                    .get_all(&EdtoySearch::new("BLOCKS", vec![]), &Filters::default())
                    .await
                    .unwrap();
                assert_eq!(blocks.metadata.total_records, 2);

                let wooden = store
                    .get_all(&EdtoySearch::new("wooden blocks", vec![]), &Filters::default())
                    .await
                    .unwrap();
                assert_eq!(wooden.records.len(), 1);
                assert_eq!(wooden.records[0].title, "Wooden Stacking Blocks");

                let none = store
                    .get_all(&EdtoySearch::new("dinosaur", vec![]), &Filters::default())
                    .await
                    .unwrap();
                assert!(none.records.is_empty());
                assert_eq!(none.metadata.total_records, 0);
            }

            #[tokio::test]
            async fn test_genre_superset_filter() {
                let store = $factory;
                store
                    .insert(sample_edtoy_with_genres("Circuit Lab", 2019, &["stem", "electronics"]))
                    .await
                    .unwrap();
                store
                    .insert(sample_edtoy_with_genres("Paint Pad", 2019, &["art"]))
                    .await
                    .unwrap();
                store
                    .insert(sample_edtoy_with_genres("Code Robot", 2021, &["stem", "coding", "electronics"]))
                    .await
                    .unwrap();

                let stem = store
                    .get_all(&EdtoySearch::new("", vec!["stem".to_string()]), &Filters::default())
                    .await
                    .unwrap();
                assert_eq!(stem.metadata.total_records, 2);

                let both = store
                    .get_all(
                        &EdtoySearch::new("", vec!["electronics".to_string(), "coding".to_string()]),
                        &Filters::default(),
                    )
                    .await
                    .unwrap();
                assert_eq!(both.records.len(), 1);
                assert_eq!(both.records[0].title, "Code Robot");

                let combined = store
                    .get_all(
                        &EdtoySearch::new("lab", vec!["stem".to_string()]),
                        &Filters::default(),
                    )
                    .await
                    .unwrap();
                assert_eq!(combined.records.len(), 1);
                assert_eq!(combined.records[0].title, "Circuit Lab");
            }
        }
    };
}
