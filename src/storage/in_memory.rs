//! In-memory implementation of EdtoyStore for testing and development

use crate::core::error::{StoreError, StoreResult};
use crate::core::model::Edtoy;
use crate::core::query::{
    EdtoySearch, Filters, Metadata, Page, SortColumn, SortDirection, genres_match, title_matches,
};
use crate::core::store::EdtoyStore;
use crate::storage::{DEFAULT_QUERY_TIMEOUT, bounded};
use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

#[derive(Debug)]
struct Table {
    rows: BTreeMap<i64, Edtoy>,
    next_id: i64,
}

/// In-memory record store
///
/// Mirrors the Postgres store's semantics: ids come from a sequence that
/// is never reused, updates compare-and-swap on (id, version), and lists
/// break sort ties by ascending id. Uses RwLock for thread-safe access.
#[derive(Clone, Debug)]
pub struct InMemoryEdtoyStore {
    table: Arc<RwLock<Table>>,
    query_timeout: Duration,
}

impl InMemoryEdtoyStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            })),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    fn lock_error(operation: &'static str, e: impl std::fmt::Display) -> StoreError {
        StoreError::backend(operation, format!("failed to acquire lock: {}", e))
    }

    fn insert_row(&self, mut edtoy: Edtoy) -> StoreResult<Edtoy> {
        let mut table = self
            .table
            .write()
            .map_err(|e| Self::lock_error("insert", e))?;

        edtoy.id = table.next_id;
        edtoy.created_at = Utc::now().trunc_subsecs(0);
        edtoy.version = 1;
        table.next_id += 1;
        table.rows.insert(edtoy.id, edtoy.clone());

        Ok(edtoy)
    }

    fn get_row(&self, id: i64) -> StoreResult<Edtoy> {
        if id < 1 {
            return Err(StoreError::RecordNotFound);
        }
        let table = self.table.read().map_err(|e| Self::lock_error("get", e))?;
        table.rows.get(&id).cloned().ok_or(StoreError::RecordNotFound)
    }

    fn update_row(&self, mut edtoy: Edtoy) -> StoreResult<Edtoy> {
        let mut table = self
            .table
            .write()
            .map_err(|e| Self::lock_error("update", e))?;

        let stored = match table.rows.get_mut(&edtoy.id) {
            Some(stored) if stored.version == edtoy.version => stored,
            _ => return Err(StoreError::EditConflict),
        };

        stored.title = edtoy.title.clone();
        stored.year = edtoy.year;
        stored.target_age = edtoy.target_age.clone();
        stored.genres = edtoy.genres.clone();
        stored.skill_focus = edtoy.skill_focus.clone();
        stored.runtime = edtoy.runtime;
        stored.version += 1;

        edtoy.version = stored.version;
        edtoy.created_at = stored.created_at;
        Ok(edtoy)
    }

    fn delete_row(&self, id: i64) -> StoreResult<()> {
        if id < 1 {
            return Err(StoreError::RecordNotFound);
        }
        let mut table = self
            .table
            .write()
            .map_err(|e| Self::lock_error("delete", e))?;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::RecordNotFound)
    }

    fn select_rows(&self, search: &EdtoySearch, filters: &Filters) -> StoreResult<Page<Edtoy>> {
        let (column, direction) = filters.resolve_sort()?;

        let table = self
            .table
            .read()
            .map_err(|e| Self::lock_error("get_all", e))?;

        let mut matches: Vec<&Edtoy> = table
            .rows
            .values()
            .filter(|e| title_matches(&e.title, &search.title))
            .filter(|e| genres_match(&e.genres, &search.genres))
            .collect();

        matches.sort_by(|a, b| {
            let primary = compare_by(column, a, b);
            let primary = match direction {
                SortDirection::Asc => primary,
                SortDirection::Desc => primary.reverse(),
            };
            primary.then_with(|| a.id.cmp(&b.id))
        });

        let total = matches.len() as i64;
        let records = matches
            .into_iter()
            .skip(filters.offset() as usize)
            .take(filters.limit() as usize)
            .cloned()
            .collect();

        Ok(Page {
            records,
            metadata: Metadata::calculate(total, filters.page, filters.page_size),
        })
    }
}

fn compare_by(column: SortColumn, a: &Edtoy, b: &Edtoy) -> Ordering {
    match column {
        SortColumn::Id => a.id.cmp(&b.id),
        SortColumn::Title => a.title.cmp(&b.title),
        SortColumn::Year => a.year.cmp(&b.year),
        SortColumn::Runtime => a.runtime.cmp(&b.runtime),
    }
}

impl Default for InMemoryEdtoyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EdtoyStore for InMemoryEdtoyStore {
    async fn insert(&self, edtoy: Edtoy) -> StoreResult<Edtoy> {
        let created = bounded("insert", self.query_timeout, async { self.insert_row(edtoy) }).await?;
        tracing::debug!(id = created.id, "edtoy inserted");
        Ok(created)
    }

    async fn get(&self, id: i64) -> StoreResult<Edtoy> {
        bounded("get", self.query_timeout, async { self.get_row(id) }).await
    }

    async fn update(&self, edtoy: Edtoy) -> StoreResult<Edtoy> {
        let updated = bounded("update", self.query_timeout, async { self.update_row(edtoy) }).await?;
        tracing::debug!(id = updated.id, version = updated.version, "edtoy updated");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        bounded("delete", self.query_timeout, async { self.delete_row(id) }).await?;
        tracing::debug!(id, "edtoy deleted");
        Ok(())
    }

    async fn get_all(&self, search: &EdtoySearch, filters: &Filters) -> StoreResult<Page<Edtoy>> {
        bounded("get_all", self.query_timeout, async {
            self.select_rows(search, filters)
        })
        .await
    }
}
