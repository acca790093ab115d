//! The record store contract

use crate::core::error::StoreResult;
use crate::core::model::Edtoy;
use crate::core::query::{EdtoySearch, Filters, Page};
use async_trait::async_trait;

/// Persistence for [`Edtoy`] records
///
/// Every call is independent and bounded by the store's query timeout.
/// Nothing is retried internally: on [`StoreError::EditConflict`] the
/// caller decides whether to re-fetch and re-submit.
///
/// Callers validate records with
/// [`validate_edtoy`](crate::core::model::validate_edtoy) before `insert`
/// and `update`; the store does not re-check them.
///
/// [`StoreError::EditConflict`]: crate::core::error::StoreError::EditConflict
#[async_trait]
pub trait EdtoyStore: Send + Sync {
    /// Persist a new record. The returned record carries the assigned
    /// `id` and `created_at`, with `version` set to 1.
    async fn insert(&self, edtoy: Edtoy) -> StoreResult<Edtoy>;

    /// Fetch one record. Non-positive ids are never found.
    async fn get(&self, id: i64) -> StoreResult<Edtoy>;

    /// Overwrite the mutable fields of the row matching both `edtoy.id`
    /// and `edtoy.version`, bumping the version by one.
    ///
    /// Fails with `EditConflict` when no row matches that pair, whether
    /// the record was changed by someone else or no longer exists.
    async fn update(&self, edtoy: Edtoy) -> StoreResult<Edtoy>;

    /// Remove a record. No version check.
    async fn delete(&self, id: i64) -> StoreResult<()>;

    /// One page of records matching `search`, ordered by the safelisted
    /// sort column then by id, plus the total number of matches.
    ///
    /// Fails with `Validation` before touching the backend when
    /// `filters` does not validate.
    async fn get_all(&self, search: &EdtoySearch, filters: &Filters) -> StoreResult<Page<Edtoy>>;
}
