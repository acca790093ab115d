//! # Edtoys
//!
//! Record management for an educational toy catalog.
//!
//! ## Features
//!
//! - **Optimistic Concurrency**: updates compare-and-swap on (id, version)
//! - **Safelisted Sorting**: sort tokens resolve through a closed column mapping
//! - **Windowed Pagination**: one query returns a page plus the total match count
//! - **One Message Per Field**: validation reports the first failure of each field
//! - **Bounded Calls**: every store call runs under a fixed timeout
//! - **Pluggable Storage**: in-memory by default, PostgreSQL behind the `postgres` feature
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use edtoys::prelude::*;
//!
//! let store = InMemoryEdtoyStore::new();
//!
//! let mut v = Validator::new();
//! validate_edtoy(&mut v, &edtoy);
//! v.finish()?;
//!
//! let created = store.insert(edtoy).await?;
//! let page = store.get_all(&EdtoySearch::default(), &Filters::default()).await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{ApiError, ApiResult, StoreError, StoreResult},
        model::{Edtoy, Runtime, validate_edtoy},
        query::{EdtoySearch, Filters, Metadata, Page, SortColumn, SortDirection, validate_filters},
        store::EdtoyStore,
        validation::{ValidationErrors, Validator, unique},
    };

    // === Storage ===
    pub use crate::storage::InMemoryEdtoyStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresEdtoyStore;

    // === Config ===
    pub use crate::config::{AppConfig, DatabaseConfig, ListingConfig, ServerConfig};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === External dependencies ===
    pub use async_trait::async_trait;
}
