//! Core module containing the record model, validation, query types and
//! the store contract

pub mod error;
pub mod model;
pub mod query;
pub mod store;
pub mod validation;

pub use error::{ApiError, StoreError, StoreResult};
pub use model::{Edtoy, Runtime, validate_edtoy};
pub use query::{EdtoySearch, Filters, Metadata, Page, SortColumn, SortDirection, validate_filters};
pub use store::EdtoyStore;
pub use validation::{ValidationErrors, Validator};
