//! Server-driven data table client library
//!
//! State and request plumbing for a paginated, filterable, sortable data grid
//! whose filtering, sorting and paging all happen on the server. The library
//! serializes table state into request parameters, fetches through a
//! host-provided HTTP client, and keeps per-table state in a keyed store.
//!
//! - [`http`] - the [`HttpClient`](http::HttpClient) capability and its registry
//! - [`Datatable`] - fetch and export bound to one endpoint
//! - [`store`] - per-table state with `init` and `patch`
//! - [`query`] - filters, sort order, request params, page envelope
//! - [`column`] - column configuration schema

pub mod column;
pub mod error;
pub mod http;
pub mod query;
pub mod store;

mod datatable;

pub use datatable::*;
pub use error::Error;
pub use query::Page;
