//! Server-side query state: filters, sort order, request parameters and
//! the page envelope returned by list endpoints.
//!
//! Nothing in here evaluates a filter. These types only describe what the
//! server is asked to do and how that request is put on the wire.
//!
//! - [`Filter`] - a column filter (`operator` + `constraints`)
//! - [`SortOrder`] - `1` ascending, `-1` descending
//! - [`RequestParams`] - the full parameter set for one request
//! - [`Page`] - the `{data, total}` envelope

mod filter;
mod order;
mod page;
mod params;

pub use filter::Filter;
pub use filter::FilterConstraint;
pub use filter::MatchMode;
pub use filter::Operator;
pub use order::SortOrder;
pub use page::Page;
pub use params::DEFAULT_ROWS;
pub use params::RequestParams;
