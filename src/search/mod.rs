//! Search layer facade.
//!
//! - **[`query`]**: search criteria and the criteria-to-endpoint mapping.
//! - **[`client`]**: the HTTP client that issues the selected request.

pub mod client;
pub mod query;
