//! Remote catalog access: endpoint descriptor resolution and the
//! authenticated HTTP client.

mod client;
mod endpoint;

pub use client::{CatalogClient, CatalogError};
pub use endpoint::{resolve, Endpoint, EndpointError};
