//! Terminal client for the listing service.

pub mod api;
pub mod browse;
pub mod state;
pub mod view;

#[cfg(test)]
pub(crate) mod test_server;

pub use api::{CatalogClient, ClientError};
pub use browse::Command;
pub use state::{BrowseState, PAGE_SIZE};
pub use view::{render, render_movie, ViewState};
