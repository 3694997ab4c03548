//! Browser front-end: upload form, summary page and archive download

pub mod server;
pub mod store;
pub mod templates;

pub use server::{router, start_server, AppState};
