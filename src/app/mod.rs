//! HTTP surface of the site: contact submissions, the generated snapshot and
//! the built frontend.

pub mod model;
pub mod routes;

pub use routes::{AppState, router};
