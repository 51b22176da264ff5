#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod contact;
pub mod formats;
pub mod front_matter;
pub mod logging;
pub mod mailer;
pub mod normalize;
pub mod query;
pub mod reader;
pub mod snapshot;
