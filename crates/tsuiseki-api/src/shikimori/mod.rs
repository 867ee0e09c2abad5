pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use api::ShikimoriApi;
pub use client::{ClientConfig, ShikimoriClient};
pub use error::ShikimoriError;
