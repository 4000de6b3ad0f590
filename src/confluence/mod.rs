pub mod client;
pub mod types;

pub use client::ConfluenceClient;
pub use types::PagePayload;
