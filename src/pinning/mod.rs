pub mod client;
pub mod files;

pub use client::{ContentGateway, ContentPinner, Gateway, PinataClient};
pub use files::{FileRecord, Page, Visibility};
