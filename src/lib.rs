pub mod config;
pub mod downloader;
pub mod error;
pub mod extractor;
pub mod models;
pub mod routes;
pub mod storage;
pub mod validate;
