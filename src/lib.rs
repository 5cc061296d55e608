pub mod analyzer;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod inference;
pub mod keywords;
pub mod sentiment;
pub mod summarize;
pub mod text;
pub mod validate;
