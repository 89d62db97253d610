//! Crawl arXiv subject listings and abstract pages into validated bibliographic records.

pub mod article;
pub mod config;
pub mod crawler;
pub mod date;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod subject;

pub use article::{Article, RawArticle};
pub use error::{Error, FormatLocation, Result};
