pub mod config;
pub mod document;
pub mod error;
pub mod groups;
pub mod models;
pub mod report;
pub mod scoring;
pub mod service;
pub mod tags;

pub use config::SearchConfig;
pub use document::RoutingDocument;
pub use error::{Result, SearchError};
pub use models::{MergedGroup, ParsedQuery, Polarity, QueryGroup, SearchResult, Symbol, TagMetadata};
pub use service::{SearchOutcome, SearchPlan, SearchService};
