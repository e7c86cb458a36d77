mod merged_group;
mod query;
mod search_result;
mod symbol;
mod tag_metadata;

pub use merged_group::MergedGroup;
pub use query::{ParsedQuery, Polarity, QueryGroup};
pub use search_result::SearchResult;
pub use symbol::Symbol;
pub use tag_metadata::TagMetadata;
