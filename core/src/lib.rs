pub mod error;
pub mod gold;
pub mod patterns;
pub mod persist;
pub mod strip;
pub mod tree;

pub use error::{PrepError, Result};
pub use gold::{load_gold_standard, GoldStandard};
pub use patterns::HeaderMatcher;
pub use strip::{process_tree, strip_file, strip_stream, ErrorPolicy, FileStats, OutputLayout, StripOptions, TreeReport};
pub use tree::TreeOrder;

/// Document identifier taken from a gold-standard filename.
pub type DocId = u32;
