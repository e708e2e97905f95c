pub mod audit;
pub mod element;
pub mod record;

pub use audit::{AuditReport, TagStats};
pub use element::{Created, Element, ElementKind, RawTag};
pub use record::{Bucket, ClauseRules, OutputRecord, TagValue};
