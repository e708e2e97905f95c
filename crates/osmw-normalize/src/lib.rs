//! Tag normalization: key classification, field cleanup, and the
//! conditional rule compiler.

pub mod conditional;
pub mod keys;
pub mod text;
pub mod vocab;

pub use conditional::{ConditionalStyle, FULL_DAY_WINDOW, FULL_WEEK_RANGE, compile_conditional};
pub use keys::{NAME_ROUTES, NAMESPACE_ROUTES, NamespaceRoute, is_well_formed, local_key};
pub use text::{normalize_name, normalize_street_name, normalize_zip_code};
