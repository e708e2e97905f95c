//! Library surface of the `osm-wrangle` binary.
//!
//! Exposes the logging setup and the pipeline so integration tests can
//! drive a full run without spawning the binary.

pub mod logging;
pub mod pipeline;
