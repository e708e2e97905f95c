//! Output side of the pipeline: the bulk JSON document write and the
//! best-effort per-record insert into a document sink.

pub mod sink;
pub mod writer;

pub use sink::{DocumentSink, InsertFailure, InsertOutcome, JsonLinesSink, MemorySink, SinkError,
    bulk_insert};
pub use writer::{documents_path, insert_errors_path, write_documents, write_insert_errors};
