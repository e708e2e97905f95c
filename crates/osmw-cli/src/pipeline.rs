//! The wrangling pipeline with explicit stages.
//!
//! 1. **Audit**: first pass over the extract, tallying tag/key/postal/street
//!    distributions and classifying restriction-like keys.
//! 2. **Build**: second pass, folding each node and way into a normalized
//!    output record using the audit report as context.
//! 3. **Write**: the document array and the audit log.
//! 4. **Insert**: best-effort bulk insert into the JSON-lines collection,
//!    with failed documents captured in their own log.
//!
//! Each stage takes the output of the previous stage and returns typed
//! results.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use osmw_audit::{Auditor, write_audit_log};
use osmw_ingest::OsmReader;
use osmw_model::{AuditReport, OutputRecord};
use osmw_output::{JsonLinesSink, bulk_insert, write_documents, write_insert_errors};
use osmw_transform::build_record;

/// What to run and where to put it.
#[derive(Debug, Clone)]
pub struct WrangleOptions {
    pub input: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub skip_insert: bool,
}

/// Everything a finished run produced, for the summary table.
#[derive(Debug)]
pub struct WrangleResult {
    pub input: PathBuf,
    pub documents_path: PathBuf,
    pub audit_log_path: PathBuf,
    pub collection_path: Option<PathBuf>,
    pub insert_error_log: Option<PathBuf>,
    pub elements_seen: usize,
    pub records_built: usize,
    pub elements_skipped: usize,
    pub inserted: usize,
    pub insert_failures: usize,
    pub elapsed: Duration,
}

/// Run the whole pipeline for one extract.
pub fn run_wrangle(options: &WrangleOptions) -> Result<WrangleResult> {
    let started = Instant::now();
    let base = output_base(&options.input, options.output_dir.as_deref())?;

    let (report, elements_seen) = audit_pass(&options.input)?;
    let (records, elements_skipped) = build_pass(&options.input, &report)?;

    let (documents_path, audit_log_path) = {
        let span = info_span!("write");
        let _enter = span.enter();
        let documents_path = write_documents(&base, &records)?;
        let audit_log_path = write_audit_log(&base, &report, records.len())?;
        (documents_path, audit_log_path)
    };

    let mut result = WrangleResult {
        input: options.input.clone(),
        documents_path,
        audit_log_path,
        collection_path: None,
        insert_error_log: None,
        elements_seen,
        records_built: records.len(),
        elements_skipped,
        inserted: 0,
        insert_failures: 0,
        elapsed: Duration::ZERO,
    };

    if !options.skip_insert {
        insert_pass(&base, &records, &mut result)?;
    }

    result.elapsed = started.elapsed();
    Ok(result)
}

/// First pass: fold every element into the audit accumulators.
fn audit_pass(input: &Path) -> Result<(AuditReport, usize)> {
    let span = info_span!("audit");
    let _enter = span.enter();
    let mut auditor = Auditor::default();
    let mut elements_seen = 0usize;
    for element in OsmReader::open(input)? {
        let element = element.context("audit pass")?;
        auditor.observe(&element);
        elements_seen += 1;
    }
    let report = auditor.finish();
    info!(elements = elements_seen, "audit pass complete");
    Ok((report, elements_seen))
}

/// Second pass: re-open the extract and build one record per node or way.
fn build_pass(input: &Path, report: &AuditReport) -> Result<(Vec<OutputRecord>, usize)> {
    let span = info_span!("build");
    let _enter = span.enter();
    let mut records = Vec::new();
    let mut skipped = 0usize;
    for element in OsmReader::open(input)? {
        let element = element.context("build pass")?;
        match build_record(&element, report) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }
    info!(records = records.len(), skipped, "build pass complete");
    Ok((records, skipped))
}

fn insert_pass(base: &Path, records: &[OutputRecord], result: &mut WrangleResult) -> Result<()> {
    let span = info_span!("insert");
    let _enter = span.enter();
    let collection_path = collection_path(base);
    let mut sink = JsonLinesSink::create(&collection_path)
        .with_context(|| format!("create collection: {}", collection_path.display()))?;
    let outcome = bulk_insert(&mut sink, records);
    sink.finish().context("flush collection")?;

    result.inserted = outcome.inserted;
    result.insert_failures = outcome.failures.len();
    result.collection_path = Some(collection_path);
    if !outcome.failures.is_empty() {
        let log_path = write_insert_errors(&result.documents_path, &outcome.failures)?;
        result.insert_error_log = Some(log_path);
    }
    Ok(())
}

/// The JSON-lines collection lives next to the document array.
fn collection_path(base: &Path) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(".collection.jsonl");
    PathBuf::from(name)
}

/// All output paths derive from one base: the input path itself, or the
/// input's file name relocated into `--output-dir`.
fn output_base(input: &Path, output_dir: Option<&Path>) -> Result<PathBuf> {
    match output_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("create output dir: {}", dir.display()))?;
            let name = input
                .file_name()
                .with_context(|| format!("input path has no file name: {}", input.display()))?;
            Ok(dir.join(name))
        }
        None => Ok(input.to_path_buf()),
    }
}
