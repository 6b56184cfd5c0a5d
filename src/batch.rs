//! Directory batch driver.
//!
//! Every PDF in the input directory is processed on its own: one document
//! failing to decode is recorded and the rest carry on. Each success writes
//! `<stem>.json` into the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;
use rayon::prelude::*;

use crate::detect::has_pdf_extension;
use crate::error::{Error, Result};
use crate::render::{write_json, JsonFormat};
use crate::OutlineExtractor;

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Process documents on the rayon pool
    pub parallel: bool,
    /// Worker count; `None` uses rayon's default
    pub threads: Option<usize>,
    /// Output formatting
    pub json_format: JsonFormat,
    /// Leave documents whose output file already exists untouched
    pub skip_existing: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
            json_format: JsonFormat::Pretty,
            skip_existing: false,
        }
    }
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one document at a time on the calling thread.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    pub fn with_skip_existing(mut self, skip: bool) -> Self {
        self.skip_existing = skip;
        self
    }
}

/// Progress notifications sent while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    Started { path: PathBuf },
    Finished { path: PathBuf, output: PathBuf, headings: usize },
    Skipped { path: PathBuf },
    Failed { path: PathBuf, error: String },
}

/// A document that could not be processed.
#[derive(Debug)]
pub struct DocumentFailure {
    pub path: PathBuf,
    pub error: Error,
}

/// Summary of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Number of candidate files discovered
    pub found: usize,
    /// Inputs whose outline was written
    pub succeeded: Vec<PathBuf>,
    /// Inputs left alone because their output existed
    pub skipped: Vec<PathBuf>,
    /// Inputs that failed, with the reason
    pub failed: Vec<DocumentFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

enum Outcome {
    Written,
    Skipped,
    Failed(Error),
}

/// List the `*.pdf` files (any extension case) directly inside `dir`,
/// sorted by path.
pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Where the outline for `input` goes.
pub fn output_path(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output_dir.join(format!("{}.json", stem))
}

/// Process every PDF in `input_dir`, writing outlines into `output_dir`.
///
/// Only problems with the directories themselves fail the call; document
/// failures are collected in the report.
pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_dir: Q,
    options: &BatchOptions,
    extractor: &OutlineExtractor,
    events: Option<Sender<BatchEvent>>,
) -> Result<BatchReport> {
    let input_dir = input_dir.as_ref();
    let output_dir = output_dir.as_ref();

    let files = discover(input_dir)?;
    fs::create_dir_all(output_dir)?;
    log::info!(
        "found {} PDF files in {}",
        files.len(),
        input_dir.display()
    );

    let process = |path: &PathBuf| {
        let outcome = process_one(path, output_dir, options, extractor, events.as_ref());
        (path.clone(), outcome)
    };

    let outcomes: Vec<(PathBuf, Outcome)> = if options.parallel {
        match options.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| Error::Other(format!("thread pool: {}", e)))?;
                pool.install(|| files.par_iter().map(process).collect())
            }
            None => files.par_iter().map(process).collect(),
        }
    } else {
        files.iter().map(process).collect()
    };

    let mut report = BatchReport {
        found: files.len(),
        ..Default::default()
    };
    for (path, outcome) in outcomes {
        match outcome {
            Outcome::Written => report.succeeded.push(path),
            Outcome::Skipped => report.skipped.push(path),
            Outcome::Failed(error) => report.failed.push(DocumentFailure { path, error }),
        }
    }

    log::info!(
        "batch done: {} succeeded, {} skipped, {} failed",
        report.succeeded.len(),
        report.skipped.len(),
        report.failed.len()
    );
    Ok(report)
}

fn process_one(
    path: &Path,
    output_dir: &Path,
    options: &BatchOptions,
    extractor: &OutlineExtractor,
    events: Option<&Sender<BatchEvent>>,
) -> Outcome {
    let send = |event: BatchEvent| {
        if let Some(tx) = events {
            // A dropped receiver only means nobody is watching
            let _ = tx.send(event);
        }
    };

    let output = output_path(output_dir, path);
    if options.skip_existing && output.exists() {
        log::debug!("skipping {}: output exists", path.display());
        send(BatchEvent::Skipped {
            path: path.to_path_buf(),
        });
        return Outcome::Skipped;
    }

    send(BatchEvent::Started {
        path: path.to_path_buf(),
    });

    let result = extractor
        .extract(path)
        .and_then(|outline| write_json(&outline, &output, options.json_format).map(|_| outline));

    match result {
        Ok(outline) => {
            let headings = outline.outline.len();
            log::info!(
                "{} -> {} ({} headings)",
                path.display(),
                output.display(),
                headings
            );
            send(BatchEvent::Finished {
                path: path.to_path_buf(),
                output,
                headings,
            });
            Outcome::Written
        }
        Err(error) => {
            log::warn!("skipping {}: {}", path.display(), error);
            send(BatchEvent::Failed {
                path: path.to_path_buf(),
                error: error.to_string(),
            });
            Outcome::Failed(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.PDF", "notes.txt", "c.pdf.bak"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let files = discover(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[test]
    fn test_discover_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(discover(dir.path().join("absent")), Err(Error::Io(_))));
    }

    #[test]
    fn test_output_path() {
        let out = output_path(Path::new("/out"), Path::new("/in/report.final.pdf"));
        assert_eq!(out, PathBuf::from("/out/report.final.json"));
    }

    #[test]
    fn test_options_builder() {
        let options = BatchOptions::new()
            .sequential()
            .with_threads(2)
            .with_json_format(JsonFormat::Compact)
            .with_skip_existing(true);
        assert!(!options.parallel);
        assert_eq!(options.threads, Some(2));
        assert_eq!(options.json_format, JsonFormat::Compact);
        assert!(options.skip_existing);
    }

    #[test]
    fn test_corrupt_file_is_isolated() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("broken.pdf"), b"definitely not a pdf").unwrap();

        let report = run(
            input.path(),
            output.path(),
            &BatchOptions::new().sequential(),
            &OutlineExtractor::new(),
            None,
        )
        .unwrap();

        assert_eq!(report.found, 1);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].error.is_decode_failure());
        assert!(!output.path().join("broken.json").exists());
    }
}
