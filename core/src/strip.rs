//! Header stripping: a two-state line filter applied to every file of a topic tree.

use crate::error::{PrepError, Result};
use crate::patterns::HeaderMatcher;
use crate::tree::{self, TreeOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Whether the previous line left us inside a header block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineState {
    #[default]
    Body,
    Header,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Header,
    Continuation,
    Body,
}

impl LineClass {
    pub fn is_dropped(self) -> bool {
        !matches!(self, LineClass::Body)
    }
}

impl LineState {
    /// Classify `line` and return the state for the next line.
    ///
    /// Only a line whose first byte is a space or tab continues an open
    /// header block; anything else (blank lines included) closes it and is kept.
    pub fn classify(self, matcher: &HeaderMatcher, line: &[u8]) -> (LineClass, LineState) {
        if matcher.is_header(line) {
            (LineClass::Header, LineState::Header)
        } else if self == LineState::Header && is_continuation(line) {
            (LineClass::Continuation, LineState::Header)
        } else {
            (LineClass::Body, LineState::Body)
        }
    }
}

fn is_continuation(line: &[u8]) -> bool {
    matches!(line.first(), Some(b' ' | b'\t'))
}

/// Per-file classifier; state starts at [`LineState::Body`].
pub struct HeaderFilter<'m> {
    matcher: &'m HeaderMatcher,
    state: LineState,
}

impl<'m> HeaderFilter<'m> {
    pub fn new(matcher: &'m HeaderMatcher) -> Self {
        Self { matcher, state: LineState::default() }
    }

    pub fn feed(&mut self, line: &[u8]) -> LineClass {
        let (class, next) = self.state.classify(self.matcher, line);
        self.state = next;
        class
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStats {
    pub lines_read: u64,
    pub lines_dropped: u64,
}

/// Copy `reader` to `writer`, leaving out header blocks. Kept lines are written byte-for-byte.
pub fn strip_stream<R: BufRead, W: Write>(matcher: &HeaderMatcher, reader: R, writer: W) -> io::Result<FileStats> {
    filter_lines(matcher, reader, writer, |e| e, |e| e)
}

/// Strip one file into `output`, creating or truncating it.
pub fn strip_file(input: &Path, output: &Path, matcher: &HeaderMatcher) -> Result<FileStats> {
    let infile = File::open(input).map_err(|e| PrepError::io(input, e))?;
    let outfile = File::create(output).map_err(|e| PrepError::io(output, e))?;
    filter_lines(
        matcher,
        BufReader::new(infile),
        BufWriter::new(outfile),
        |e| PrepError::io(input, e),
        |e| PrepError::io(output, e),
    )
}

// Read errors and write errors are mapped separately so callers can tell which side failed.
fn filter_lines<R, W, E>(
    matcher: &HeaderMatcher,
    mut reader: R,
    mut writer: W,
    read_err: impl Fn(io::Error) -> E,
    write_err: impl Fn(io::Error) -> E,
) -> std::result::Result<FileStats, E>
where
    R: BufRead,
    W: Write,
{
    let mut filter = HeaderFilter::new(matcher);
    let mut stats = FileStats::default();
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).map_err(&read_err)? == 0 {
            break;
        }
        stats.lines_read += 1;
        if filter.feed(&line).is_dropped() {
            stats.lines_dropped += 1;
            continue;
        }
        writer.write_all(&line).map_err(&write_err)?;
    }
    writer.flush().map_err(&write_err)?;
    Ok(stats)
}

/// Where stripped files land under the output root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputLayout {
    /// `output/<filename>`; same-named files from different topics overwrite each other.
    #[default]
    Flat,
    /// `output/<topic>/<filename>`.
    ByTopic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Abort on the first file that fails.
    #[default]
    FailFast,
    /// Log and record the failure, then move on to the next file.
    Continue,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StripOptions {
    pub order: TreeOrder,
    pub layout: OutputLayout,
    pub on_error: ErrorPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeReport {
    pub topics: u64,
    pub files: u64,
    pub lines_read: u64,
    pub lines_dropped: u64,
    /// Output paths written more than once during the run.
    pub collisions: Vec<String>,
    pub failures: Vec<FileFailure>,
}

impl TreeReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, policy: ErrorPolicy, path: &Path, err: PrepError) -> Result<()> {
        match policy {
            ErrorPolicy::FailFast => Err(err),
            ErrorPolicy::Continue => {
                tracing::warn!(path = %path.display(), error = %err, "skipping after failure");
                self.failures.push(FileFailure { path: path.display().to_string(), error: err.to_string() });
                Ok(())
            }
        }
    }
}

/// Strip every file of every topic under `input_root` into `output_root`.
pub fn process_tree(input_root: &Path, output_root: &Path, matcher: &HeaderMatcher, options: &StripOptions) -> Result<TreeReport> {
    let topics = tree::topics(input_root, options.order)?;
    fs::create_dir_all(output_root).map_err(|e| PrepError::io(output_root, e))?;
    let mut report = TreeReport::default();
    let mut written: HashSet<PathBuf> = HashSet::new();

    for topic in topics {
        report.topics += 1;
        let out_dir = match options.layout {
            OutputLayout::Flat => output_root.to_path_buf(),
            OutputLayout::ByTopic => {
                let dir = output_root.join(&topic.name);
                if let Err(e) = fs::create_dir_all(&dir) {
                    report.record(options.on_error, &dir, PrepError::io(&dir, e))?;
                    continue;
                }
                dir
            }
        };
        let files = match tree::topic_files(&topic, options.order) {
            Ok(files) => files,
            Err(e) => {
                report.record(options.on_error, &topic.path, e)?;
                continue;
            }
        };

        for input in files {
            let Some(name) = input.file_name() else { continue };
            let output = out_dir.join(name);
            if !written.insert(output.clone()) {
                tracing::warn!(topic = %topic.name, output = %output.display(), "output name collision, overwriting");
                report.collisions.push(output.display().to_string());
            }
            match strip_file(&input, &output, matcher) {
                Ok(stats) => {
                    tracing::debug!(input = %input.display(), lines = stats.lines_read, dropped = stats.lines_dropped, "stripped");
                    report.files += 1;
                    report.lines_read += stats.lines_read;
                    report.lines_dropped += stats.lines_dropped;
                }
                Err(e) => report.record(options.on_error, &input, e)?,
            }
        }
    }

    tracing::info!(
        topics = report.topics,
        files = report.files,
        dropped = report.lines_dropped,
        collisions = report.collisions.len(),
        failures = report.failures.len(),
        "header stripping complete"
    );
    Ok(report)
}
