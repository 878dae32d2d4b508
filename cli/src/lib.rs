use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use newsprep_core::persist::{save_gold_file, save_report, GoldFile};
use newsprep_core::{load_gold_standard, process_tree, ErrorPolicy, HeaderMatcher, OutputLayout, StripOptions, TreeOrder};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "newsprep")]
#[command(about = "Prepare topic-organized news corpora for clustering", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Strip header blocks from every file under <input>/<topic>/
    Strip {
        /// Input root containing one subdirectory per topic
        #[arg(long)]
        input: PathBuf,
        /// Output directory for stripped files
        #[arg(long)]
        output: PathBuf,
        /// Header pattern file, one regex fragment per line
        #[arg(long, env = "NEWSPREP_PATTERNS", default_value = "./data/headers.txt")]
        patterns: PathBuf,
        /// Log failing files and continue instead of aborting
        #[arg(long, default_value_t = false)]
        keep_going: bool,
        /// Write output/<topic>/<file> instead of a flat output/<file>
        #[arg(long, default_value_t = false)]
        by_topic: bool,
        /// Visit topics and files in name order
        #[arg(long, default_value_t = false)]
        sorted: bool,
        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Load a gold-standard topic -> document id map and print it as JSON
    Gold {
        /// Root containing one subdirectory per topic, filenames are document ids
        #[arg(long)]
        input: PathBuf,
        /// Write JSON here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Visit topics and files in name order
        #[arg(long, default_value_t = false)]
        sorted: bool,
    },
}

fn tree_order(sorted: bool) -> TreeOrder {
    if sorted { TreeOrder::Sorted } else { TreeOrder::Filesystem }
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Strip { input, output, patterns, keep_going, by_topic, sorted, report } => {
            let options = StripOptions {
                order: tree_order(sorted),
                layout: if by_topic { OutputLayout::ByTopic } else { OutputLayout::Flat },
                on_error: if keep_going { ErrorPolicy::Continue } else { ErrorPolicy::FailFast },
            };
            strip(&input, &output, &patterns, &options, report.as_deref())
        }
        Commands::Gold { input, output, sorted } => gold(&input, output.as_deref(), tree_order(sorted)),
    }
}

fn strip(input: &Path, output: &Path, patterns: &Path, options: &StripOptions, report_path: Option<&Path>) -> Result<()> {
    let matcher = HeaderMatcher::load(patterns).with_context(|| format!("loading header patterns from {}", patterns.display()))?;
    tracing::debug!(expr = matcher.as_str(), "compiled header matcher");

    let report = process_tree(input, output, &matcher, options).with_context(|| format!("stripping headers under {}", input.display()))?;
    if let Some(path) = report_path {
        save_report(path, &report)?;
    }
    if !report.is_clean() {
        bail!("{} file(s) failed during header stripping", report.failures.len());
    }
    tracing::info!(output = %output.display(), files = report.files, "stripped corpus written");
    Ok(())
}

fn gold(input: &Path, output: Option<&Path>, order: TreeOrder) -> Result<()> {
    let topics = load_gold_standard(input, order).with_context(|| format!("loading gold standard from {}", input.display()))?;
    let created_at = time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339).unwrap_or_else(|_| "".into());
    let file = GoldFile::new(topics, created_at);
    match output {
        Some(path) => {
            save_gold_file(path, &file)?;
            tracing::info!(output = %path.display(), topics = file.num_topics, docs = file.num_docs, "gold standard written");
        }
        None => {
            let json = serde_json::to_string_pretty(&file)?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}
