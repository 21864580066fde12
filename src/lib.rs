//! Error-tolerant parser for Tailwind-style class expressions with variant
//! groups, important markers and arbitrary values, plus the position queries
//! editor tooling needs: [`hover`], [`suggest`] and [`spread`].
//!
//! ```
//! let result = twin_parser::spread("md:dark:(hover:(text-gray-500 bg-white))");
//! assert_eq!(result.items.len(), 2);
//! assert!(!result.has_errors());
//! ```

pub mod args;
pub mod brackets;
pub mod config;
pub mod errors;
pub mod hover;
pub mod nodes;
pub mod parser;
pub mod report;
pub mod scanner;
pub mod spread;
pub mod suggest;
pub mod terminal;
pub mod token;

pub use args::{CheckArgs, Cli, Commands, ParserArgs, PositionArgs, QueryArgs};
pub use config::ParserConfig;
pub use errors::{Result, TwinError};
pub use hover::{hover, HoverResult};
pub use nodes::{Node, NodeKind};
pub use parser::{default_parser, parse, ClassParser};
pub use report::{CheckReport, CheckReportBuilder, FileReport, Finding, FindingKind};
pub use spread::{spread, ErrorSpan, SpreadItem, SpreadResult};
pub use suggest::{suggest, SuggestResult};
pub use token::Token;

use std::fs;
#[cfg(feature = "cli")]
use std::path::Path;
use std::path::PathBuf;

use tracing::{debug, warn};

/// Files larger than this are skipped by `check`.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Build a parser from `--config` and `--separator`, the flag winning over
/// the file.
pub fn build_parser(args: &ParserArgs) -> Result<ClassParser> {
    let mut config = match &args.config {
        Some(path) => ParserConfig::from_file(path)?,
        None => ParserConfig::default(),
    };
    if let Some(separator) = &args.separator {
        config.separator = separator.clone();
    }
    debug!(separator = %config.separator, max_depth = config.max_depth, "parser configured");
    ClassParser::new(&config)
}

/// Which position query to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Spread,
    Hover(usize),
    Suggest(usize),
}

/// Run `query` over `text` and render the result as JSON.
pub fn render_query(parser: &ClassParser, query: Query, text: &str, pretty: bool) -> Result<String> {
    let value = match query {
        Query::Spread => serde_json::to_value(parser.spread(text))?,
        Query::Hover(position) => serde_json::to_value(parser.hover(text, position))?,
        Query::Suggest(position) => serde_json::to_value(parser.suggest(text, position))?,
    };
    let rendered = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(rendered)
}

/// Run a check over every file matched by `args.input`.
///
/// Each file is one class expression. When `args.output` is set the JSON
/// report is also written there.
#[cfg(feature = "cli")]
pub fn check(args: &CheckArgs) -> Result<CheckReport> {
    use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
    use rayon::prelude::*;
    use std::time::Instant;
    use tracing::info;

    args.validate().map_err(TwinError::InvalidInput)?;

    let parser = build_parser(&args.parser)?;
    let files = collect_files(&args.input, &args.exclude)?;
    if files.is_empty() {
        return Err(TwinError::NoFilesFound);
    }

    let total_size: u64 = files.iter().map(|(_, size)| size).sum();
    info!(
        files = files.len(),
        total_mb = total_size as f64 / (1024.0 * 1024.0),
        "checking class expressions"
    );

    let progress_bar = if args.verbose {
        ProgressBar::with_draw_target(Some(files.len() as u64), ProgressDrawTarget::hidden())
    } else {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({msg})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        pb.set_message("Starting check...");
        pb
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.jobs.unwrap_or(0))
        .build()
        .map_err(|e| TwinError::ConfigError {
            message: format!("Failed to build thread pool: {}", e),
        })?;

    let start = Instant::now();
    let checked: Vec<(String, FileReport)> = pool.install(|| {
        files
            .par_iter()
            .filter_map(|(path, _)| {
                let outcome = check_file(&parser, path);
                progress_bar.inc(1);
                progress_bar.set_message(format!(
                    "Checking: {}",
                    path.file_name().unwrap_or_default().to_string_lossy()
                ));
                outcome
            })
            .collect()
    });

    let report = checked
        .into_iter()
        .fold(CheckReportBuilder::new(parser.separator()), |builder, (path, file)| {
            builder.with_file(path, file)
        })
        .build();

    progress_bar.finish_with_message(format!(
        "✓ Complete ({} findings in {:.2}s)",
        report.metadata.findings,
        start.elapsed().as_secs_f64()
    ));

    if let Some(output) = &args.output {
        write_report(output, &report)?;
        info!(path = %output.display(), "report written");
    }

    Ok(report)
}

#[cfg(feature = "cli")]
fn check_file(parser: &ClassParser, path: &Path) -> Option<(String, FileReport)> {
    match fs::read_to_string(path) {
        Ok(source) => {
            let result = parser.spread(&source);
            let file = FileReport::from_spread(&source, &result);
            debug!(path = %path.display(), items = file.items, findings = file.findings.len(), "checked");
            Some((path.display().to_string(), file))
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping unreadable file");
            None
        }
    }
}

/// Collect files matching the given patterns, skipping directories,
/// excluded paths and files over [`MAX_FILE_SIZE`].
pub fn collect_files(patterns: &[String], exclude_patterns: &[String]) -> Result<Vec<(PathBuf, u64)>> {
    let excludes = exclude_patterns
        .iter()
        .map(|pattern| glob::Pattern::new(pattern))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut files = Vec::new();
    let mut seen = std::collections::HashSet::new();
    let mut skipped = 0usize;

    for pattern in patterns {
        for entry in glob::glob(pattern)? {
            let path = entry?;

            if excludes.iter().any(|exclude| exclude.matches_path(&path)) {
                continue;
            }
            if path.is_dir() {
                continue;
            }

            let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            if size > MAX_FILE_SIZE {
                warn!(
                    path = %path.display(),
                    size_mb = size / (1024 * 1024),
                    "skipping file over the size limit"
                );
                skipped += 1;
                continue;
            }

            if seen.insert(path.clone()) {
                files.push((path, size));
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, "files skipped due to size limit");
    }

    Ok(files)
}

#[cfg(feature = "cli")]
fn write_report(path: &Path, report: &CheckReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let content = report.to_pretty_json()?;
    write_atomic(path, &content).map_err(|e| TwinError::OutputError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Write file atomically by writing to temp file then renaming
#[cfg(feature = "cli")]
fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    use std::io::Write;

    let temp_path = path.with_extension("tmp");

    let mut file = fs::File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Handle spread/hover/suggest: read the expression from the argument or
/// stdin and print the JSON result to stdout.
#[cfg(feature = "cli")]
pub async fn handle_query_command(query: Query, args: QueryArgs) -> Result<()> {
    use tokio::io::{self, AsyncReadExt, AsyncWriteExt};

    let parser = build_parser(&args.parser)?;

    let text = match args.text {
        Some(text) => text,
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .await
                .map_err(|e| TwinError::InputError(format!("Failed to read from stdin: {}", e)))?;
            // a single trailing newline comes from the shell, not the expression
            if input.ends_with('\n') {
                input.pop();
                if input.ends_with('\r') {
                    input.pop();
                }
            }
            input
        }
    };

    let rendered = render_query(&parser, query, &text, args.pretty)?;

    let output_error = |e: std::io::Error| TwinError::OutputError {
        path: "stdout".to_string(),
        message: e.to_string(),
    };
    let mut stdout = io::stdout();
    stdout.write_all(rendered.as_bytes()).await.map_err(output_error)?;
    stdout.write_all(b"\n").await.map_err(output_error)?;
    stdout.flush().await.map_err(output_error)?;

    Ok(())
}
