//! strextract CLI - Extract translatable strings from Go source.

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use regex::Regex;
use serde::Serialize;
use strextract::errors::{exit_code, ExtractError};
use strextract::logging::init_logging;
use strextract::output::{write_report, OutputOptions};
use strextract::patterns;
use strextract::session::{ExtractionSession, FileReport};
use tracing::warn;

#[derive(Parser)]
#[command(name = "strextract")]
#[command(about = "Extract translatable string literals from Go source files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract strings and write translation files
    Extract {
        /// Go file to extract from
        #[arg(short, long, conflicts_with = "dir")]
        file: Option<PathBuf>,

        /// Directory to scan for .go files
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// JSON document of excluded strings, lines, regexps and enforced functions
        #[arg(short, long, default_value = "excluded.json")]
        exclude: PathBuf,

        /// JSON document of capture-group patterns
        #[arg(short, long)]
        substring_file: Option<PathBuf>,

        /// Output directory (default: next to each source file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip files whose path matches this regular expression
        #[arg(long)]
        ignore_regexp: Option<String>,

        /// Also write <file>.extracted.json with positions and locales
        #[arg(long)]
        meta: bool,

        /// Also write <file>.en.po
        #[arg(long)]
        po: bool,

        /// Extract and report without writing any file
        #[arg(long)]
        dry_run: bool,

        /// Print progress notices and warnings
        #[arg(short, long)]
        verbose: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

struct ExtractArgs {
    file: Option<PathBuf>,
    dir: Option<PathBuf>,
    recursive: bool,
    exclude: PathBuf,
    substring_file: Option<PathBuf>,
    ignore_regexp: Option<String>,
    output: OutputOptions,
    verbose: bool,
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    let json_output = matches!(cli.command, Commands::Extract { json: true, .. });

    let result = match cli.command {
        Commands::Extract {
            file,
            dir,
            recursive,
            exclude,
            substring_file,
            output,
            ignore_regexp,
            meta,
            po,
            dry_run,
            verbose,
            json,
        } => {
            init_logging(verbose);
            run_extract(ExtractArgs {
                file,
                dir,
                recursive,
                exclude,
                substring_file,
                ignore_regexp,
                output: OutputOptions {
                    output_dir: output,
                    meta,
                    po,
                    dry_run,
                },
                verbose,
                json,
            })
        }
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "strextract", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        if json_output {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: String,
            }

            let payload = ErrorOutput {
                error: e.to_string(),
            };

            let json = serde_json::to_string(&payload)
                .unwrap_or_else(|_| "{\"error\":\"serialization failed\"}".to_string());
            eprintln!("{json}");
        } else {
            eprintln!("error: {}", e);
        }
        std::process::exit(exit_code(&e));
    }
}

// --- Extract command ---

#[derive(Serialize)]
struct Summary {
    files: usize,
    failed: usize,
    strings: usize,
    unique: usize,
    written: Vec<String>,
}

fn run_extract(args: ExtractArgs) -> Result<(), ExtractError> {
    let substring_file = args.substring_file.as_deref();
    let patterns = patterns::load(Some(&args.exclude), substring_file)?;

    let mut session = ExtractionSession::new(patterns).recursive(args.recursive);
    if let Some(pattern) = &args.ignore_regexp {
        match Regex::new(pattern) {
            Ok(re) => session = session.ignore_regexp(re),
            Err(e) => warn!(pattern = %pattern, error = %e, "ignoring invalid ignore-regexp"),
        }
    }

    let reports: Vec<FileReport> = match (&args.file, &args.dir) {
        (Some(file), _) => session.inspect_file(file)?.into_iter().collect(),
        (None, dir) => {
            let dir = dir.as_deref().unwrap_or(Path::new("."));
            session.inspect_dir(dir)?.files
        }
    };

    let mut written = Vec::new();
    for report in &reports {
        for path in write_report(report, &args.output)? {
            written.push(path.display().to_string());
        }
    }

    let stats = session.stats();
    let summary = Summary {
        files: stats.files_processed,
        failed: stats.files_failed,
        strings: stats.strings_extracted,
        unique: session.results().len(),
        written,
    };

    if args.json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| ExtractError::Io(std::io::Error::other(e.to_string())))?;
        println!("{json}");
    } else if args.verbose {
        println!("Total files parsed: {}", summary.files);
        println!("Total extracted strings: {}", summary.strings);
    }

    Ok(())
}
