//! pdf-outline CLI - title and heading outlines from PDFs

use std::path::{Path, PathBuf};
use std::thread;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf_outline::batch::{self, BatchEvent, BatchOptions, BatchReport};
use pdf_outline::{
    render, ClassifierConfig, HeadingLevel, JsonFormat, OutlineExtractor, PageSelection,
    TitleFallback, TitlePolicy,
};

#[derive(Parser)]
#[command(name = "pdf-outline")]
#[command(version)]
#[command(about = "Extract a title and H1-H3 outline from PDFs as JSON", long_about = None)]
struct Cli {
    /// Directory of PDFs to process
    #[arg(value_name = "INPUT_DIR")]
    input: Option<PathBuf>,

    /// Directory receiving one JSON file per PDF
    #[arg(value_name = "OUTPUT_DIR")]
    output: Option<PathBuf>,

    #[command(flatten)]
    shared: SharedArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct SharedArgs {
    /// Classifier thresholds as JSON
    #[arg(long, global = true, value_name = "FILE", env = "PDF_OUTLINE_CONFIG")]
    config: Option<PathBuf>,

    /// How to break ties between Title candidates
    #[arg(long, global = true, value_enum)]
    title_policy: Option<TitleMode>,

    /// Derive the title from the file name when no line qualifies
    #[arg(long, global = true)]
    filename_title: bool,

    /// Longest line still eligible as a heading
    #[arg(long, global = true, value_name = "CHARS")]
    max_heading_chars: Option<usize>,

    /// Merge adjacent identical outline entries
    #[arg(long, global = true)]
    collapse_duplicates: bool,

    /// Keep going when a page cannot be decoded
    #[arg(long, global = true)]
    lenient: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every PDF in a directory
    Batch {
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        #[arg(value_name = "OUTPUT_DIR")]
        output: PathBuf,

        /// Process one document at a time
        #[arg(long)]
        sequential: bool,

        /// Worker threads (default: one per core)
        #[arg(long, value_name = "N")]
        threads: Option<usize>,

        /// Leave documents whose JSON already exists
        #[arg(long)]
        skip_existing: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Extract the outline of one PDF
    File {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Show the font-size statistics behind the heading levels
    Profile {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TitleMode {
    /// Topmost candidate wins
    Topmost,
    /// Bold candidate wins
    Bold,
}

impl From<TitleMode> for TitlePolicy {
    fn from(mode: TitleMode) -> Self {
        match mode {
            TitleMode::Topmost => TitlePolicy::TopmostFirst,
            TitleMode::Bold => TitlePolicy::BoldFirst,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.shared.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = build_extractor(&cli.shared).and_then(|extractor| match cli.command {
        Some(Commands::Batch {
            input,
            output,
            sequential,
            threads,
            skip_existing,
            compact,
        }) => {
            let mut options = BatchOptions::new()
                .with_skip_existing(skip_existing)
                .with_json_format(json_format(compact));
            if sequential {
                options = options.sequential();
            }
            if let Some(n) = threads {
                options = options.with_threads(n);
            }
            cmd_batch(&input, &output, &options, &extractor)
        }
        Some(Commands::File {
            input,
            output,
            compact,
            pages,
        }) => cmd_file(&input, output.as_deref(), compact, pages.as_deref(), extractor),
        Some(Commands::Profile { input }) => cmd_profile(&input, &extractor),
        None => match (cli.input, cli.output) {
            (Some(input), Some(output)) => {
                cmd_batch(&input, &output, &BatchOptions::default(), &extractor)
            }
            _ => {
                eprintln!("{}", "Usage: pdf-outline <INPUT_DIR> <OUTPUT_DIR>".yellow());
                eprintln!("       pdf-outline --help for more information");
                std::process::exit(1);
            }
        },
    });

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_extractor(args: &SharedArgs) -> Result<OutlineExtractor, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ClassifierConfig::from_file(path)?,
        None => ClassifierConfig::default(),
    };

    if let Some(mode) = args.title_policy {
        config = config.with_title_policy(mode.into());
    }
    if args.filename_title {
        config = config.with_title_fallback(TitleFallback::FileName);
    }
    if let Some(chars) = args.max_heading_chars {
        config = config.with_max_heading_chars(chars);
    }
    if args.collapse_duplicates {
        config = config.with_collapse_duplicates(true);
    }
    config.validate()?;

    let mut extractor = OutlineExtractor::new().with_config(config);
    if args.lenient {
        extractor = extractor.lenient();
    }
    Ok(extractor)
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    options: &BatchOptions,
    extractor: &OutlineExtractor,
) -> Result<(), Box<dyn std::error::Error>> {
    let total = batch::discover(input)?.len();
    if total == 0 {
        println!("{} {}", "No PDF files found in".yellow(), input.display());
        return Ok(());
    }

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let (tx, rx) = crossbeam_channel::unbounded();
    let report = thread::scope(|scope| {
        let worker = scope.spawn(|| batch::run(input, output, options, extractor, Some(tx)));

        // The channel closes once the batch drops its sender
        for event in rx {
            match event {
                BatchEvent::Started { path } => pb.set_message(file_label(&path)),
                BatchEvent::Finished { .. } | BatchEvent::Skipped { .. } => pb.inc(1),
                BatchEvent::Failed { path, error } => {
                    pb.println(format!("{} {}: {}", "✗".red(), path.display(), error));
                    pb.inc(1);
                }
            }
        }

        worker.join()
    });

    let report: BatchReport = match report {
        Ok(result) => result?,
        Err(_) => return Err("batch worker panicked".into()),
    };
    pb.finish_and_clear();

    print_summary(&report, output);
    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_summary(report: &BatchReport, output: &Path) {
    println!(
        "{} {} found, {} succeeded, {} skipped, {} failed",
        "Done!".green().bold(),
        report.found,
        report.succeeded.len().to_string().green(),
        report.skipped.len(),
        if report.failed.is_empty() {
            "0".normal()
        } else {
            report.failed.len().to_string().red()
        }
    );
    println!("{} {}", "Output:".dimmed(), output.display());

    for failure in &report.failed {
        println!("  {} {}: {}", "└─".dimmed(), failure.path.display(), failure.error);
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn cmd_file(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    pages: Option<&str>,
    extractor: OutlineExtractor,
) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = match pages {
        Some(p) => extractor.with_pages(
            PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?,
        ),
        None => extractor,
    };

    let outline = extractor.extract(input)?;
    let format = json_format(compact);

    if let Some(path) = output {
        render::write_json(&outline, path, format)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", render::to_json(&outline, format)?);
    }

    Ok(())
}

fn cmd_profile(input: &Path, extractor: &OutlineExtractor) -> Result<(), Box<dyn std::error::Error>> {
    let analysis = extractor.analyze(input)?;
    let profile = &analysis.profile;

    println!("{}", "Font Profile".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Lines".bold(), analysis.lines.len());

    match profile.body_size() {
        Some(size) => println!("{}: {:.1}pt", "Body size".bold(), size),
        None => println!("{}: {}", "Body size".bold(), "none".dimmed()),
    }
    match analysis.title_size {
        Some(size) => println!("{}: {:.1}pt", "Title size".bold(), size),
        None => println!("{}: {}", "Title size".bold(), "none".dimmed()),
    }

    println!();
    println!("{}", "Heading Ranking".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    let ranked: Vec<f32> = profile
        .heading_sizes()
        .into_iter()
        .filter(|size| Some(*size) != analysis.title_size)
        .collect();
    if ranked.is_empty() {
        println!("{}", "no heading size above body".dimmed());
    }
    for (rank, size) in ranked.iter().enumerate() {
        println!("  {} {:.1}pt", HeadingLevel::from_rank(rank).as_str().bold(), size);
    }

    println!();
    println!("{}", "Size Histogram".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (size, chars) in profile.size_histogram() {
        println!("  {:>6.1}pt  {:>8} chars", size, chars);
    }

    let discards = analysis.discard_counts();
    if !discards.is_empty() {
        println!();
        println!("{}", "Discarded Lines".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for (reason, count) in discards {
            println!("  {:?}: {}", reason, count);
        }
    }

    Ok(())
}

