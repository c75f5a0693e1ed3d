//! magic-encoding CLI - text file encoding detector and converter

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args as ClapArgs, Parser, Subcommand};
use magic_encoding::{
    Detector, DetectionResult, EncodingId, PARSE_CANDIDATES, Taster, bom, encode_text,
    ensure_secure, first_acceptable, write_all_text,
};
use serde::Serialize;
use tracing::{Level, debug};

/// Detect the character encoding of text files and convert between encodings.
#[derive(Parser, Debug)]
#[command(name = "magic-encoding")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log detection decisions to stderr
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report the detected encoding of each file
    Detect {
        /// Input file(s)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        detection: DetectionArgs,

        /// Output format: text (default) or json
        #[arg(short = 'f', long, default_value = "text")]
        format: OutputFormat,
    },

    /// Convert a file to another encoding
    Convert {
        /// Input file
        file: PathBuf,

        /// Target encoding label, e.g. utf-8, utf-16le, iso-8859-1
        #[arg(short = 't', long, default_value = "utf-8")]
        to: String,

        /// Output file (default: write to stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Allow writing UTF-7
        #[arg(long)]
        allow_insecure: bool,

        #[command(flatten)]
        detection: DetectionArgs,
    },

    /// Check which encodings decode a file without errors, after any byte-order mark
    Validate {
        /// Input file
        file: PathBuf,

        /// Candidate encoding label(s), tried in order (default: utf-8, iso-8859-1, utf-7)
        #[arg(short = 'e', long = "encoding")]
        encodings: Vec<String>,
    },
}

#[derive(ClapArgs, Debug)]
struct DetectionArgs {
    /// Fallback encoding label when nothing is detected
    #[arg(long, default_value = "iso-8859-1")]
    fallback: String,

    /// Number of bytes examined by the heuristics (0 = whole file)
    #[arg(short = 'b', long, default_value = "0")]
    taster: usize,

    /// Reject heuristic matches that fail a strict decode of the whole file
    #[arg(long)]
    verify: bool,

    /// Guess a legacy code page with chardetng before using the fallback
    #[arg(long)]
    guess: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// One line of `detect --format json` output.
#[derive(Serialize, Debug)]
struct DetectionReport {
    file: String,
    encoding: &'static str,
    confidence: String,
    bom_len: usize,
}

impl DetectionReport {
    fn new(file: &Path, result: &DetectionResult) -> Self {
        Self {
            file: file.display().to_string(),
            encoding: result.encoding.name(),
            confidence: format!("{:?}", result.confidence),
            bom_len: result.bom_len,
        }
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Command::Detect {
            files,
            detection,
            format,
        } => detect_files(files, detection, *format),
        Command::Convert {
            file,
            to,
            output,
            allow_insecure,
            detection,
        } => convert_file(file, to, output.as_deref(), *allow_insecure, detection),
        Command::Validate { file, encodings } => validate_file(file, encodings),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build_detector(args: &DetectionArgs) -> CliResult<Detector> {
    let mut detector = Detector::new();
    detector
        .fallback(args.fallback.parse()?)
        .taster(Taster::Bytes(args.taster))
        .verify(args.verify)
        .guess_fallback(args.guess);
    Ok(detector)
}

fn detect_files(
    files: &[PathBuf],
    args: &DetectionArgs,
    format: OutputFormat,
) -> CliResult<ExitCode> {
    let detector = build_detector(args)?;
    let mut exit_code = ExitCode::SUCCESS;

    for file in files {
        match detector.detect_path(file) {
            Ok(result) => {
                debug!(file = %file.display(), ?result, "detected");
                match format {
                    OutputFormat::Text => println!(
                        "{}: {} ({:?}, BOM: {} bytes)",
                        file.display(),
                        result.encoding,
                        result.confidence,
                        result.bom_len
                    ),
                    OutputFormat::Json => println!(
                        "{}",
                        serde_json::to_string(&DetectionReport::new(file, &result))?
                    ),
                }
            }
            Err(e) => {
                eprintln!("Error processing {}: {}", file.display(), e);
                exit_code = ExitCode::FAILURE;
            }
        }
    }

    Ok(exit_code)
}

fn convert_file(
    file: &Path,
    to: &str,
    output: Option<&Path>,
    allow_insecure: bool,
    args: &DetectionArgs,
) -> CliResult<ExitCode> {
    let target: EncodingId = to.parse()?;
    if !allow_insecure {
        ensure_secure(target)?;
    }

    let detector = build_detector(args)?;
    let text = detector.read_text_path(file, target)?;
    debug!(
        file = %file.display(),
        chars = bytecount::num_chars(text.as_bytes()),
        "decoded"
    );

    match output {
        Some(path) => write_all_text(path, target, &text)?,
        None => std::io::stdout().write_all(&encode_text(&text, target))?,
    }

    Ok(ExitCode::SUCCESS)
}

fn validate_file(file: &Path, labels: &[String]) -> CliResult<ExitCode> {
    let candidates = if labels.is_empty() {
        PARSE_CANDIDATES.to_vec()
    } else {
        labels
            .iter()
            .map(|label| label.parse())
            .collect::<Result<Vec<EncodingId>, _>>()?
    };

    let data = std::fs::read(file)?;
    let marked = if bom::has_bom(&data) { " (BOM)" } else { "" };
    match first_acceptable(bom::strip_bom(&data), &candidates) {
        Some(encoding) => {
            println!("{}: {}{}", file.display(), encoding, marked);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("{}: no candidate decodes cleanly", file.display());
            Ok(ExitCode::FAILURE)
        }
    }
}
