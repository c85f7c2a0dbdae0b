mod output;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write, stderr};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use glob::glob;
use lvis_core::{
    BoundingBox, ByteOrder, DEFAULT_DETECTION_WINDOW, DecodeOptions, DecodeSummary, PipelineError,
    RecordFamily, RecordSink, SchemaError, SchemaVersion, catalog, decode_file, detect_file,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use output::{JsonLinesSink, OutputFormat, TextSink};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("LVIS_BUILD_COMMIT"),
    " ",
    env!("LVIS_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = "Examples:
  lvis-reader decode flight.lce -t
  lvis-reader decode 'LVIS_*.lgw' --family lgw -r 1.03 -n 10 -c
  lvis-reader decode flight.lge --lat 44.7-44.8 --lon 288.5-288.9 --format json
  lvis-reader detect flight.bin --pretty
  lvis-reader schema --family lgw --release 1.04";

const EXIT_FAILURE: u8 = 1;
const EXIT_INPUT_UNAVAILABLE: u8 = 2;
const EXIT_UNKNOWN_SCHEMA: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "lvis-reader")]
#[command(version = VERSION)]
#[command(
    about = "Reader for LVIS laser altimetry release files (LCE / LGE / LGW, releases 1.00-1.04).",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Log detection and decoding details (LVIS_LOG takes precedence)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a release file to delimited text or JSON lines.
    #[command(after_help = EXAMPLES)]
    Decode(DecodeArgs),
    /// Detect the record family and release of a file.
    Detect {
        /// Path to a release file (a glob must match exactly one file)
        input: PathBuf,

        /// Bytes read from the start of the file for detection
        #[arg(long, default_value_t = DEFAULT_DETECTION_WINDOW)]
        window: usize,

        /// Host byte order override (big or little)
        #[arg(long, value_name = "ORDER")]
        endian: Option<ByteOrder>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print cataloged record layouts as JSON.
    Schema {
        /// Only layouts of this family (lce, lge or lgw)
        #[arg(long)]
        family: Option<String>,

        /// Only layouts of this release (1.00 through 1.04)
        #[arg(short = 'r', long)]
        release: Option<String>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Path to a release file (a glob must match exactly one file)
    input: PathBuf,

    /// Separate columns with commas instead of tabs
    #[arg(short = 'c', long)]
    comma: bool,

    /// Prefix each row with the 1-based record index
    #[arg(short = 'i', long)]
    index: bool,

    /// Print a header line naming every column
    #[arg(short = 't', long)]
    header: bool,

    /// Force the record family (lce, lge or lgw); skips detection
    #[arg(long)]
    family: Option<String>,

    /// Force the release version (1.00 through 1.04); skips detection
    #[arg(short = 'r', long, value_name = "V.VV")]
    release: Option<String>,

    /// Stop after reading this many records (0 reads all)
    #[arg(short = 'n', long, value_name = "N")]
    count: Option<u64>,

    /// Latitude range; records on either bound are excluded
    #[arg(
        long,
        value_name = "MIN-MAX",
        value_parser = parse_degree_range,
        allow_hyphen_values = true
    )]
    lat: Option<DegreeRange>,

    /// Longitude range (0-360); records on either bound are excluded
    #[arg(
        long,
        value_name = "MIN-MAX",
        value_parser = parse_degree_range,
        allow_hyphen_values = true
    )]
    lon: Option<DegreeRange>,

    /// Host byte order override (big or little)
    #[arg(long, value_name = "ORDER")]
    endian: Option<ByteOrder>,

    /// Bytes read from the start of the file for detection
    #[arg(long, default_value_t = DEFAULT_DETECTION_WINDOW)]
    window: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DegreeRange {
    min: f64,
    max: f64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!("{} {}", env!("CARGO_PKG_NAME"), VERSION);

    let result = match cli.command {
        Commands::Decode(args) => cmd_decode(args),
        Commands::Detect {
            input,
            window,
            endian,
            pretty,
        } => cmd_detect(input, window, endian, pretty),
        Commands::Schema {
            family,
            release,
            pretty,
        } => cmd_schema(family, release, pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(err.exit_code)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(stderr)
        .with_ansi(false)
        .without_time()
        .with_env_filter(
            EnvFilter::try_from_env("LVIS_LOG").unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
    exit_code: u8,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
            exit_code: EXIT_FAILURE,
        }
    }

    fn input(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            exit_code: EXIT_INPUT_UNAVAILABLE,
            ..Self::new(message, hint)
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

impl From<SchemaError> for CliError {
    fn from(err: SchemaError) -> Self {
        Self {
            exit_code: EXIT_UNKNOWN_SCHEMA,
            ..Self::new(
                err.to_string(),
                Some("families: lce, lge, lgw; releases: 1.00 through 1.04".to_string()),
            )
        }
    }
}

impl From<PipelineError> for CliError {
    fn from(err: PipelineError) -> Self {
        match err {
            unavailable @ PipelineError::InputUnavailable { .. } => CliError::input(
                unavailable.to_string(),
                Some("check that the file exists and is readable".to_string()),
            ),
            PipelineError::Schema(err) => err.into(),
            PipelineError::Sink(err) => {
                CliError::new(format!("failed to write output: {err}"), None)
            }
            other => CliError::new(other.to_string(), None),
        }
    }
}

fn parse_degree_range(value: &str) -> Result<DegreeRange, String> {
    // The separator search starts after the first character so the minimum
    // may carry a sign.
    let split = value
        .get(1..)
        .and_then(|rest| rest.find('-'))
        .map(|pos| pos + 1)
        .ok_or_else(|| format!("expected MIN-MAX, got '{value}'"))?;
    let (min, max) = (&value[..split], &value[split + 1..]);
    let min = min
        .trim()
        .parse()
        .map_err(|_| format!("invalid minimum '{min}' in '{value}'"))?;
    let max = max
        .trim()
        .parse()
        .map_err(|_| format!("invalid maximum '{max}' in '{value}'"))?;
    Ok(DegreeRange { min, max })
}

fn decode_options(args: &DecodeArgs) -> Result<DecodeOptions, CliError> {
    let family = args
        .family
        .as_deref()
        .map(str::parse::<RecordFamily>)
        .transpose()?;
    let version = args
        .release
        .as_deref()
        .map(str::parse::<SchemaVersion>)
        .transpose()?;

    let mut bounds = BoundingBox::default();
    if let Some(range) = args.lat {
        bounds = bounds.with_lat(range.min, range.max);
    }
    if let Some(range) = args.lon {
        bounds = bounds.with_lon(range.min, range.max);
    }

    Ok(DecodeOptions {
        family,
        version,
        host_order: args.endian,
        bounds,
        max_records: args.count,
        detection_window: args.window,
    })
}

fn cmd_decode(args: DecodeArgs) -> Result<(), CliError> {
    let input = resolve_input_path(&args.input)?;
    validate_input_file(&input)?;
    let options = decode_options(&args)?;

    let out: Box<dyn Write> = match &args.output {
        Some(path) => {
            ensure_distinct_output(&input, path)?;
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(io::stdout().lock()),
    };
    let out = BufWriter::new(out);

    let summary = match args.format {
        OutputFormat::Text => {
            let delimiter = if args.comma { "," } else { "\t" };
            let mut sink = TextSink::new(out, delimiter, args.index, args.header);
            let summary = run_decode(&input, &options, &mut sink)?;
            sink.finish().context("Failed to flush output")?;
            summary
        }
        OutputFormat::Json => {
            let mut sink = JsonLinesSink::new(out);
            let summary = run_decode(&input, &options, &mut sink)?;
            sink.finish().context("Failed to flush output")?;
            summary
        }
    };

    debug!(
        family = %summary.family,
        version = %summary.version,
        records_read = summary.records_read,
        records_emitted = summary.records_emitted,
        "decode finished"
    );
    Ok(())
}

fn run_decode<S: RecordSink>(
    input: &Path,
    options: &DecodeOptions,
    sink: &mut S,
) -> Result<DecodeSummary, CliError> {
    Ok(decode_file(input, options, sink)?)
}

fn cmd_detect(
    input: PathBuf,
    window: usize,
    endian: Option<ByteOrder>,
    pretty: bool,
) -> Result<(), CliError> {
    let input = resolve_input_path(&input)?;
    validate_input_file(&input)?;
    let options = DecodeOptions {
        host_order: endian,
        detection_window: window,
        ..DecodeOptions::default()
    };
    let detection = detect_file(&input, &options)?;
    println!("{}", to_json(&detection, pretty)?);
    Ok(())
}

fn cmd_schema(
    family: Option<String>,
    release: Option<String>,
    pretty: bool,
) -> Result<(), CliError> {
    let family = family.as_deref().map(str::parse::<RecordFamily>).transpose()?;
    let version = release.as_deref().map(str::parse::<SchemaVersion>).transpose()?;
    let layouts: Vec<_> = catalog()
        .iter()
        .filter(|layout| family.is_none_or(|family| layout.family == family))
        .filter(|layout| version.is_none_or(|version| layout.version == version))
        .collect();
    println!("{}", to_json(&layouts, pretty)?);
    Ok(())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, CliError> {
    if pretty {
        serde_json::to_string_pretty(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn ensure_distinct_output(input: &Path, output: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    if fs::canonicalize(output).is_ok_and(|existing| existing == input_abs) {
        return Err(CliError::new(
            format!("output path must differ from input: {}", output.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::input(
            format!("input file not found: {}", input.display()),
            Some("pass an LVIS release file (.lce, .lge or .lgw)".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::input(
            format!("input is not a file: {}", input.display()),
            Some("pass an LVIS release file (.lce, .lge or .lgw)".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::input(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {listed}{more}",
                pattern,
                matches.len()
            ),
            Some("pass a single release file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
