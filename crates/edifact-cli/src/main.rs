use std::io::{Read, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use edifact_codec::{
    generate_orders, order_to_orders, BuildConfig, EdifactCodec, GenerateOptions, Order,
    ParseOptions, Severity,
};
use edifact_parser::EdifactHandler;
use edifact_types::{Control, EdifactDelimiters, RawSegment};

#[derive(Parser)]
#[command(name = "edifact-cli")]
#[command(about = "Parse, generate, validate, and inspect EDIFACT documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an EDIFACT document and print a JSON interchange summary plus diagnostics.
    Parse {
        /// Path to the .edi file. Reads from stdin when omitted.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Abort once more than this many segments have been collected.
        #[arg(long)]
        max_segments: Option<usize>,
    },

    /// Generate an EDIFACT ORDERS document from a canonical order JSON file.
    Generate {
        /// Path to a canonical order JSON file (see `edifact_codec::Order`).
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        sender: String,

        #[arg(long)]
        recipient: String,

        /// Output path. Writes to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate an EDIFACT document's structure. Exits non-zero if any
    /// error-severity diagnostic is found.
    Validate {
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Peek at a document's delimiters and first message's type/version
    /// without running a full parse.
    Inspect {
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Generate(#[from] edifact_codec::GenerateError),
    #[error("{0} error-severity diagnostic(s) found")]
    DiagnosticsFailed(usize),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Parse { file, max_segments } => parse_command(file, max_segments),
        Commands::Generate {
            input,
            sender,
            recipient,
            output,
        } => generate_command(input, sender, recipient, output),
        Commands::Validate { file } => validate_command(file),
        Commands::Inspect { file } => inspect_command(file),
    }
}

fn read_input(file: Option<PathBuf>) -> Result<Vec<u8>, CliError> {
    match file {
        Some(path) => Ok(std::fs::read(path)?),
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

#[derive(Serialize)]
struct MessageSummary {
    message_type: String,
    version: String,
    release: String,
    reference_number: String,
    segment_count: usize,
}

#[derive(Serialize)]
struct InterchangeSummary {
    sender: String,
    recipient: String,
    date: String,
    time: String,
    control_reference: String,
    group_count: usize,
    message_count: usize,
    messages: Vec<MessageSummary>,
}

fn parse_command(file: Option<PathBuf>, max_segments: Option<usize>) -> Result<(), CliError> {
    let input = read_input(file)?;
    let codec = EdifactCodec::default();
    let result = codec.parse_document(&input, &ParseOptions { max_segments });

    for diagnostic in result.errors.iter().chain(result.warnings.iter()) {
        eprintln!("{diagnostic}");
    }

    let Some(interchange) = result.interchange else {
        return Err(CliError::DiagnosticsFailed(result.errors.len()));
    };

    let summary = InterchangeSummary {
        sender: interchange.header.sender_id.clone(),
        recipient: interchange.header.recipient_id.clone(),
        date: interchange.header.date.clone(),
        time: interchange.header.time.clone(),
        control_reference: interchange.header.control_reference.clone(),
        group_count: interchange.body.group_count(),
        message_count: interchange.body.message_count(),
        messages: interchange
            .all_messages()
            .into_iter()
            .map(|m| MessageSummary {
                message_type: m.header.message_type.clone(),
                version: m.header.message_version.clone(),
                release: m.header.message_release.clone(),
                reference_number: m.header.message_reference_number.clone(),
                segment_count: m.body.len(),
            })
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if !result.success {
        return Err(CliError::DiagnosticsFailed(result.errors.len()));
    }
    Ok(())
}

fn generate_command(
    input: PathBuf,
    sender: String,
    recipient: String,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let json = std::fs::read_to_string(input)?;
    let order: Order = serde_json::from_str(&json)?;

    let codec = EdifactCodec::default();
    let record = order_to_orders(&order, "1");
    let message = generate_orders(&record, "D", "96A");
    let bytes = codec.generate_document(
        vec![message],
        &sender,
        &recipient,
        &BuildConfig::default(),
        &GenerateOptions::default(),
    )?;

    match output {
        Some(path) => {
            std::fs::write(&path, &bytes)?;
            println!("Wrote {} ({} bytes)", path.display(), bytes.len());
        }
        None => {
            std::io::stdout().write_all(&bytes)?;
        }
    }
    Ok(())
}

fn validate_command(file: Option<PathBuf>) -> Result<(), CliError> {
    let input = read_input(file)?;
    let codec = EdifactCodec::default();
    let result = codec.parse_document(&input, &ParseOptions::default());

    let mut diagnostics = result.errors.clone();
    diagnostics.extend(result.warnings.clone());
    if let Some(interchange) = &result.interchange {
        diagnostics.extend(codec.validate_syntax(interchange));
    }

    for diagnostic in &diagnostics {
        println!("{diagnostic}");
    }

    let error_count = diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
    if error_count > 0 {
        return Err(CliError::DiagnosticsFailed(error_count));
    }
    Ok(())
}

/// Stops at the first `UNH`, so it never walks a whole document the way
/// `parse`/`validate` do.
struct InspectHandler {
    delimiters: EdifactDelimiters,
    explicit_una: bool,
    message_type: Option<String>,
    message_version: Option<String>,
    message_release: Option<String>,
}

impl EdifactHandler for InspectHandler {
    fn on_delimiters(&mut self, delimiters: &EdifactDelimiters, explicit_una: bool) {
        self.delimiters = *delimiters;
        self.explicit_una = explicit_una;
    }

    fn on_segment(&mut self, segment: &RawSegment<'_>) -> Control {
        if segment.is("UNH") {
            self.message_type = non_empty(segment.get_component(1, 0));
            self.message_version = non_empty(segment.get_component(1, 1));
            self.message_release = non_empty(segment.get_component(1, 2));
            return Control::Stop;
        }
        Control::Continue
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[derive(Serialize)]
struct InspectSummary {
    explicit_una: bool,
    component_separator: char,
    element_separator: char,
    decimal_mark: char,
    release_character: char,
    segment_terminator: char,
    message_type: Option<String>,
    message_version: Option<String>,
    message_release: Option<String>,
}

fn inspect_command(file: Option<PathBuf>) -> Result<(), CliError> {
    let input = read_input(file)?;
    let mut handler = InspectHandler {
        delimiters: EdifactDelimiters::default(),
        explicit_una: false,
        message_type: None,
        message_version: None,
        message_release: None,
    };
    // A parse error this early just means there was nothing more to find;
    // the handler still reports whatever delimiters/UNH it saw before then.
    let _ = edifact_parser::EdifactStreamParser::parse(&input, &mut handler);

    let summary = InspectSummary {
        explicit_una: handler.explicit_una,
        component_separator: handler.delimiters.component as char,
        element_separator: handler.delimiters.element as char,
        decimal_mark: handler.delimiters.decimal as char,
        release_character: handler.delimiters.release as char,
        segment_terminator: handler.delimiters.segment as char,
        message_type: handler.message_type,
        message_version: handler.message_version,
        message_release: handler.message_release,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
