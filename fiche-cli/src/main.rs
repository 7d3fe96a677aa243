//! Fiche CLI - Command-line tool for QR prompt fiches
//!
//! This binary provides command-line interfaces for:
//! - encode: fiche JSON → barcode text
//! - decode: barcode text → fiche JSON
//! - inspect: report the layers of a scanned code
//! - render: fill a scanned fiche's variables and print the prompt

mod config;

use clap::{ArgAction, Parser, Subcommand};
use config::Config;
use fiche_codec::{
    decode_fiche, decode_with, encode_strict, encode_with, inspect, CodecError, Encoded,
};
use fiche_prompt::{assistants, build_prompt};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;

#[derive(Parser)]
#[command(name = "fiche")]
#[command(about = "Encode prompt fiches into QR-sized text and back")]
#[command(version)]
struct Cli {
    /// More logging on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// TOML file overriding limits and compression level
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a fiche JSON document into barcode text
    ///
    /// Examples:
    ///   fiche encode fiche.json
    ///   fiche encode fiche.json -o code.txt --stats
    Encode {
        /// Fiche JSON file, or - for stdin
        input: PathBuf,
        /// Write the code here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print size statistics as JSON on stderr
        #[arg(long)]
        stats: bool,
        /// Emit the code even when it may be too dense to scan reliably
        #[arg(long)]
        force: bool,
        /// Also check authoring rules (labels, prompt length, choice options)
        #[arg(long)]
        strict: bool,
    },
    /// Decode scanned text back into fiche JSON
    Decode {
        /// File holding the scanned text, or - for stdin
        input: PathBuf,
        /// Write the fiche here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Single-line JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Show the envelope tag and layer sizes of a scanned code
    Inspect {
        /// File holding the scanned text, or - for stdin
        input: PathBuf,
    },
    /// Decode a fiche, fill its variables, and print the prompt
    ///
    /// Examples:
    ///   fiche render code.txt --set code_onu=1203 --set position=45.76,4.83
    ///   fiche render - --set etat=liquide --extra "Fuite au sol"
    Render {
        /// File holding the scanned text, or - for stdin
        input: PathBuf,
        /// Variable value as id=value (repeatable)
        #[arg(long = "set", value_name = "ID=VALUE", value_parser = parse_assignment)]
        values: Vec<(String, String)>,
        /// Additional information appended to the prompt
        #[arg(long)]
        extra: Option<String>,
        /// List the recommended assistants on stderr
        #[arg(long)]
        assistants: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", describe(&*err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Encode {
            input,
            output,
            stats,
            force,
            strict,
        } => handle_encode(&input, output.as_deref(), stats, force, strict, &config),
        Commands::Decode {
            input,
            output,
            compact,
        } => handle_decode(&input, output.as_deref(), compact, &config),
        Commands::Inspect { input } => handle_inspect(&input, &config),
        Commands::Render {
            input,
            values,
            extra,
            assistants,
        } => handle_render(&input, values, extra.as_deref(), assistants, &config),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Error text shown to the user, prefixed with the failing stage when known.
fn describe(err: &(dyn Error + 'static)) -> String {
    match err.downcast_ref::<CodecError>() {
        Some(codec) => format!("{} stage: {}", codec.stage(), codec),
        None => err.to_string(),
    }
}

fn handle_encode(
    input: &Path,
    output: Option<&Path>,
    stats: bool,
    force: bool,
    strict: bool,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let text = read_input(input)?;
    let doc: Value = serde_json::from_str(&text)
        .map_err(|e| format!("{} is not valid JSON: {}", display_name(input), e))?;
    let encoded = encode_document(&doc, strict, config)?;

    if stats {
        let report = json!({ "stats": encoded.stats, "size": encoded.size });
        eprintln!("{}", serde_json::to_string_pretty(&report)?);
    }

    if encoded.size.exceeds_advisory {
        if !force {
            return Err(format!(
                "encoded fiche is {} characters, above the {} recommended for reliable \
                 scanning; shorten it or pass --force",
                encoded.size.wrapper_length, encoded.size.advisory_threshold
            )
            .into());
        }
        tracing::warn!(
            length = encoded.size.wrapper_length,
            threshold = encoded.size.advisory_threshold,
            "code may be hard to scan"
        );
    }

    write_output(output, &encoded.wrapper_string)
}

fn encode_document(doc: &Value, strict: bool, config: &Config) -> Result<Encoded, CodecError> {
    let opts = config.encode_options();
    if strict {
        encode_strict(doc, &opts)
    } else {
        encode_with(doc, &opts)
    }
}

fn handle_decode(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let code = read_input(input)?;
    let doc = decode_with(code.as_str(), &config.decode_options())?;
    let text = if compact {
        serde_json::to_string(&doc)?
    } else {
        serde_json::to_string_pretty(&doc)?
    };
    write_output(output, &text)
}

fn handle_inspect(input: &Path, config: &Config) -> Result<(), Box<dyn Error>> {
    let code = read_input(input)?;
    let inspection = inspect(code.as_str(), &config.decode_options())?;
    write_output(None, &serde_json::to_string_pretty(&inspection)?)
}

fn handle_render(
    input: &Path,
    values: Vec<(String, String)>,
    extra: Option<&str>,
    show_assistants: bool,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let code = read_input(input)?;
    let fiche = decode_fiche(code.as_str(), &config.decode_options())?;
    let inputs: BTreeMap<String, String> = values.into_iter().collect();

    let rendered = build_prompt(&fiche, &inputs, extra)?;

    if show_assistants {
        let mut stderr = std::io::stderr().lock();
        for assistant in assistants(&fiche) {
            writeln!(
                &mut stderr,
                "{} (level {}){}",
                assistant.name,
                u8::from(assistant.level),
                if assistant.enabled { "" } else { ", not recommended" }
            )?;
        }
    }

    write_output(None, &rendered.text)
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((id, value)) if !id.trim().is_empty() => {
            Ok((id.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected ID=VALUE, got '{}'", raw)),
    }
}

fn read_input(input: &Path) -> Result<String, Box<dyn Error>> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    fs::read_to_string(input)
        .map_err(|e| format!("cannot read {}: {}", input.display(), e).into())
}

fn write_output(output: Option<&Path>, text: &str) -> Result<(), Box<dyn Error>> {
    match output {
        Some(path) => {
            fs::write(path, format!("{}\n", text))
                .map_err(|e| format!("cannot write {}: {}", path.display(), e))?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(&mut stdout, "{}", text)?;
        }
    }
    Ok(())
}

fn display_name(input: &Path) -> String {
    if input == Path::new("-") {
        "stdin".to_string()
    } else {
        input.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiche_format::FicheError;

    #[test]
    fn parse_assignment_splits_on_first_equals() {
        assert_eq!(
            parse_assignment("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_assignment(" id =").unwrap(),
            ("id".to_string(), String::new())
        );
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn cli_parse_verbose_levels() {
        let cli = Cli::try_parse_from(["fiche", "inspect", "code.txt"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);

        let cli = Cli::try_parse_from(["fiche", "-vv", "inspect", "code.txt"]).unwrap();
        assert_eq!(cli.verbose, 2);

        assert!(Cli::try_parse_from(["fiche", "-v", "-q", "inspect", "code.txt"]).is_err());
    }

    #[test]
    fn render_collects_repeated_values() {
        let cli = Cli::try_parse_from([
            "fiche", "render", "-", "--set", "a=1", "--set", "b=2", "--extra", "note",
        ])
        .unwrap();
        match cli.command {
            Commands::Render { values, extra, .. } => {
                assert_eq!(values.len(), 2);
                assert_eq!(values[1], ("b".to_string(), "2".to_string()));
                assert_eq!(extra.as_deref(), Some("note"));
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn describe_names_codec_stage() {
        let err: Box<dyn Error> = Box::new(CodecError::SizeExceeded {
            actual: 5001,
            max: 5000,
        });
        let text = describe(&*err);
        assert!(text.starts_with("size stage: "));
        assert!(text.contains("5001"));

        let err: Box<dyn Error> = Box::new(FicheError::MissingValues {
            labels: vec!["Code ONU".to_string()],
        });
        assert_eq!(describe(&*err), "Missing required values: Code ONU");
    }

    #[test]
    fn strict_encoding_applies_authoring_rules() {
        let doc = json!({
            "meta": {"categorie": "c", "titre": "t", "objectif": "o", "date": "2024-01-01"},
            "prompt": {
                "base": "{{x}}",
                "variables": [{"id": "x", "label": "", "type": "text"}]
            }
        });
        let config = Config::default();
        assert!(encode_document(&doc, false, &config).is_ok());
        let err = encode_document(&doc, true, &config).unwrap_err();
        assert_eq!(err.stage(), "validation");
    }
}
