use anyhow::{Context, Result, bail};
use autumnus::{FormatterOption, Options, highlight, themes};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueHint};
use iocraft::prelude::*;
use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use crate::{
    builder::BuildOptions,
    config::{Config, ConfigFile},
    ui::{ConfigHeader, ErrorMessage, InputPrompt, RequestSummary, SuccessMessage},
};

mod builder;
mod config;
mod digest;
mod error;
mod request;
mod ui;
mod verify;

#[derive(Parser)]
#[command(name = "upreq")]
#[command(version)]
#[command(about = "Prepare UploadFileFromMap GraphQL request bodies from local files")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Default)]
struct BuildArgs {
    /// File to embed in the request
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,
    /// Where to write the request document
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
    /// Filename sent to the server (defaults to the input's file name)
    #[arg(short, long)]
    filename: Option<String>,
    #[arg(short, long)]
    mime_type: Option<String>,
    /// Literal value for the encrypted_key field
    #[arg(short, long)]
    encrypted_key: Option<String>,
    /// Folder to place the uploaded file in
    #[arg(long)]
    folder_id: Option<u64>,
}

impl BuildArgs {
    fn into_options(self, config: &Config) -> BuildOptions {
        let mut options = config.build_options();
        if let Some(input) = self.input {
            options.input = input;
        }
        if let Some(output) = self.output {
            options.output = output;
        }
        if let Some(mime_type) = self.mime_type {
            options.metadata.mime_type = mime_type;
        }
        if let Some(encrypted_key) = self.encrypted_key {
            options.metadata.encrypted_key = encrypted_key;
        }
        options.filename = self.filename;
        options.metadata.folder_id = self.folder_id;
        options
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write an UploadFileFromMap request document for a file (default)
    Build {
        #[command(flatten)]
        args: BuildArgs,
    },
    /// Check that a request document's payload matches its size and hash
    Verify {
        /// Request document to check (defaults to the configured output)
        #[arg(value_hint = ValueHint::FilePath)]
        path: Option<PathBuf>,
        /// Print the decoded metadata
        #[arg(short, long)]
        show: bool,
    },
    /// Configure default paths and metadata interactively
    Config,
}

fn main() -> ExitCode {
    clap_complete::CompleteEnv::with_factory(Cli::command).complete();
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Build {
        args: BuildArgs::default(),
    });

    let result = match command {
        Commands::Build { args } => build_request(args),
        Commands::Verify { path, show } => verify_request(path, show),
        Commands::Config => interactive_config(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            element!(ErrorMessage(message: format!("{e:#}"))).print();
            ExitCode::FAILURE
        }
    }
}

fn build_request(args: BuildArgs) -> Result<()> {
    let config = config::read_config()?;
    let options = args.into_options(&config);

    let outcome = match builder::build_request(&options) {
        Ok(outcome) => outcome,
        Err(e) if e.is_not_found() => bail!(
            "Input file {} does not exist (pass --input or run `upreq config`)",
            options.input.display()
        ),
        Err(e) => return Err(e).context("Failed to create request"),
    };

    element!(SuccessMessage(message: "Request created successfully".to_string())).print();
    element! {
        RequestSummary(
            filename: outcome.filename,
            size_bytes: outcome.size_bytes,
            content_hash: outcome.content_hash,
            mime_type: outcome.mime_type,
            location: format!("{} ({} bytes)", outcome.output.display(), outcome.document_len)
        )
    }
    .print();

    Ok(())
}

fn verify_request(path: Option<PathBuf>, show: bool) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => config::read_config()?.output,
    };

    let verified = verify::verify_file(&path)
        .with_context(|| format!("Request document {} failed verification", path.display()))?;

    element!(SuccessMessage(message: "Payload matches declared size and hash".to_string())).print();
    let metadata = &verified.metadata;
    element! {
        RequestSummary(
            filename: metadata.filename.clone(),
            size_bytes: metadata.size_bytes,
            content_hash: metadata.content_hash.clone(),
            mime_type: metadata.mime_type.clone(),
            location: path.display().to_string()
        )
    }
    .print();

    if show {
        let output = highlight(
            &serde_json::to_string_pretty(&verified.preview()?)?,
            Options {
                formatter: FormatterOption::Terminal {
                    theme: Some(
                        themes::get("ayu_light").expect("Syntax highlighting theme not found"),
                    ),
                },
                lang_or_file: Some("json"),
            },
        );
        println!("{}", output);
    }

    Ok(())
}

fn read_input(prompt: &str, default: Option<&str>, description: Option<&str>) -> Result<String> {
    element! {
        InputPrompt(
            prompt: prompt.to_string(),
            default: default.map(|s| s.to_string()),
            description: description.map(|s| s.to_string())
        )
    }
    .print();

    print!("> ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim().to_string();

    if input.is_empty() {
        if let Some(def) = default {
            Ok(def.to_string())
        } else {
            Ok(input)
        }
    } else {
        Ok(input)
    }
}

fn interactive_config() -> Result<()> {
    element!(ConfigHeader()).print();

    let current = config::read_config()?;

    let input = read_input(
        "Input file",
        Some(&current.input.display().to_string()),
        Some("File embedded in the request when --input is not given"),
    )?;

    let output = loop {
        let output = read_input(
            "Output file",
            Some(&current.output.display().to_string()),
            Some("Where the request document is written"),
        )?;

        if output.ends_with('/') {
            element!(ErrorMessage(message: "Output must be a file path, not a directory".to_string()))
                .print();
        } else {
            break output;
        }
    };

    let mime_type = read_input(
        "MIME type",
        Some(&current.mime_type),
        Some("Sent as mime_type in the file metadata"),
    )?;

    let encrypted_key = read_input(
        "Encrypted key",
        Some(&current.encrypted_key),
        Some("Sent verbatim as encrypted_key; no key material is generated"),
    )?;

    let config_file = ConfigFile {
        input: Some(PathBuf::from(input)),
        output: Some(PathBuf::from(output)),
        mime_type: Some(mime_type),
        encrypted_key: Some(encrypted_key),
    };

    let written = config::write_config(config_file)?;

    element!(SuccessMessage(message: format!("Configuration written to {}", written.display())))
        .print();

    Ok(())
}
