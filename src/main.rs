use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use workflow_binding::{
    format_errors, placeholders, resolve, resolve_value, validate_with, BindError, Draft,
    ValidatorOptions,
};

/// Resolve workflow templates and validate payloads from the command line.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Verbose logging; repeat for more (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Substitute ${path} placeholders using a JSON context
    Resolve {
        /// Template text, or a JSON document when --deep is set
        template: String,
        /// Context JSON document
        context: String,
        /// Treat the template as JSON and resolve every string inside it
        #[arg(long)]
        deep: bool,
    },
    /// Validate a JSON document against a JSON Schema
    Validate {
        /// Schema JSON document
        schema: String,
        /// Data JSON document
        data: String,
        /// Stop at the first error
        #[arg(long)]
        first_error: bool,
        /// Do not enforce the `format` keyword
        #[arg(long)]
        no_formats: bool,
        /// Pin a JSON Schema draft
        #[arg(long, value_enum)]
        draft: Option<DraftArg>,
        /// Print the structured result instead of messages
        #[arg(long)]
        json: bool,
    },
    /// List the placeholder paths used by a template
    Placeholders {
        template: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DraftArg {
    #[value(name = "4")]
    Draft4,
    #[value(name = "6")]
    Draft6,
    #[value(name = "7")]
    Draft7,
    #[value(name = "2019-09")]
    Draft201909,
    #[value(name = "2020-12")]
    Draft202012,
}

impl From<DraftArg> for Draft {
    fn from(d: DraftArg) -> Self {
        match d {
            DraftArg::Draft4 => Draft::Draft4,
            DraftArg::Draft6 => Draft::Draft6,
            DraftArg::Draft7 => Draft::Draft7,
            DraftArg::Draft201909 => Draft::Draft201909,
            DraftArg::Draft202012 => Draft::Draft202012,
        }
    }
}

fn parse_json(label: &str, text: &str) -> Result<Value, BindError> {
    serde_json::from_str(text).map_err(|e| {
        tracing::error!("{label} is not valid JSON: {e}");
        BindError::Json(e)
    })
}

fn run(command: Command) -> Result<ExitCode, BindError> {
    match command {
        Command::Resolve { template, context, deep } => {
            let ctx = parse_json("context", &context)?;
            if deep {
                let doc = parse_json("template", &template)?;
                let out = resolve_value(&doc, &ctx);
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", resolve(&template, &ctx));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { schema, data, first_error, no_formats, draft, json } => {
            let schema = parse_json("schema", &schema)?;
            let data = parse_json("data", &data)?;
            let opts = ValidatorOptions {
                all_errors: !first_error,
                validate_formats: !no_formats,
                draft: draft.map(Draft::from),
            };
            tracing::debug!(?opts, "validating");
            let result = validate_with(&schema, &data, &opts);
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else if result.is_valid() {
                println!("valid");
            } else {
                println!("{}", format_errors(result.errors()));
            }
            Ok(if result.is_valid() { ExitCode::SUCCESS } else { ExitCode::from(2) })
        }
        Command::Placeholders { template } => {
            for path in placeholders(&template) {
                println!("{path}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match args.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(args.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(1)
        }
    }
}
