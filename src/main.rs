use anyhow::{Context, Result};
use clap::Parser;
use micromustache::{Options, Value};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Render a template file against a JSON scope file.
#[derive(Parser, Debug)]
#[command(name = "micromustache", version, about)]
struct Args {
    /// Path of the template file
    template: PathBuf,

    /// Path of a JSON file holding the scope
    scope: PathBuf,

    /// Opening tag
    #[arg(long, default_value = "{{")]
    open: String,

    /// Closing tag
    #[arg(long, default_value = "}}")]
    close: String,

    /// Fail when a path is missing from the scope
    #[arg(long)]
    validate_ref: bool,

    /// Print `null` and `undefined` instead of nothing
    #[arg(long)]
    explicit: bool,
}

fn run(args: &Args) -> Result<String> {
    let template = fs::read_to_string(&args.template)
        .with_context(|| format!("failed to read template {}", args.template.display()))?;
    let raw = fs::read_to_string(&args.scope)
        .with_context(|| format!("failed to read scope {}", args.scope.display()))?;
    let json: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("invalid JSON in {}", args.scope.display()))?;

    let options = Options::default()
        .tags(args.open.as_str(), args.close.as_str())
        .validate_ref(args.validate_ref)
        .explicit(args.explicit);
    log::debug!("rendering {} with {:?}", args.template.display(), options);

    let out = micromustache::render(&template, &Value::from(json), &options)?;
    Ok(out)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(out) => {
            print!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("micromustache: {e:#}");
            ExitCode::FAILURE
        }
    }
}
