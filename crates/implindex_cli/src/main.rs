//! `implindex` host binary.
//!
//! # Responsibility
//! - Load a rustdoc `implementors/` tree on a bounded pool of loader threads.
//! - Attach a merged-index consumer to the process-wide registry and print it.

mod pipeline;

use clap::Parser;
use implindex_core::{
    default_log_level, discover_scripts, init_logging, registry, LoggingConfig, MergePolicy,
    SharedIndex,
};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "implindex", version, about = "Assemble a rustdoc implementor index")]
struct Args {
    /// Directory holding `trait.*.js` implementor scripts.
    root: PathBuf,

    /// How descriptor lists for the same symbol are combined.
    #[arg(long, default_value_t = MergePolicy::Append)]
    merge: MergePolicy,

    /// Attach the consumer before loading instead of after.
    #[arg(long)]
    attach_first: bool,

    /// Print the merged index as JSON.
    #[arg(long)]
    json: bool,

    /// trace|debug|info|warn|error; defaults by build mode.
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; stderr when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(code) => code,
        Err(message) => {
            eprintln!("implindex: {message}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> Result<ExitCode, String> {
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    let logging = match &args.log_dir {
        Some(dir) => LoggingConfig::directory(level, dir.clone()),
        None => LoggingConfig::stderr(level),
    };
    init_logging(&logging)?;

    let index = SharedIndex::new(args.merge);
    if args.attach_first {
        registry::attach(index.clone()).map_err(|err| err.to_string())?;
    }

    let scripts = discover_scripts(&args.root).map_err(|err| err.to_string())?;
    info!(
        "event=scripts_discovered module=cli status=ok root={} count={}",
        args.root.display(),
        scripts.len()
    );
    let summary = pipeline::load_into(registry::global(), &args.root, &scripts);

    if !args.attach_first {
        let report = registry::attach(index.clone()).map_err(|err| err.to_string())?;
        info!(
            "event=index_attached module=cli status=ok flushed={}",
            report.flushed
        );
    }

    let snapshot = index.snapshot();
    if args.json {
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|err| format!("failed to serialize index: {err}"))?;
        println!("{json}");
    } else {
        print!("{}", pipeline::render_text(&snapshot));
    }

    if summary.failed > 0 {
        eprintln!(
            "implindex: {} of {} scripts failed to load",
            summary.failed,
            summary.failed + summary.submitted
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
