use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use barrelopt::{
    load_config, scan_barrels, BarrelLoader, FsHost, LoaderOptions, ResolutionRequest, ScanKind,
};
use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Command line front end for the barrel optimizer.
#[derive(Parser, Debug)]
#[command(
    name = "barrelopt",
    version,
    about = "Rewrites barrel re-export modules down to the names actually imported"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file; if omitted, auto-discovers barrelopt.{toml,yaml,yml,json}
    #[arg(long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log resolution steps to stderr
    #[arg(long = "diagnostics", action = ArgAction::SetTrue, global = true)]
    diagnostics: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a barrel request and print the rewritten module
    Resolve(ResolveCmd),
    /// Classify transformed files as barrels or plain modules
    Scan(ScanCmd),
    /// Print the encoded request for a target and name list
    Request(RequestCmd),
}

#[derive(Parser, Debug)]
struct ResolveCmd {
    /// Transformed source file, or an encoded barrel request
    #[arg(value_name = "INPUT")]
    input: String,

    /// Requested export name (repeatable, or comma separated)
    #[arg(long = "name", value_name = "NAME", action = ArgAction::Append, value_delimiter = ',')]
    names: Vec<String>,

    /// Treat the request as the output of wildcard propagation
    #[arg(long = "wildcard", action = ArgAction::SetTrue)]
    wildcard: bool,

    /// Follow wildcard re-exports and print a flattened module
    #[arg(long = "deep", action = ArgAction::SetTrue)]
    deep: bool,

    /// Directory transformed files are read from
    #[arg(long = "root", value_name = "DIR")]
    root: Option<PathBuf>,

    /// Extensions tried when resolving relative specifiers
    #[arg(long = "ext", value_name = "EXT", action = ArgAction::Append)]
    extensions: Vec<String>,

    /// Output file path (stdout if omitted)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ScanCmd {
    /// Glob patterns of transformed files
    #[arg(value_name = "PATTERN", required = true)]
    patterns: Vec<String>,
}

#[derive(Parser, Debug)]
struct RequestCmd {
    #[arg(value_name = "TARGET")]
    target: String,

    #[arg(long = "name", value_name = "NAME", action = ArgAction::Append, value_delimiter = ',')]
    names: Vec<String>,

    #[arg(long = "wildcard", action = ArgAction::SetTrue)]
    wildcard: bool,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(1)
        }
    }
}

fn init_tracing(diagnostics: bool) {
    let level = if diagnostics { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn real_main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.diagnostics);

    let loaded = load_config(cli.config.as_deref())?;
    let options = loaded.cfg.loader_options();

    match cli.command {
        Commands::Resolve(cmd) => {
            let root = cmd.root.clone().or_else(|| loaded.root_dir());
            let extensions = if !cmd.extensions.is_empty() {
                cmd.extensions.clone()
            } else {
                loaded.cfg.extensions.clone().unwrap_or_default()
            };
            run_resolve(cmd, FsHost::new(root, extensions), &options)
        }
        Commands::Scan(cmd) => run_scan(cmd, &options),
        Commands::Request(cmd) => {
            let req = ResolutionRequest::new(cmd.target, cmd.names, cmd.wildcard);
            println!("{}", req.encode(&options));
            Ok(())
        }
    }
}

fn run_resolve(cmd: ResolveCmd, host: FsHost, options: &LoaderOptions) -> Result<()> {
    // An encoded request carries its own names and mode; CLI flags extend it.
    let request = match ResolutionRequest::decode(&cmd.input, options)? {
        Some(mut req) => {
            req.names.extend(cmd.names.iter().cloned());
            req.wildcard |= cmd.wildcard;
            req
        }
        None => ResolutionRequest::new(cmd.input.clone(), cmd.names.clone(), cmd.wildcard),
    };

    let loader = BarrelLoader::new(&host, options);
    let text = if cmd.deep {
        let resolved = loader
            .resolve_deep(&request)
            .with_context(|| format!("failed to resolve {}", request.resource_path))?;
        for name in &resolved.unresolved {
            tracing::warn!(name = %name, "no explicit binding found");
        }
        resolved.render()
    } else {
        loader
            .load(&request)
            .with_context(|| format!("failed to resolve {}", request.resource_path))?
    };

    match &cmd.output {
        Some(out_path) => {
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(out_path, text)
                .with_context(|| format!("failed to write output to {}", out_path.display()))?;
        }
        None => println!("{}", text),
    }
    Ok(())
}

fn run_scan(cmd: ScanCmd, options: &LoaderOptions) -> Result<()> {
    let entries = scan_barrels(&cmd.patterns, options)?;
    for e in &entries {
        match e.kind {
            ScanKind::Barrel { exports, wildcards } => println!(
                "barrel  {}  exports={} wildcards={}",
                e.path.display(),
                exports,
                wildcards
            ),
            ScanKind::NotABarrel => println!("plain   {}", e.path.display()),
        }
    }
    Ok(())
}
