mod cli;

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, CompressArgs};
use tracing_subscriber::EnvFilter;
use yuic_filter::reader::read_all;
use yuic_filter::{
    BytesReader, ChainableReader, CommandLine, CompressorConfig, ContentType, IoReader, Project,
    Reader, YuiCompressorFilter, config,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = CompressorConfig::load();

    let outcome = match cli.command {
        Commands::Compress(args) => compress(cfg, args),
        Commands::Info => {
            print_info(&cfg);
            Ok(())
        }
        Commands::Init { global } => create_config(global),
    };

    if let Err(e) = outcome {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn compress(mut cfg: CompressorConfig, args: CompressArgs) -> Result<()> {
    if let Some(bin) = args.bin {
        cfg.bin = bin;
    }
    if !args.bin_args.is_empty() {
        cfg.bin_args = args.bin_args;
    }
    if let Some(charset) = args.charset {
        cfg.encoding = charset;
    }
    let explicit_type = args.content_type.map(ContentType::from);
    if let Some(content_type) = explicit_type {
        cfg.content_type = content_type;
    }
    cfg.line_break |= args.line_break;
    cfg.verbose |= args.verbose;
    cfg.nomunge |= args.nomunge;
    cfg.preserve_semi |= args.preserve_semi;
    cfg.disable_optimizations |= args.disable_optimizations;

    let base_dir = std::env::current_dir().context("could not determine current directory")?;
    let project = Project::new(project_name(&base_dir)).with_base_dir(base_dir);

    let mut prototype = YuiCompressorFilter::with_config(BytesReader::default(), cfg);
    prototype.set_parameters(args.params);
    prototype.set_project(Arc::new(project));
    tracing::debug!("command: {}", prototype.command_line()?);

    let inputs = if args.files.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        args.files
    };

    let mut output = Vec::new();
    for input in &inputs {
        let upstream: Box<dyn Reader> = if input.as_os_str() == "-" {
            Box::new(IoReader::new(io::stdin().lock()))
        } else {
            let file = File::open(input)
                .with_context(|| format!("could not open {}", input.display()))?;
            Box::new(IoReader::new(file))
        };

        let mut filter = prototype.chain(upstream);
        if explicit_type.is_none()
            && let Some(inferred) = ContentType::from_path(input)
        {
            filter.set_type(inferred);
        }

        let compressed =
            read_all(&mut filter).with_context(|| format!("compressing {}", input.display()))?;
        tracing::info!(
            "{}: {} bytes after compression",
            input.display(),
            compressed.len()
        );
        output.extend_from_slice(&compressed);
    }

    match args.output {
        Some(path) => std::fs::write(&path, &output)
            .with_context(|| format!("could not write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&output)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn project_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn print_info(cfg: &CompressorConfig) {
    println!("[yuic info]");
    println!("  version: {}", env!("CARGO_PKG_VERSION"));
    match which::which(&cfg.bin) {
        Ok(path) => println!("  bin: {} ({})", cfg.bin, path.display()),
        Err(_) => println!("  bin: {} (not found)", cfg.bin),
    }
    println!("  bin_args: {:?}", cfg.bin_args);
    println!("  encoding: {}", cfg.encoding);
    println!("  type: {}", cfg.content_type);
    println!("  flags: {:?}", cfg.enabled_flags());
    println!("  command: {}", CommandLine::build(cfg));
}

fn create_config(global: bool) -> Result<()> {
    let path = if global {
        let path = config::global_config_path().context("could not determine config directory")?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).context("could not create config dir")?;
        }
        path
    } else {
        PathBuf::from(config::PROJECT_CONFIG)
    };

    if path.exists() {
        println!("[yuic] config already exists: {}", path.display());
        return Ok(());
    }

    std::fs::write(&path, CompressorConfig::default_toml())
        .with_context(|| format!("could not write {}", path.display()))?;
    println!("[yuic] created {}", path.display());
    Ok(())
}
