use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use yuic_filter::{ContentType, Parameter};

#[derive(Parser)]
#[command(
    name = "yuic",
    version,
    about = "Compress JavaScript and CSS through the YUI Compressor"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress files (or stdin) and write the result to stdout
    Compress(CompressArgs),

    /// Show the effective configuration and the resolved compressor binary
    Info,

    /// Generate a default .yuic.toml config file
    Init {
        /// Generate in ~/.config/yuic/ instead of current directory
        #[arg(long)]
        global: bool,
    },
}

#[derive(Args)]
pub struct CompressArgs {
    /// Input files, `-` or nothing for stdin
    pub files: Vec<PathBuf>,

    /// Write output here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Compressor binary
    #[arg(long, env = "YUIC_BIN")]
    pub bin: Option<String>,

    /// Argument placed before the compressor options (repeatable)
    #[arg(long = "bin-arg", allow_hyphen_values = true)]
    pub bin_args: Vec<String>,

    /// Input encoding
    #[arg(long, alias = "encoding")]
    pub charset: Option<String>,

    /// Content type; inferred from the file extension when omitted
    #[arg(long = "type", value_enum)]
    pub content_type: Option<TypeArg>,

    /// Insert a line break after the specified column number
    #[arg(long)]
    pub line_break: bool,

    /// Display informational messages and warnings
    #[arg(long)]
    pub verbose: bool,

    /// Minify only, do not obfuscate
    #[arg(long)]
    pub nomunge: bool,

    /// Preserve all semicolons
    #[arg(long)]
    pub preserve_semi: bool,

    /// Disable all micro optimizations
    #[arg(long)]
    pub disable_optimizations: bool,

    /// Generic filter parameter, `name=value` (repeatable)
    #[arg(short, long = "param", value_parser = parse_param)]
    pub params: Vec<Parameter>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TypeArg {
    Js,
    Css,
}

impl From<TypeArg> for ContentType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Js => ContentType::Js,
            TypeArg::Css => ContentType::Css,
        }
    }
}

fn parse_param(s: &str) -> Result<Parameter, String> {
    s.parse().map_err(|e: yuic_filter::FilterError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compress() {
        let cli = Cli::try_parse_from([
            "yuic",
            "compress",
            "a.js",
            "b.css",
            "--type",
            "css",
            "--nomunge",
            "--bin-arg",
            "-jar",
            "-p",
            "preserve-semi=true",
        ])
        .unwrap();
        let Commands::Compress(args) = cli.command else {
            panic!("expected compress");
        };
        assert_eq!(args.files.len(), 2);
        assert!(matches!(args.content_type, Some(TypeArg::Css)));
        assert!(args.nomunge);
        assert_eq!(args.bin_args, vec!["-jar"]);
        assert_eq!(args.params, vec![Parameter::new("preserve-semi", "true")]);
    }

    #[test]
    fn test_rejects_bad_param() {
        assert!(Cli::try_parse_from(["yuic", "compress", "--param", "=x"]).is_err());
    }
}
