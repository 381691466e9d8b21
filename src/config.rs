use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::FilterError;

/// Name of the compressor binary when nothing else is configured.
pub const DEFAULT_BIN: &str = "yui-compressor";
/// Encoding passed as `--charset` when nothing else is configured.
pub const DEFAULT_ENCODING: &str = "utf8";
/// Per-project config file, looked up in the current directory.
pub const PROJECT_CONFIG: &str = ".yuic.toml";

/// Syntax of the input stream, selects the compressor mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    #[serde(alias = "javascript")]
    Js,
    Css,
}

impl ContentType {
    /// Guess the content type from a file extension; `None` when it says nothing.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("css") {
            Some(Self::Css)
        } else if ext.eq_ignore_ascii_case("js") || ext.eq_ignore_ascii_case("mjs") {
            Some(Self::Js)
        } else {
            None
        }
    }
}

impl FromStr for ContentType {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "js" | "javascript" => Ok(Self::Js),
            "css" => Ok(Self::Css),
            other => Err(FilterError::config(format!(
                "unknown type \"{other}\", expected js or css"
            ))),
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Js => write!(f, "js"),
            Self::Css => write!(f, "css"),
        }
    }
}

/// Everything the filter needs to build a compressor command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressorConfig {
    /// Compressor program, resolved through `PATH` when not a path.
    pub bin: String,
    /// Arguments placed before the compressor options (`-jar yuicompressor.jar`).
    pub bin_args: Vec<String>,
    /// Encoding of the input stream.
    pub encoding: String,
    pub content_type: ContentType,
    /// Insert a line break after the specified column number.
    pub line_break: bool,
    /// Display informational messages and warnings.
    pub verbose: bool,
    /// Minify only, do not obfuscate.
    pub nomunge: bool,
    /// Preserve all semicolons.
    pub preserve_semi: bool,
    /// Disable all micro optimizations.
    pub disable_optimizations: bool,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            bin: DEFAULT_BIN.into(),
            bin_args: Vec::new(),
            encoding: DEFAULT_ENCODING.into(),
            content_type: ContentType::Js,
            line_break: false,
            verbose: false,
            nomunge: false,
            preserve_semi: false,
            disable_optimizations: false,
        }
    }
}

impl CompressorConfig {
    /// Load config with priority: .yuic.toml (project) > ~/.config/yuic/config.toml (global) > defaults.
    pub fn load() -> Self {
        Self::load_from(global_config_path().as_deref(), Path::new(PROJECT_CONFIG))
    }

    pub fn load_from(global: Option<&Path>, project: &Path) -> Self {
        let mut config = Self::default();

        if let Some(path) = global
            && let Some(partial) = load_file(path)
        {
            config = merge(config, partial);
        }

        if let Some(partial) = load_file(project) {
            config = merge(config, partial);
        }

        config
    }

    /// The enabled boolean flags, in declaration order, as their option names.
    pub fn enabled_flags(&self) -> Vec<&'static str> {
        [
            ("line_break", self.line_break),
            ("verbose", self.verbose),
            ("nomunge", self.nomunge),
            ("preserve_semi", self.preserve_semi),
            ("disable_optimizations", self.disable_optimizations),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect()
    }

    /// Generate a default config file content.
    pub fn default_toml() -> &'static str {
        r#"# yuic configuration
# Place in ~/.config/yuic/config.toml (global) or .yuic.toml (per-project)

# Compressor binary, looked up in PATH unless it is a path
bin = "yui-compressor"
# Extra arguments placed before the compressor options, e.g. ["-jar", "yuicompressor.jar"]
bin_args = []

# Input encoding and content type (js or css)
encoding = "utf8"
type = "js"

# Compressor switches
line_break = false
verbose = false
nomunge = false
preserve_semi = false
disable_optimizations = false
"#
    }
}

/// Partial config for TOML deserialization (all fields optional).
#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    bin: Option<String>,
    bin_args: Option<Vec<String>>,
    #[serde(alias = "charset")]
    encoding: Option<String>,
    #[serde(rename = "type")]
    content_type: Option<ContentType>,
    line_break: Option<bool>,
    verbose: Option<bool>,
    nomunge: Option<bool>,
    preserve_semi: Option<bool>,
    disable_optimizations: Option<bool>,
}

pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("yuic").join("config.toml"))
}

fn load_file(path: &Path) -> Option<PartialConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(partial) => {
            tracing::debug!("loaded config from {}", path.display());
            Some(partial)
        }
        Err(e) => {
            tracing::warn!("ignoring invalid config {}: {}", path.display(), e);
            None
        }
    }
}

fn merge(base: CompressorConfig, partial: PartialConfig) -> CompressorConfig {
    CompressorConfig {
        bin: partial.bin.unwrap_or(base.bin),
        bin_args: partial.bin_args.unwrap_or(base.bin_args),
        encoding: partial.encoding.unwrap_or(base.encoding),
        content_type: partial.content_type.unwrap_or(base.content_type),
        line_break: partial.line_break.unwrap_or(base.line_break),
        verbose: partial.verbose.unwrap_or(base.verbose),
        nomunge: partial.nomunge.unwrap_or(base.nomunge),
        preserve_semi: partial.preserve_semi.unwrap_or(base.preserve_semi),
        disable_optimizations: partial
            .disable_optimizations
            .unwrap_or(base.disable_optimizations),
    }
}
