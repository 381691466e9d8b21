//! Host-supplied name/value parameters.
//!
//! A build file configures the filter through a generic parameter list
//! (`<param name="preserve-semi" value="true"/>`). Names are looked up in a
//! fixed table of [`Setting`]s; the whole list is validated before any of it
//! is applied.

use std::str::FromStr;

use crate::config::{CompressorConfig, ContentType};
use crate::error::{FilterError, Result};

/// One `name=value` pair as handed over by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl FromStr for Parameter {
    type Err = FilterError;

    /// Parse `name=value`; a bare `name` means `name=true`.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                Ok(Self::new(name.trim(), value.trim()))
            }
            Some(_) => Err(FilterError::config(format!("parameter \"{s}\" has no name"))),
            None if !s.trim().is_empty() => Ok(Self::new(s.trim(), "true")),
            None => Err(FilterError::config("empty parameter")),
        }
    }
}

/// A configuration field reachable from the parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    Bin,
    BinArgs,
    Encoding,
    Type,
    LineBreak,
    Verbose,
    Nomunge,
    PreserveSemi,
    DisableOptimizations,
}

const SETTINGS: &[(&str, Setting)] = &[
    ("bin", Setting::Bin),
    ("bin-args", Setting::BinArgs),
    ("encoding", Setting::Encoding),
    ("charset", Setting::Encoding),
    ("type", Setting::Type),
    ("line-break", Setting::LineBreak),
    ("verbose", Setting::Verbose),
    ("nomunge", Setting::Nomunge),
    ("preserve-semi", Setting::PreserveSemi),
    ("disable-optimizations", Setting::DisableOptimizations),
];

impl Setting {
    /// Look up a kebab-case parameter name, ignoring case.
    pub fn lookup(name: &str) -> Option<Self> {
        let name = name.trim();
        SETTINGS
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, setting)| *setting)
    }

    /// Parse `value` for this setting without touching any config.
    pub fn parse(self, value: &str) -> Result<Assignment> {
        Ok(match self {
            Self::Bin => Assignment::Bin(value.trim().to_string()),
            Self::BinArgs => {
                Assignment::BinArgs(value.split_whitespace().map(str::to_string).collect())
            }
            Self::Encoding => Assignment::Encoding(value.trim().to_string()),
            Self::Type => Assignment::Type(value.parse::<ContentType>()?),
            Self::LineBreak => Assignment::LineBreak(parse_bool(value)?),
            Self::Verbose => Assignment::Verbose(parse_bool(value)?),
            Self::Nomunge => Assignment::Nomunge(parse_bool(value)?),
            Self::PreserveSemi => Assignment::PreserveSemi(parse_bool(value)?),
            Self::DisableOptimizations => Assignment::DisableOptimizations(parse_bool(value)?),
        })
    }
}

/// A parsed parameter value, ready to be written into a config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    Bin(String),
    BinArgs(Vec<String>),
    Encoding(String),
    Type(ContentType),
    LineBreak(bool),
    Verbose(bool),
    Nomunge(bool),
    PreserveSemi(bool),
    DisableOptimizations(bool),
}

impl Assignment {
    pub fn assign(self, config: &mut CompressorConfig) {
        match self {
            Self::Bin(bin) => config.bin = bin,
            Self::BinArgs(args) => config.bin_args = args,
            Self::Encoding(encoding) => config.encoding = encoding,
            Self::Type(content_type) => config.content_type = content_type,
            Self::LineBreak(on) => config.line_break = on,
            Self::Verbose(on) => config.verbose = on,
            Self::Nomunge(on) => config.nomunge = on,
            Self::PreserveSemi(on) => config.preserve_semi = on,
            Self::DisableOptimizations(on) => config.disable_optimizations = on,
        }
    }
}

/// Build-file booleans: `true`/`yes`/`on`/`1` and `false`/`no`/`off`/`0`/empty.
pub fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" | "" => Ok(false),
        other => Err(FilterError::config(format!(
            "\"{other}\" is not a boolean value"
        ))),
    }
}

/// Resolve every name and parse every value, then apply them in order.
///
/// Nothing is written to `config` unless the whole list is valid.
pub fn apply_all(config: &mut CompressorConfig, params: &[Parameter]) -> Result<()> {
    let resolved = params
        .iter()
        .map(|param| {
            let setting = Setting::lookup(&param.name).ok_or_else(|| {
                FilterError::config(format!(
                    "Unknown parameter \"{}\" for YuiCompressorFilter",
                    param.name
                ))
            })?;
            setting.parse(&param.value).map_err(|e| match e {
                FilterError::Configuration(msg) => {
                    FilterError::config(format!("parameter \"{}\": {msg}", param.name))
                }
                other => other,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    for (param, assignment) in params.iter().zip(resolved) {
        tracing::trace!("param {} = {:?}", param.name, param.value);
        assignment.assign(config);
    }
    Ok(())
}
