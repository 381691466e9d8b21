//! The compressing link of a filter chain.
//!
//! ```text
//! <filterchain>
//!   <filterreader classname="YuiCompressorFilter">
//!     <param name="type" value="js" />
//!     <param name="preserve-semi" value="true" />
//!   </filterreader>
//! </filterchain>
//! ```

use std::sync::Arc;

use crate::command::CommandLine;
use crate::config::{CompressorConfig, ContentType};
use crate::error::{FilterError, Result};
use crate::params::{self, Parameter};
use crate::project::Project;
use crate::reader::{ChainableReader, Reader};
use crate::runner;

/// Pipes everything read from `upstream` through the YUI Compressor.
#[derive(Debug, Clone)]
pub struct YuiCompressorFilter<R> {
    upstream: R,
    config: CompressorConfig,
    params: Vec<Parameter>,
    initialized: bool,
    project: Option<Arc<Project>>,
}

impl<R> YuiCompressorFilter<R> {
    pub fn new(upstream: R) -> Self {
        Self::with_config(upstream, CompressorConfig::default())
    }

    pub fn with_config(upstream: R, config: CompressorConfig) -> Self {
        Self {
            upstream,
            config,
            params: Vec::new(),
            initialized: false,
            project: None,
        }
    }

    pub fn config(&self) -> &CompressorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut CompressorConfig {
        &mut self.config
    }

    pub fn set_bin(&mut self, bin: impl Into<String>) {
        self.config.bin = bin.into();
    }

    pub fn set_encoding(&mut self, encoding: impl Into<String>) {
        self.config.encoding = encoding.into();
    }

    pub fn set_type(&mut self, content_type: ContentType) {
        self.config.content_type = content_type;
    }

    pub fn set_line_break(&mut self, on: bool) {
        self.config.line_break = on;
    }

    pub fn set_verbose(&mut self, on: bool) {
        self.config.verbose = on;
    }

    pub fn set_nomunge(&mut self, on: bool) {
        self.config.nomunge = on;
    }

    pub fn set_preserve_semi(&mut self, on: bool) {
        self.config.preserve_semi = on;
    }

    pub fn set_disable_optimizations(&mut self, on: bool) {
        self.config.disable_optimizations = on;
    }

    /// Host parameters, applied once on the first [`Reader::read`].
    pub fn set_parameters(&mut self, params: Vec<Parameter>) {
        self.params = params;
        self.initialized = false;
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    pub fn set_project(&mut self, project: Arc<Project>) {
        self.project = Some(project);
    }

    pub fn project(&self) -> Option<&Arc<Project>> {
        self.project.as_ref()
    }

    /// The command line the next read would run, with pending parameters
    /// already taken into account.
    pub fn command_line(&self) -> Result<CommandLine> {
        if self.initialized {
            return Ok(CommandLine::build(&self.config));
        }
        let mut config = self.config.clone();
        params::apply_all(&mut config, &self.params)?;
        Ok(CommandLine::build(&config))
    }

    fn initialize(&mut self) -> Result<()> {
        if !self.initialized {
            params::apply_all(&mut self.config, &self.params)?;
            self.initialized = true;
        }
        Ok(())
    }
}

impl<R: Reader> Reader for YuiCompressorFilter<R> {
    /// Read input and return it YUI-compressed, `None` at end of stream.
    fn read(&mut self, max_len: Option<usize>) -> Result<Option<Vec<u8>>> {
        self.initialize()?;

        let Some(buffer) = self.upstream.read(max_len)? else {
            return Ok(None);
        };

        let command = CommandLine::build(&self.config);
        let cwd = self.project.as_ref().and_then(|p| p.base_dir.as_deref());
        let result = runner::pipe(&command, &buffer, cwd)?;

        if !result.success() {
            return Err(FilterError::Compression {
                command: command.to_string(),
                status: result.status,
                stderr: result.stderr_lossy(),
            });
        }

        Ok(Some(result.stdout))
    }
}

impl<R: Reader> ChainableReader for YuiCompressorFilter<R> {
    type Chained<U: Reader> = YuiCompressorFilter<U>;

    /// Same configuration and project, filtering `upstream` instead.
    fn chain<U: Reader>(&self, upstream: U) -> Self::Chained<U> {
        YuiCompressorFilter {
            upstream,
            config: self.config.clone(),
            params: self.params.clone(),
            initialized: self.initialized,
            project: self.project.clone(),
        }
    }
}
