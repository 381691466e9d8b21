//! Filter-chain link that pipes JavaScript or CSS through the YUI Compressor.
//!
//! The compression itself is done by an external `yui-compressor` binary;
//! this crate builds its command line from a [`CompressorConfig`], runs it
//! once per read and turns failures into [`FilterError`]s.

pub mod command;
pub mod config;
pub mod error;
pub mod filter;
pub mod params;
pub mod project;
pub mod reader;
pub mod runner;

pub use command::CommandLine;
pub use config::{CompressorConfig, ContentType};
pub use error::{FilterError, Result};
pub use filter::YuiCompressorFilter;
pub use params::Parameter;
pub use project::Project;
pub use reader::{BytesReader, ChainableReader, IoReader, Reader};
