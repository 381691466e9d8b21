use std::path::PathBuf;

/// Execution context shared by every filter of one build.
///
/// Chained filters hold the same `Arc<Project>`; the compressor is started in
/// `base_dir` when one is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub base_dir: Option<PathBuf>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_dir: None,
        }
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }
}
