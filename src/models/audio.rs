use std::path::PathBuf;

/// An input recording that passed the content-type check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioAsset {
    pub path: PathBuf,
    /// Inferred from the extension, always `audio/*`
    pub mime_type: &'static str,
}
