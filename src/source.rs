use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

/// Where subtitle text comes from. A failed fetch must not be half-applied
/// by the caller.
pub trait SubtitleSource {
    fn fetch_text(&self, name: &str) -> Result<String>;
}

/// Resolves names relative to a base directory; absolute names are used as-is.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl SubtitleSource for DirSource {
    fn fetch_text(&self, name: &str) -> Result<String> {
        let path = self.resolve(name);
        let bytes =
            fs::read(&path).with_context(|| format!("failed reading {}", path.display()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_relative_to_root_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.srt"), "x").unwrap();
        let source = DirSource::new(dir.path());
        assert_eq!(source.fetch_text("a.srt").unwrap(), "x");

        let err = source.fetch_text("missing.srt").unwrap_err();
        assert!(err.to_string().contains("missing.srt"));
    }
}
