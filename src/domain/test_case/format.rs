use std::path::Path;

/// On-disk layouts a test case definition can use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Yaml,
    Json,
    Toml,
    /// Plain text with optional `Category:` / `Difficulty:` header lines
    Freeform,
}

impl SourceFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            "txt" | "md" => Some(Self::Freeform),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(SourceFormat::from_path(Path::new("a/b.yaml")), Some(SourceFormat::Yaml));
        assert_eq!(SourceFormat::from_path(Path::new("b.YML")), Some(SourceFormat::Yaml));
        assert_eq!(SourceFormat::from_path(Path::new("b.json")), Some(SourceFormat::Json));
        assert_eq!(SourceFormat::from_path(Path::new("b.toml")), Some(SourceFormat::Toml));
        assert_eq!(SourceFormat::from_path(Path::new("b.txt")), Some(SourceFormat::Freeform));
        assert_eq!(SourceFormat::from_path(Path::new("b.md")), Some(SourceFormat::Freeform));
        assert_eq!(SourceFormat::from_path(Path::new("b.png")), None);
        assert_eq!(SourceFormat::from_path(Path::new("README")), None);
    }
}
