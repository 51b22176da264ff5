use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::formats::{Entry, Singleton};
use crate::front_matter;
use crate::normalize::normalize_entry;

pub const DEFAULT_ENTRY_EXTENSION: &str = "md";

/// Reads collections and singletons below one content root.
///
/// Constructed once per build and dropped afterwards; nothing is cached.
#[derive(Debug, Clone)]
pub struct ContentReader {
    root: PathBuf,
    entry_extension: String,
}

impl ContentReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entry_extension: DEFAULT_ENTRY_EXTENSION.to_owned(),
        }
    }

    pub fn with_entry_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.entry_extension = extension.trim_start_matches('.').to_owned();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads every entry of `T`'s collection, ordered by file name.
    ///
    /// A missing collection directory yields an empty list.
    pub fn read_collection<T: Entry>(&self) -> anyhow::Result<Vec<T>> {
        let dir = self.root.join(T::COLLECTION);
        if !dir.is_dir() {
            tracing::warn!(
                collection = T::COLLECTION,
                dir = %dir.display(),
                "collection directory not found"
            );
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(&dir)
            .with_context(|| format!("read collection dir: {}", dir.display()))?
        {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type()?.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(self.entry_extension.as_str()) {
                continue;
            }
            paths.push(path);
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            entries.push(read_entry::<T>(&path)?);
        }

        tracing::debug!(collection = T::COLLECTION, count = entries.len(), "read collection");
        Ok(entries)
    }

    /// Reads `T` from `<root>/<name>.yaml` or `<root>/<name>/index.yaml`,
    /// whichever exists first.
    pub fn read_singleton<T: Singleton>(&self) -> anyhow::Result<Option<T>> {
        for path in self.singleton_candidates(T::NAME) {
            if !path.is_file() {
                continue;
            }

            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("read singleton: {}", path.display()))?;
            let mut header = singleton_header(&contents)
                .with_context(|| format!("parse singleton: {}", path.display()))?;
            header.retain(|_, value| !value.is_null());
            let record = serde_yaml::from_value(serde_yaml::Value::Mapping(header))
                .with_context(|| format!("deserialize singleton: {}", path.display()))?;

            tracing::debug!(singleton = T::NAME, path = %path.display(), "read singleton");
            return Ok(Some(record));
        }

        tracing::warn!(singleton = T::NAME, root = %self.root.display(), "singleton not found");
        Ok(None)
    }

    fn singleton_candidates(&self, name: &str) -> [PathBuf; 2] {
        [
            self.root.join(format!("{name}.yaml")),
            self.root.join(name).join("index.yaml"),
        ]
    }
}

fn read_entry<T: Entry>(path: &Path) -> anyhow::Result<T> {
    let slug = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow::anyhow!("entry file name is not valid UTF-8: {}", path.display()))?;

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read entry: {}", path.display()))?;
    let parsed = front_matter::parse(&contents)
        .with_context(|| format!("parse front matter: {}", path.display()))?;

    normalize_entry(parsed.header, &parsed.body, slug)
        .with_context(|| format!("normalize entry: {}", path.display()))
}

// Singletons are plain YAML documents; a file wrapped in `---` delimiters is
// read through its header instead.
fn singleton_header(contents: &str) -> anyhow::Result<serde_yaml::Mapping> {
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
    if contents.lines().next().map(str::trim_end) == Some("---") {
        return Ok(front_matter::parse(contents)?.header);
    }
    front_matter::parse_header(contents)
}
