//! File utilities for reading sources and discovering files to analyze.
//!
//! Reads fall back to lossy UTF-8 and refuse binary content. Discovery walks
//! directories with gitignore support and filters by language extension,
//! exclude globs and file size.

use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use tracing::{debug, info, warn};

use crate::core::config::AnalysisConfig;
use crate::core::errors::{MentorError, Result};

const BINARY_EXTENSIONS: &[&str] = &[
    "zip", "tar", "gz", "bz2", "xz", "7z", "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp",
    "mp3", "mp4", "wav", "pdf", "exe", "dll", "so", "dylib", "bin", "wasm", "pyc", "class",
    "sqlite", "db", "woff", "woff2", "ttf",
];

const SAMPLE_BYTES: usize = 1024;

/// Safe file reading with UTF-8 validation and fallback handling
pub struct FileReader;

impl FileReader {
    /// Read a file to string, converting invalid UTF-8 lossily
    pub fn read_to_string(file_path: &Path) -> Result<String> {
        if Self::is_likely_binary(file_path)? {
            return Err(MentorError::validation(format!(
                "File appears to be binary: {}",
                file_path.display()
            )));
        }

        let bytes = fs::read(file_path).map_err(|e| {
            MentorError::io(format!("Failed to read {}", file_path.display()), e)
        })?;
        Ok(Self::decode(bytes, file_path))
    }

    /// Async variant of [`FileReader::read_to_string`] on the tokio runtime
    pub async fn read_to_string_async(file_path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(file_path).await.map_err(|e| {
            MentorError::io(format!("Failed to read {}", file_path.display()), e)
        })?;
        if Self::has_binary_extension(file_path) || Self::looks_binary(&bytes) {
            return Err(MentorError::validation(format!(
                "File appears to be binary: {}",
                file_path.display()
            )));
        }
        Ok(Self::decode(bytes, file_path))
    }

    fn decode(bytes: Vec<u8>, file_path: &Path) -> String {
        match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(err) => {
                warn!(
                    "File contained invalid UTF-8, converted with lossy encoding: {}",
                    file_path.display()
                );
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        }
    }

    /// Check extension first, then sample the leading bytes for NULs
    pub fn is_likely_binary(file_path: &Path) -> Result<bool> {
        if Self::has_binary_extension(file_path) {
            return Ok(true);
        }

        let mut file = fs::File::open(file_path).map_err(|e| {
            MentorError::io(format!("Failed to open {}", file_path.display()), e)
        })?;
        let mut buffer = Vec::with_capacity(SAMPLE_BYTES);
        file.by_ref()
            .take(SAMPLE_BYTES as u64)
            .read_to_end(&mut buffer)
            .map_err(|e| MentorError::io("Failed to read file sample", e))?;
        Ok(Self::looks_binary(&buffer))
    }

    fn has_binary_extension(file_path: &Path) -> bool {
        file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| BINARY_EXTENSIONS.iter().any(|b| ext.eq_ignore_ascii_case(b)))
    }

    /// More than 1% NUL bytes in the sample
    fn looks_binary(bytes: &[u8]) -> bool {
        let sample = &bytes[..bytes.len().min(SAMPLE_BYTES)];
        if sample.is_empty() {
            return false;
        }
        let nulls = sample.iter().filter(|&&b| b == 0).count();
        nulls * 100 > sample.len()
    }
}

/// Compiled discovery filters
#[derive(Debug)]
pub struct DiscoveryFilter {
    exclude: Option<GlobSet>,
    extensions: HashSet<String>,
    max_file_size_bytes: u64,
    respect_gitignore: bool,
    include_hidden: bool,
}

impl DiscoveryFilter {
    /// Build filters from the analysis settings
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        let mut excludes = config.exclude_patterns.clone();
        excludes.push("**/.git/**".to_string());
        let extensions = config
            .languages
            .iter()
            .flat_map(|language| language.extensions().iter())
            .map(|ext| ext.to_ascii_lowercase())
            .collect();

        Ok(Self {
            exclude: compile_globset(&excludes)?,
            extensions,
            max_file_size_bytes: config.max_file_size_kb.saturating_mul(1024),
            respect_gitignore: config.respect_gitignore,
            include_hidden: config.include_hidden,
        })
    }

    /// Whether `path` (found under `base`) should be analyzed
    pub fn keeps(&self, path: &Path, base: &Path) -> bool {
        let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        if !self.extensions.contains(&extension.to_ascii_lowercase()) {
            return false;
        }

        if self.max_file_size_bytes > 0 {
            if let Ok(metadata) = fs::metadata(path) {
                if metadata.len() > self.max_file_size_bytes {
                    debug!("Skipping {} (over size limit)", path.display());
                    return false;
                }
            }
        }

        let relative = path.strip_prefix(base).unwrap_or(path);
        match &self.exclude {
            Some(exclude) => !exclude.is_match(relative),
            None => true,
        }
    }
}

/// Discover analyzable source files under `roots`, sorted and deduplicated.
pub fn discover_files(roots: &[PathBuf], config: &AnalysisConfig) -> Result<Vec<PathBuf>> {
    let filter = DiscoveryFilter::from_config(config)?;
    let mut unique = HashSet::new();
    let mut collected = Vec::new();

    for root in roots {
        if root.is_file() {
            if filter.keeps(root, root.parent().unwrap_or(root)) {
                add_unique(&mut unique, &mut collected, root.clone());
            }
            continue;
        }
        if !root.exists() {
            return Err(MentorError::validation_field(
                format!("Path does not exist: {}", root.display()),
                "paths",
            ));
        }
        walk_directory(root, &filter, &mut unique, &mut collected);
    }

    collected.sort();
    info!("File discovery completed: {} files selected", collected.len());
    Ok(collected)
}

fn walk_directory(
    root: &Path,
    filter: &DiscoveryFilter,
    unique: &mut HashSet<PathBuf>,
    collected: &mut Vec<PathBuf>,
) {
    let walker = WalkBuilder::new(root)
        .standard_filters(filter.respect_gitignore)
        .git_ignore(filter.respect_gitignore)
        .git_exclude(filter.respect_gitignore)
        .require_git(false)
        .hidden(!filter.include_hidden)
        .build();

    for entry in walker {
        let dir_entry = match entry {
            Ok(dir_entry) => dir_entry,
            Err(err) => {
                warn!("Failed to walk directory: {err}");
                continue;
            }
        };
        if !dir_entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = dir_entry.path();
        if filter.keeps(path, root) {
            add_unique(unique, collected, path.to_path_buf());
        }
    }
}

fn add_unique(unique: &mut HashSet<PathBuf>, collected: &mut Vec<PathBuf>, path: PathBuf) {
    if unique.insert(path.clone()) {
        collected.push(path);
    }
}

fn compile_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    let mut builder = GlobSetBuilder::new();
    let mut added = false;

    for pattern in patterns {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            continue;
        }
        let glob = GlobBuilder::new(pattern)
            .literal_separator(false)
            .build()
            .map_err(|err| MentorError::config(format!("Invalid glob pattern '{pattern}': {err}")))?;
        builder.add(glob);
        added = true;
    }

    if added {
        builder.build().map(Some).map_err(Into::into)
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::registry::Language;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn reads_invalid_utf8_lossily() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "latin.py", b"name = 'caf\xe9'\n");
        let content = FileReader::read_to_string(&path).unwrap();
        assert!(content.starts_with("name = 'caf"));
        assert!(content.contains('\u{FFFD}'));
    }

    #[test]
    fn rejects_binary_content() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "blob.py", &[0u8, 1, 0, 2, 0, 3, 0, 4]);
        assert!(FileReader::is_likely_binary(&path).unwrap());
        assert!(FileReader::read_to_string(&path).is_err());

        let image = write(dir.path(), "logo.png", b"not really a png");
        assert!(FileReader::is_likely_binary(&image).unwrap());
    }

    #[tokio::test]
    async fn async_read_matches_sync_read() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "a.py", b"x = 1\n");
        let sync = FileReader::read_to_string(&path).unwrap();
        let async_read = FileReader::read_to_string_async(&path).await.unwrap();
        assert_eq!(sync, async_read);
    }

    #[test]
    fn compile_globset_rejects_invalid_patterns() {
        assert!(compile_globset(&["[invalid".to_string()]).is_err());
        let valid = compile_globset(&["**/*.py".to_string()]).unwrap();
        assert!(valid.unwrap().is_match("pkg/mod.py"));
        assert!(compile_globset(&[]).unwrap().is_none());
    }

    #[test]
    fn discovery_filters_extension_excludes_and_size() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "app/main.py", b"print(1)\n");
        write(root, "app/util.js", b"let a = 1;\n");
        write(root, "app/notes.txt", b"hello\n");
        write(root, "node_modules/dep/index.js", b"let b = 2;\n");
        write(root, "big.py", &vec![b'#'; 4096]);

        let config = AnalysisConfig {
            max_file_size_kb: 2,
            ..AnalysisConfig::default()
        };
        let files = discover_files(&[root.to_path_buf()], &config).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["app/main.py", "app/util.js"]);
    }

    #[test]
    fn discovery_respects_language_selection() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "a.py", b"x = 1\n");
        write(root, "b.rs", b"fn main() {}\n");

        let config = AnalysisConfig {
            languages: vec![Language::Rust],
            ..AnalysisConfig::default()
        };
        let files = discover_files(&[root.to_path_buf()], &config).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("b.rs"));
    }

    #[test]
    fn explicit_files_are_kept_once() {
        let dir = TempDir::new().unwrap();
        let file = write(dir.path(), "one.py", b"x = 1\n");
        let files =
            discover_files(&[file.clone(), file.clone()], &AnalysisConfig::default()).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(discover_files(&[missing], &AnalysisConfig::default()).is_err());
    }
}
