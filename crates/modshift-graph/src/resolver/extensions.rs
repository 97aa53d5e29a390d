//! Extension and index-file fallbacks for local module paths.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::loader::SourceLoader;

/// File extensions tried, in order, when an import path has none.
pub const EXTENSIONS: &[&str] = &["js", "mjs"];

/// Try the path as written, then with each extension appended.
pub fn try_extensions(base_path: &Path, loader: &dyn SourceLoader) -> Option<PathBuf> {
    if loader.is_file(base_path) {
        return Some(base_path.to_path_buf());
    }

    EXTENSIONS
        .iter()
        .map(|ext| with_appended_extension(base_path, ext))
        .find(|candidate| loader.is_file(candidate))
}

/// Try `index.<ext>` inside the path.
pub fn try_index_files(dir_path: &Path, loader: &dyn SourceLoader) -> Option<PathBuf> {
    EXTENSIONS
        .iter()
        .map(|ext| dir_path.join(format!("index.{ext}")))
        .find(|candidate| loader.is_file(candidate))
}

/// Resolve a local file path with extension and index file fallbacks.
pub fn resolve_with_extensions(candidate: &Path, loader: &dyn SourceLoader) -> Option<PathBuf> {
    try_extensions(candidate, loader).or_else(|| try_index_files(candidate, loader))
}

// `Path::with_extension` would replace `.es6` in `even.es6`.
fn with_appended_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryLoader;

    fn loader() -> MemoryLoader {
        MemoryLoader::new()
            .with_file("/app/odd.js", "")
            .with_file("/app/even.es6.js", "")
            .with_file("/app/util/index.mjs", "")
            .with_file("/app/data.mjs", "")
    }

    #[test]
    fn test_exact_path_wins() {
        let loader = loader();
        assert_eq!(
            try_extensions(Path::new("/app/odd.js"), &loader),
            Some(PathBuf::from("/app/odd.js"))
        );
    }

    #[test]
    fn test_extensions_are_appended() {
        let loader = loader();
        assert_eq!(
            try_extensions(Path::new("/app/odd"), &loader),
            Some(PathBuf::from("/app/odd.js"))
        );
        assert_eq!(
            try_extensions(Path::new("/app/even.es6"), &loader),
            Some(PathBuf::from("/app/even.es6.js"))
        );
        assert_eq!(
            try_extensions(Path::new("/app/data"), &loader),
            Some(PathBuf::from("/app/data.mjs"))
        );
    }

    #[test]
    fn test_index_fallback() {
        let loader = loader();
        assert_eq!(
            resolve_with_extensions(Path::new("/app/util"), &loader),
            Some(PathBuf::from("/app/util/index.mjs"))
        );
        assert_eq!(resolve_with_extensions(Path::new("/app/missing"), &loader), None);
    }
}
