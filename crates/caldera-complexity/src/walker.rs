//! Repository walking and language detection.
//!
//! Discovers the working-tree file set the ranking is computed over,
//! respecting `.gitignore`, skipping binaries and oversized files.

use std::path::{Path, PathBuf};

use caldera_core::{CalderaError, FilesConfig};

/// Number of bytes to check for binary detection.
const BINARY_CHECK_SIZE: usize = 8192;

/// A source file discovered during repository walking.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use caldera_complexity::walker::{Language, SourceFile};
///
/// let file = SourceFile {
///     path: PathBuf::from("src/main.rs"),
///     language: Language::Rust,
///     content: "fn main() {}".to_string(),
/// };
/// assert_eq!(file.language, Language::Rust);
/// ```
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path relative to the repository root.
    pub path: PathBuf,
    /// Detected programming language.
    pub language: Language,
    /// Full file content.
    pub content: String,
}

impl SourceFile {
    /// The file's join key: its relative path with `/` separators.
    pub fn key(&self) -> String {
        let s = self.path.to_string_lossy();
        if std::path::MAIN_SEPARATOR == '/' {
            s.into_owned()
        } else {
            s.replace(std::path::MAIN_SEPARATOR, "/")
        }
    }
}

/// Programming language detected from file extension.
///
/// # Examples
///
/// ```
/// use caldera_complexity::walker::Language;
///
/// assert_eq!(Language::from_extension("rs"), Language::Rust);
/// assert_eq!(Language::from_extension("py"), Language::Python);
/// assert_eq!(Language::from_extension("kt"), Language::Kotlin);
/// assert_eq!(Language::from_extension("txt"), Language::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Rust,
    Python,
    TypeScript,
    JavaScript,
    Go,
    Java,
    C,
    Cpp,
    Ruby,
    Php,
    Kotlin,
    Swift,
    Unknown,
}

impl Language {
    /// Detect language from a file extension string (without the dot).
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "rs" => Language::Rust,
            "py" => Language::Python,
            "ts" | "tsx" => Language::TypeScript,
            "js" | "jsx" => Language::JavaScript,
            "go" => Language::Go,
            "java" => Language::Java,
            "c" | "h" => Language::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hxx" | "hh" => Language::Cpp,
            "rb" => Language::Ruby,
            "php" => Language::Php,
            "kt" | "kts" => Language::Kotlin,
            "swift" => Language::Swift,
            _ => Language::Unknown,
        }
    }

    /// Get the tree-sitter language grammar for this language.
    ///
    /// Returns `None` for `Language::Unknown`.
    pub fn tree_sitter_language(&self) -> Option<tree_sitter::Language> {
        match self {
            Language::Rust => Some(tree_sitter_rust::LANGUAGE.into()),
            Language::Python => Some(tree_sitter_python::LANGUAGE.into()),
            Language::TypeScript => Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
            Language::JavaScript => Some(tree_sitter_javascript::LANGUAGE.into()),
            Language::Go => Some(tree_sitter_go::LANGUAGE.into()),
            Language::Java => Some(tree_sitter_java::LANGUAGE.into()),
            Language::C => Some(tree_sitter_c::LANGUAGE.into()),
            Language::Cpp => Some(tree_sitter_cpp::LANGUAGE.into()),
            Language::Ruby => Some(tree_sitter_ruby::LANGUAGE.into()),
            Language::Php => Some(tree_sitter_php::LANGUAGE_PHP.into()),
            Language::Kotlin => Some(tree_sitter_kotlin_ng::LANGUAGE.into()),
            Language::Swift => Some(tree_sitter_swift::LANGUAGE.into()),
            Language::Unknown => None,
        }
    }
}

/// Walk a repository, respecting `.gitignore`, returning analyzable source
/// files.
///
/// Skips binary files, files larger than `config.max_file_size`, and files
/// whose extension is unknown or outside `config.extensions` when that
/// allowlist is non-empty. Returned paths are relative to `root`.
///
/// # Errors
///
/// Returns [`CalderaError::PathNotFound`] if `root` does not exist.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use caldera_core::FilesConfig;
/// use caldera_complexity::walker::walk_repo;
///
/// let files = walk_repo(Path::new("."), &FilesConfig::default()).unwrap();
/// for f in &files {
///     println!("{}: {:?}", f.path.display(), f.language);
/// }
/// ```
pub fn walk_repo(root: &Path, config: &FilesConfig) -> Result<Vec<SourceFile>, CalderaError> {
    if !root.exists() {
        return Err(CalderaError::PathNotFound(root.to_path_buf()));
    }

    let walker = ignore::WalkBuilder::new(root).build();
    let mut files = Vec::new();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };

        let Some(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }

        let path = entry.path();

        let metadata = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(_) => continue,
        };
        if metadata.len() > config.max_file_size {
            continue;
        }

        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(e) => e,
            None => continue,
        };
        if !config.extensions.is_empty() && !config.extensions.iter().any(|e| e == ext) {
            continue;
        }
        let language = Language::from_extension(ext);
        if language == Language::Unknown {
            continue;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => continue,
        };

        // Binary check: null bytes in the first 8KB.
        let check_len = content.len().min(BINARY_CHECK_SIZE);
        if content.as_bytes()[..check_len].contains(&0) {
            continue;
        }

        let relative = match path.strip_prefix(root) {
            Ok(r) => r.to_path_buf(),
            Err(_) => path.to_path_buf(),
        };

        files.push(SourceFile {
            path: relative,
            language,
            content,
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_temp_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/main.rs"), "fn main() {}").unwrap();
        fs::write(root.join("src/lib.py"), "def hello(): pass").unwrap();
        fs::write(root.join("src/app.ts"), "function run() {}").unwrap();
        fs::write(root.join("src/util.js"), "const x = 1;").unwrap();
        fs::write(root.join("src/main.go"), "package main").unwrap();

        // Files the walker should skip
        fs::write(root.join("README.md"), "# Hello").unwrap();
        fs::write(root.join("data.csv"), "a,b,c").unwrap();

        dir
    }

    #[test]
    fn walk_finds_known_language_files() {
        let dir = make_temp_repo();
        let files = walk_repo(dir.path(), &FilesConfig::default()).unwrap();

        assert_eq!(files.len(), 5);

        let languages: Vec<Language> = files.iter().map(|f| f.language).collect();
        assert!(languages.contains(&Language::Rust));
        assert!(languages.contains(&Language::Python));
        assert!(languages.contains(&Language::TypeScript));
        assert!(languages.contains(&Language::JavaScript));
        assert!(languages.contains(&Language::Go));
    }

    #[test]
    fn walk_results_are_sorted() {
        let dir = make_temp_repo();
        let files = walk_repo(dir.path(), &FilesConfig::default()).unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
    }

    #[test]
    fn walk_respects_gitignore() {
        let dir = make_temp_repo();
        let root = dir.path();

        // The ignore crate needs a .git dir to recognize .gitignore files
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("build")).unwrap();
        fs::write(root.join("build/output.rs"), "fn ignored() {}").unwrap();
        fs::write(root.join(".gitignore"), "build/\n").unwrap();

        let files = walk_repo(root, &FilesConfig::default()).unwrap();
        for f in &files {
            assert!(
                !f.path.starts_with("build"),
                "gitignored file should be skipped: {}",
                f.path.display()
            );
        }
    }

    #[test]
    fn walk_skips_binary_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        let mut binary_content = b"fn main() { ".to_vec();
        binary_content.push(0);
        binary_content.extend_from_slice(b" }");
        fs::write(root.join("binary.rs"), &binary_content).unwrap();
        fs::write(root.join("normal.rs"), "fn normal() {}").unwrap();

        let files = walk_repo(root, &FilesConfig::default()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, PathBuf::from("normal.rs"));
    }

    #[test]
    fn walk_honors_size_limit_and_extension_allowlist() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        fs::write(root.join("huge.rs"), "x".repeat(200)).unwrap();
        fs::write(root.join("ok.py"), "def f(): pass").unwrap();
        fs::write(root.join("skipped.rs"), "fn s() {}").unwrap();

        let config = FilesConfig {
            max_file_size: 100,
            extensions: vec!["py".into(), "rs".into()],
        };
        let files = walk_repo(root, &config).unwrap();
        let paths: Vec<String> = files.iter().map(|f| f.key()).collect();
        assert!(!paths.contains(&"huge.rs".to_string()));
        assert!(paths.contains(&"ok.py".to_string()));

        let py_only = FilesConfig {
            max_file_size: 1_048_576,
            extensions: vec!["py".into()],
        };
        let files = walk_repo(root, &py_only).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].key(), "ok.py");
    }

    #[test]
    fn walk_missing_root_is_an_error() {
        let err = walk_repo(Path::new("/nonexistent/caldera/root"), &FilesConfig::default())
            .unwrap_err();
        assert!(matches!(err, CalderaError::PathNotFound(_)));
    }
}
