#![forbid(unsafe_code)]

//! File path suggestions: the entries of the directory being typed.

use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use suggest_core::text::{byte_offset, grapheme_count};
use suggest_overlay::{
    PackedRgba, QueryDescriptor, Style, StyleFlags, SuggestError, SuggestionElement,
    SuggestionRenderer, SuggestionSource, TextAnchor,
};

/// Entries beyond this are not offered.
pub const MAX_ENTRIES: usize = 200;

/// One directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathEntry {
    path: PathBuf,
    is_dir: bool,
}

impl PathEntry {
    pub fn new(path: impl Into<PathBuf>, is_dir: bool) -> Self {
        Self {
            path: path.into(),
            is_dir,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Final path component.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Text written into the field on commit. Folders keep a trailing
    /// separator so typing continues inside them.
    pub fn completion(&self) -> String {
        let mut text = self.path.display().to_string();
        if self.is_dir && !text.ends_with(MAIN_SEPARATOR) {
            text.push(MAIN_SEPARATOR);
        }
        text
    }

    /// "Folder" or "File".
    pub fn kind_label(&self) -> &'static str {
        if self.is_dir { "Folder" } else { "File" }
    }
}

impl fmt::Display for PathEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.completion())
    }
}

/// Lists the directory named by the path before the caret.
///
/// `"/usr/"` lists `/usr`; `"/usr/sh"` lists the entries of `/usr` starting
/// with `sh`. Relative paths resolve against `root`. Unreadable or missing
/// directories yield no suggestions.
#[derive(Debug, Clone)]
pub struct PathSource {
    root: PathBuf,
    limit: usize,
}

impl PathSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            limit: MAX_ENTRIES,
        }
    }

    /// Cap the number of suggestions (builder).
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    fn split<'a>(&self, typed: &'a str) -> (PathBuf, &'a str) {
        let resolve = |p: &str| {
            let path = Path::new(p);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                self.root.join(path)
            }
        };
        if typed.ends_with(MAIN_SEPARATOR) || typed.ends_with('/') {
            return (resolve(typed), "");
        }
        match typed.rfind([MAIN_SEPARATOR, '/']) {
            Some(i) => (resolve(&typed[..=i]), &typed[i + 1..]),
            None => (self.root.clone(), typed),
        }
    }

    /// Entries of the directory `typed` points into.
    pub fn list(&self, typed: &str) -> Vec<PathEntry> {
        if typed.is_empty() {
            return Vec::new();
        }
        let (dir, prefix) = self.split(typed);
        let Ok(read) = fs::read_dir(&dir) else {
            tracing::debug!(dir = %dir.display(), "directory not readable");
            return Vec::new();
        };
        let show_hidden = prefix.starts_with('.');
        let mut entries: Vec<PathEntry> = read
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                if !name.starts_with(prefix) || (name.starts_with('.') && !show_hidden) {
                    return None;
                }
                let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
                Some(PathEntry::new(dir.join(&name), is_dir))
            })
            .collect();
        entries.sort_by(|a, b| match (a.is_dir, b.is_dir) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => a.path.cmp(&b.path),
        });
        entries.truncate(self.limit);
        entries
    }
}

/// Text of the line holding the caret, up to the caret.
fn current_line_before_caret(query: &QueryDescriptor) -> &str {
    let before = query.text_before_caret();
    before.rsplit('\n').next().unwrap_or(before)
}

impl SuggestionSource<PathEntry> for PathSource {
    fn suggestions(&mut self, query: &QueryDescriptor) -> Result<Vec<PathEntry>, SuggestError> {
        Ok(self.list(current_line_before_caret(query)))
    }
}

/// Folder rows are bold blue with a trailing separator.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathRenderer;

const FOLDER_FG: PackedRgba = PackedRgba::rgb(0x5f, 0x87, 0xff);

impl SuggestionRenderer<PathEntry> for PathRenderer {
    fn render(&mut self, entry: &PathEntry) -> Result<SuggestionElement, SuggestError> {
        let element = if entry.is_dir {
            SuggestionElement::new(format!("{}{MAIN_SEPARATOR}", entry.name()))
                .with_style(Style::new().fg(FOLDER_FG).attrs(StyleFlags::BOLD))
        } else {
            SuggestionElement::new(entry.name())
        };
        Ok(element)
    }
}

/// Replace the line holding `caret` with `replacement` and put the caret at
/// the end of the new line.
pub fn replace_caret_line(anchor: &mut dyn TextAnchor, replacement: &str) {
    let text = anchor.text().to_string();
    let byte = byte_offset(&text, anchor.caret()).unwrap_or(text.len());
    let start = text[..byte].rfind('\n').map_or(0, |i| i + 1);
    let end = text[byte..].find('\n').map_or(text.len(), |i| byte + i);
    let updated = format!("{}{}{}", &text[..start], replacement, &text[end..]);
    anchor.set_text(&updated);
    anchor.set_caret(grapheme_count(&text[..start]) + grapheme_count(replacement));
}

#[cfg(test)]
mod tests {
    use super::*;
    use suggest_overlay::TextField;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::create_dir(dir.path().join("scripts")).unwrap();
        fs::write(dir.path().join("setup.sh"), "").unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();
        fs::write(dir.path().join(".secret"), "").unwrap();
        fs::write(dir.path().join("src").join("main.rs"), "").unwrap();
        dir
    }

    fn names(entries: &[PathEntry]) -> Vec<String> {
        entries.iter().map(PathEntry::name).collect()
    }

    #[test]
    fn lists_directory_after_separator() {
        let dir = fixture();
        let source = PathSource::new(dir.path());
        let typed = format!("{}{MAIN_SEPARATOR}", dir.path().display());
        let entries = source.list(&typed);
        assert_eq!(names(&entries), ["scripts", "src", "README.md", "setup.sh"]);
        assert!(entries[0].is_dir());
    }

    #[test]
    fn filters_by_prefix() {
        let dir = fixture();
        let source = PathSource::new(dir.path());
        assert_eq!(names(&source.list("s")), ["scripts", "src", "setup.sh"]);
        assert_eq!(names(&source.list("src/")), ["main.rs"]);
        assert_eq!(names(&source.list("src/ma")), ["main.rs"]);
        assert!(source.list("nothing").is_empty());
    }

    #[test]
    fn hidden_only_on_dot_prefix() {
        let dir = fixture();
        let source = PathSource::new(dir.path());
        assert!(!names(&source.list("s")).contains(&".secret".to_string()));
        assert_eq!(names(&source.list(".s")), [".secret"]);
    }

    #[test]
    fn missing_directory_and_empty_text_yield_nothing() {
        let dir = fixture();
        let source = PathSource::new(dir.path());
        assert!(source.list("").is_empty());
        assert!(source.list("missing/dir/").is_empty());
    }

    #[test]
    fn limit_truncates() {
        let dir = fixture();
        let source = PathSource::new(dir.path()).with_limit(2);
        assert_eq!(source.list("s").len(), 2);
    }

    #[test]
    fn source_uses_caret_line() {
        let dir = fixture();
        let mut source = PathSource::new(dir.path());
        let query = QueryDescriptor::at_caret("README.md\nsr", 12).unwrap();
        let entries = source.suggestions(&query).unwrap();
        assert_eq!(names(&entries), ["src"]);
    }

    #[test]
    fn completion_and_label() {
        let folder = PathEntry::new("/tmp/x", true);
        assert_eq!(folder.completion(), format!("/tmp/x{MAIN_SEPARATOR}"));
        assert_eq!(folder.kind_label(), "Folder");
        assert_eq!(PathEntry::new("/tmp/y.txt", false).kind_label(), "File");
    }

    #[test]
    fn renderer_marks_folders() {
        let mut renderer = PathRenderer;
        let folder = renderer.render(&PathEntry::new("/tmp/docs", true)).unwrap();
        assert_eq!(folder.lines()[0], format!("docs{MAIN_SEPARATOR}"));
        assert!(
            folder
                .effective_style()
                .attrs
                .is_some_and(|a| a.contains(StyleFlags::BOLD))
        );
        let file = renderer.render(&PathEntry::new("/tmp/a.txt", false)).unwrap();
        assert_eq!(file.lines()[0], "a.txt");
    }

    #[test]
    fn replace_caret_line_keeps_other_lines() {
        let mut field = TextField::new()
            .with_multiline(true)
            .with_value("first\n/us\nlast");
        field.set_caret(9);
        replace_caret_line(&mut field, "/usr/");
        assert_eq!(field.text(), "first\n/usr/\nlast");
        assert_eq!(field.caret(), 11);
    }
}
