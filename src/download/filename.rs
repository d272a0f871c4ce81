//! File naming for downloaded books.

use std::path::{Path, PathBuf};

use crate::models::BookEntry;
use crate::ranking::normalize_format;

/// Characters that would split a name into several path segments
const PATH_SEPARATORS: [char; 2] = ['/', '\\'];

/// Build the human-readable base name `"<author> - <title>[ (<year>)]"`
///
/// Path separators are removed so the result is always a single path segment.
pub fn build_base_name(book: &BookEntry) -> String {
    let mut name = format!("{} - {}", book.author.trim(), book.title.trim());
    if let Some(year) = book.year() {
        name.push_str(&format!(" ({})", year));
    }
    name.retain(|c| !PATH_SEPARATORS.contains(&c));
    name
}

/// Join a base name and a lowercased extension
pub fn build_file_name(base: &str, extension: &str) -> String {
    let extension = normalize_format(extension);
    if extension.is_empty() {
        base.to_string()
    } else {
        format!("{}.{}", base, extension)
    }
}

/// Find the first unused path among `name.ext`, `name-2.ext`, `name-3.ext`, …
///
/// Any directory entry counts as taken, including dangling symlinks. Two
/// concurrent writers may still pick the same name.
pub fn resolve_unique_path(dir: &Path, base: &str, extension: &str) -> PathBuf {
    let first = dir.join(build_file_name(base, extension));
    if !is_taken(&first) {
        return first;
    }

    let mut counter: u32 = 2;
    loop {
        let candidate = dir.join(build_file_name(&format!("{}-{}", base, counter), extension));
        if !is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Any entry counts, even a symlink whose target is gone.
fn is_taken(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookEntryBuilder;
    use tempfile::tempdir;

    #[test]
    fn test_base_name_with_year() {
        let book = BookEntryBuilder::new("Dune", "Frank Herbert", "epub", "https://example.com")
            .year("1965")
            .build();
        assert_eq!(build_base_name(&book), "Frank Herbert - Dune (1965)");
    }

    #[test]
    fn test_base_name_without_year() {
        let book = BookEntryBuilder::new("Book", "Doe, J", "pdf", "https://example.com").build();
        assert_eq!(build_base_name(&book), "Doe, J - Book");
    }

    #[test]
    fn test_base_name_strips_separators() {
        let book = BookEntryBuilder::new("C", "A/B", "pdf", "https://example.com").build();
        assert_eq!(build_base_name(&book), "AB - C");

        let book = BookEntryBuilder::new("x\\y/z", "Anon", "pdf", "https://example.com")
            .year("19/84")
            .build();
        assert_eq!(build_base_name(&book), "Anon - xyz (1984)");
    }

    #[test]
    fn test_file_name_lowercases_extension() {
        assert_eq!(build_file_name("Doe, J - Book", "PDF"), "Doe, J - Book.pdf");
        assert_eq!(build_file_name("Doe, J - Book", ".Epub"), "Doe, J - Book.epub");
        assert_eq!(build_file_name("Doe, J - Book", "."), "Doe, J - Book");
    }

    #[test]
    fn test_resolve_unique_path_free_name() {
        let dir = tempdir().unwrap();
        let path = resolve_unique_path(dir.path(), "Doe, J - Book", "pdf");
        assert_eq!(path, dir.path().join("Doe, J - Book.pdf"));
    }

    #[test]
    fn test_resolve_unique_path_collisions() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("Doe, J - Book.pdf"), b"one").unwrap();

        let second = resolve_unique_path(dir.path(), "Doe, J - Book", "pdf");
        assert_eq!(second, dir.path().join("Doe, J - Book-2.pdf"));
        std::fs::write(&second, b"two").unwrap();

        let third = resolve_unique_path(dir.path(), "Doe, J - Book", "pdf");
        assert_eq!(third, dir.path().join("Doe, J - Book-3.pdf"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_unique_path_skips_dangling_symlink() {
        let dir = tempdir().unwrap();
        let link = dir.path().join("Doe, J - Book.pdf");
        std::os::unix::fs::symlink(dir.path().join("missing-target"), &link).unwrap();
        assert!(!link.exists());

        let path = resolve_unique_path(dir.path(), "Doe, J - Book", "pdf");
        assert_eq!(path, dir.path().join("Doe, J - Book-2.pdf"));
    }

    #[test]
    fn test_resolve_unique_path_other_extension_is_free() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("Doe, J - Book.pdf"), b"one").unwrap();

        let path = resolve_unique_path(dir.path(), "Doe, J - Book", "epub");
        assert_eq!(path, dir.path().join("Doe, J - Book.epub"));
    }
}
