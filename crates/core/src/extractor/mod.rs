//! Package extraction.
//!
//! Opens a downloaded zip archive and hands out the first entry whose name
//! matches the configured prefix and suffix, in archive order.

mod error;

pub use error::ExtractError;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use zip::ZipArchive;

/// An opened artifact archive.
pub struct PackageArchive {
    archive: ZipArchive<BufReader<File>>,
}

impl PackageArchive {
    /// Opens the archive at `path`.
    pub fn open(path: &Path) -> Result<Self, ExtractError> {
        let file = File::open(path).map_err(|e| ExtractError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;
        let archive = ZipArchive::new(BufReader::new(file)).map_err(|e| ExtractError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self { archive })
    }

    /// Entry names in archive order.
    pub fn entry_names(&mut self) -> Result<Vec<String>, ExtractError> {
        let mut names = Vec::with_capacity(self.archive.len());
        for index in 0..self.archive.len() {
            let entry = self.archive.by_index_raw(index).map_err(ExtractError::entry)?;
            names.push(entry.name().to_string());
        }
        Ok(names)
    }

    /// Locates the first entry named `prefix…suffix`.
    ///
    /// Returns the entry name and a reader over its uncompressed bytes. The
    /// reader is forward-only.
    pub fn payload(
        &mut self,
        prefix: &str,
        suffix: &str,
    ) -> Result<(String, impl Read + '_), ExtractError> {
        let mut found = None;
        for index in 0..self.archive.len() {
            let entry = self.archive.by_index_raw(index).map_err(ExtractError::entry)?;
            let name = entry.name();
            if name.starts_with(prefix) && name.ends_with(suffix) {
                found = Some((index, name.to_string()));
                break;
            }
        }

        let (index, name) = found.ok_or_else(|| ExtractError::PayloadNotFound {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })?;

        let reader = self.archive.by_index(index).map_err(ExtractError::entry)?;
        Ok((name, reader))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_zip(entries: &[(&str, &[u8])]) -> NamedTempFile {
        let temp = NamedTempFile::new().unwrap();
        let mut writer = ZipWriter::new(temp.reopen().unwrap());
        for (name, content) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap();
        temp
    }

    fn read_payload(archive: &mut PackageArchive, prefix: &str, suffix: &str) -> (String, Vec<u8>) {
        let (name, mut reader) = archive.payload(prefix, suffix).unwrap();
        let mut content = Vec::new();
        reader.read_to_end(&mut content).unwrap();
        (name, content)
    }

    #[test]
    fn test_payload_exact_content() {
        let zip = build_zip(&[
            ("README.md", b"docs"),
            ("build/app-1.2.3.jar", b"\x50\x4b jar bytes"),
        ]);
        let mut archive = PackageArchive::open(zip.path()).unwrap();

        let (name, content) = read_payload(&mut archive, "build/", ".jar");
        assert_eq!(name, "build/app-1.2.3.jar");
        assert_eq!(content, b"\x50\x4b jar bytes");
    }

    #[test]
    fn test_payload_not_found_for_other_prefix() {
        let zip = build_zip(&[("build/app-1.2.3.jar", b"jar")]);
        let mut archive = PackageArchive::open(zip.path()).unwrap();

        let err = archive.payload("other/", ".jar").err().unwrap();
        assert!(matches!(err, ExtractError::PayloadNotFound { .. }));
    }

    #[test]
    fn test_first_match_in_archive_order_wins() {
        let zip = build_zip(&[
            ("build/z-app.jar", b"first"),
            ("build/a-app.jar", b"second"),
        ]);
        let mut archive = PackageArchive::open(zip.path()).unwrap();

        let (name, content) = read_payload(&mut archive, "build/", ".jar");
        assert_eq!(name, "build/z-app.jar");
        assert_eq!(content, b"first");
    }

    #[test]
    fn test_prefix_and_suffix_both_required() {
        let zip = build_zip(&[
            ("build/app.war", b"war"),
            ("lib/app.jar", b"lib"),
            ("build/app.jar", b"payload"),
        ]);
        let mut archive = PackageArchive::open(zip.path()).unwrap();

        let (name, content) = read_payload(&mut archive, "build/", ".jar");
        assert_eq!(name, "build/app.jar");
        assert_eq!(content, b"payload");
    }

    #[test]
    fn test_entry_names_in_archive_order() {
        let zip = build_zip(&[("b.txt", b"b"), ("a.txt", b"a"), ("c.txt", b"c")]);
        let mut archive = PackageArchive::open(zip.path()).unwrap();
        assert_eq!(archive.entry_names().unwrap(), vec!["b.txt", "a.txt", "c.txt"]);
    }

    #[test]
    fn test_open_corrupt_archive() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"definitely not a zip").unwrap();

        let result = PackageArchive::open(temp.path());
        assert!(matches!(result, Err(ExtractError::Corrupt { .. })));
    }

    #[test]
    fn test_open_missing_archive() {
        let result = PackageArchive::open(Path::new("/nonexistent/archive.zip"));
        assert!(matches!(result, Err(ExtractError::Open { .. })));
    }
}
