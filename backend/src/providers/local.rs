//! Local filesystem provider.
//!
//! Accepts `file://` locators and bare paths. Anything with another scheme is
//! refused as a bad request so the job fails instead of guessing.

use super::{FileProvider, ProcessedFile, ProviderError};
use log::{debug, error};
use md5::Context;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

const FILE_SCHEME: &str = "file://";
const READ_CHUNK: usize = 64 * 1024;

/// Fingerprints files on the local filesystem.
///
/// The content identifier is the lowercase hex MD5 digest of the file. With
/// `rename` set, the source is copied into its own directory as
/// `<content id><.ext>` and the copy's locator is returned in the same form
/// the source was given in.
#[derive(Debug, Default, Clone)]
pub struct LocalFileProvider;

impl LocalFileProvider {
    pub fn new() -> Self {
        Self
    }
}

impl FileProvider for LocalFileProvider {
    fn process_file(&self, src_url: &str, rename: bool) -> Result<ProcessedFile, ProviderError> {
        let locator = Locator::parse(src_url)?;
        let file_id = fingerprint(&locator.path)?;
        debug!("Computed content id {} for {}", file_id, src_url);

        let dst_url = if rename {
            let dst_path = renamed_path(&locator.path, &file_id);
            if same_file(&locator.path, &dst_path) {
                // Already named after its content; copying onto itself would truncate it.
                debug!("{} already carries its content id, not copying", src_url);
            } else {
                fs::copy(&locator.path, &dst_path).map_err(|e| {
                    error!("Could not copy {} to {}: {}", src_url, dst_path.display(), e);
                    ProviderError::Internal(format!("could not write renamed copy: {}", e))
                })?;
            }
            Some(locator.render(&dst_path))
        } else {
            None
        };

        Ok(ProcessedFile { file_id, dst_url })
    }
}

struct Locator {
    path: PathBuf,
    with_scheme: bool,
}

impl Locator {
    fn parse(src_url: &str) -> Result<Self, ProviderError> {
        let trimmed = src_url.trim();
        if trimmed.is_empty() {
            return Err(ProviderError::BadRequest("invalid source Url".to_string()));
        }
        if let Some(path) = trimmed.strip_prefix(FILE_SCHEME) {
            if path.is_empty() {
                return Err(ProviderError::BadRequest(format!(
                    "no path in source Url {}",
                    src_url
                )));
            }
            return Ok(Self {
                path: PathBuf::from(path),
                with_scheme: true,
            });
        }
        if trimmed.contains("://") {
            return Err(ProviderError::BadRequest(format!(
                "unsupported source Url {}",
                src_url
            )));
        }
        Ok(Self {
            path: PathBuf::from(trimmed),
            with_scheme: false,
        })
    }

    fn render(&self, path: &Path) -> String {
        if self.with_scheme {
            format!("{}{}", FILE_SCHEME, path.display())
        } else {
            path.display().to_string()
        }
    }
}

fn fingerprint(path: &Path) -> Result<String, ProviderError> {
    let file = File::open(path).map_err(|e| {
        error!("Source file {} not found or could not be read: {}", path.display(), e);
        ProviderError::NotFound("source file not found or could not be read".to_string())
    })?;

    let mut reader = BufReader::new(file);
    let mut hasher = Context::new();
    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        let read = reader.read(&mut chunk).map_err(|e| {
            error!("Could not read {}: {}", path.display(), e);
            ProviderError::Internal(format!("could not read source file: {}", e))
        })?;
        if read == 0 {
            break;
        }
        hasher.consume(&chunk[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

fn renamed_path(src: &Path, file_id: &str) -> PathBuf {
    let file_name = match src.extension() {
        Some(ext) => format!("{}.{}", file_id, ext.to_string_lossy()),
        None => file_id.to_string(),
    };
    src.with_file_name(file_name)
}

/// True when both paths resolve to the same file. A destination that does not
/// exist yet is never the source.
fn same_file(src: &Path, dst: &Path) -> bool {
    if src == dst {
        return true;
    }
    match (fs::canonicalize(src), fs::canonicalize(dst)) {
        (Ok(src), Ok(dst)) => src == dst,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_MD5: &str = "5eb63bbbe01eeed093cb22bb8f5acdc3";

    fn write_source(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"hello world").unwrap();
        path
    }

    #[test]
    fn fingerprints_bare_path() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_source(dir.path(), "f.bin");

        let out = LocalFileProvider::new()
            .process_file(src.to_str().unwrap(), false)
            .unwrap();

        assert_eq!(out.file_id, HELLO_MD5);
        assert_eq!(out.dst_url, None);
    }

    #[test]
    fn rename_copies_next_to_source() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_source(dir.path(), "f.bin");
        let url = format!("file://{}", src.display());

        let out = LocalFileProvider::new().process_file(&url, true).unwrap();

        let expected = dir.path().join(format!("{}.bin", HELLO_MD5));
        assert_eq!(out.dst_url, Some(format!("file://{}", expected.display())));
        assert_eq!(fs::read(&expected).unwrap(), b"hello world");
        assert!(src.exists());
    }

    #[test]
    fn rename_of_content_named_file_keeps_its_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_source(dir.path(), &format!("{}.bin", HELLO_MD5));

        let out = LocalFileProvider::new()
            .process_file(src.to_str().unwrap(), true)
            .unwrap();

        assert_eq!(out.file_id, HELLO_MD5);
        assert_eq!(out.dst_url, Some(src.display().to_string()));
        assert_eq!(fs::read(&src).unwrap(), b"hello world");
    }

    #[cfg(unix)]
    #[test]
    fn rename_through_link_to_content_named_file_keeps_its_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let stored = write_source(dir.path(), &format!("{}.bin", HELLO_MD5));
        let link = dir.path().join("latest.bin");
        std::os::unix::fs::symlink(&stored, &link).unwrap();

        let out = LocalFileProvider::new()
            .process_file(link.to_str().unwrap(), true)
            .unwrap();

        assert_eq!(out.dst_url, Some(stored.display().to_string()));
        assert_eq!(fs::read(&stored).unwrap(), b"hello world");
    }

    #[test]
    fn rename_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_source(dir.path(), "raw");

        let out = LocalFileProvider::new()
            .process_file(src.to_str().unwrap(), true)
            .unwrap();

        let expected = dir.path().join(HELLO_MD5);
        assert_eq!(out.dst_url, Some(expected.display().to_string()));
    }

    #[test]
    fn missing_source_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.bin");
        let err = LocalFileProvider::new()
            .process_file(missing.to_str().unwrap(), false)
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotFound(_)));
    }

    #[test]
    fn remote_and_blank_locators_are_rejected() {
        let provider = LocalFileProvider::new();
        assert!(matches!(
            provider.process_file("http://x/f.bin", false),
            Err(ProviderError::BadRequest(_))
        ));
        assert!(matches!(
            provider.process_file("  ", false),
            Err(ProviderError::BadRequest(_))
        ));
        assert!(matches!(
            provider.process_file("file://", false),
            Err(ProviderError::BadRequest(_))
        ));
    }
}
