//! Payment screenshot uploads
//!
//! A file is checked for extension, declared MIME type and size while it is
//! still in memory. Only an accepted file is written, under a generated name
//! inside the upload directory.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use chrono::Utc;
use rand::Rng;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::{
    fs,
    io::{AsyncWrite, AsyncWriteExt},
};
use tracing::{debug, warn};

/// Largest accepted screenshot: 2 MiB
pub const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

/// Body limit for the upload route, leaving room for the text fields
pub const UPLOAD_BODY_LIMIT: usize = 4 * MAX_UPLOAD_BYTES;

/// Public URL prefix the upload directory is served under
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Multipart field carrying the file
pub const FILE_FIELD: &str = "file";

const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];
const ALLOWED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Invalid file type")]
    InvalidType,

    #[error("File too large")]
    TooLarge,

    #[error("Screenshot missing")]
    Missing,

    #[error("Only one file may be uploaded")]
    MultipleFiles,

    #[error("Malformed upload: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MultipartError> for UploadError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::TooLarge
        } else {
            UploadError::Malformed(e.body_text())
        }
    }
}

/// An accepted file that has not been written yet
#[derive(Debug)]
pub struct PendingFile {
    extension: String,
    bytes: Vec<u8>,
}

/// A file written to the upload directory
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub path: PathBuf,
    /// Path clients fetch it from, e.g. `/uploads/1700000000000-42.png`
    pub public_path: String,
}

/// Text fields and the single file of an upload form
#[derive(Debug)]
pub struct UploadForm {
    pub fields: Value,
    pub file: PendingFile,
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Check the client file name and declared content type. Returns the
    /// lowercased extension.
    pub fn check_type(
        &self,
        file_name: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<String, UploadError> {
        let extension = file_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .ok_or(UploadError::InvalidType)?;

        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .filter(|ct| ALLOWED_MIME_TYPES.contains(&ct.as_str()))
            .ok_or(UploadError::InvalidType)?;

        debug!("Accepted upload type .{} ({})", extension, mime);
        Ok(extension)
    }

    pub fn check_size(&self, len: usize) -> Result<(), UploadError> {
        if len > self.max_bytes {
            return Err(UploadError::TooLarge);
        }
        Ok(())
    }

    /// Drain a multipart form, keeping text fields and validating the one
    /// file field as it streams in. Nothing touches the disk here.
    pub async fn read_form(&self, mut multipart: Multipart) -> Result<UploadForm, UploadError> {
        let mut fields = Map::new();
        let mut file: Option<PendingFile> = None;

        while let Some(mut field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if name != FILE_FIELD {
                let text = field.text().await?;
                fields.insert(name, Value::String(text));
                continue;
            }

            if file.is_some() {
                return Err(UploadError::MultipleFiles);
            }

            let extension = self.check_type(field.file_name(), field.content_type())?;
            let mut bytes = Vec::new();
            while let Some(chunk) = field.chunk().await? {
                self.check_size(bytes.len() + chunk.len())?;
                bytes.extend_from_slice(&chunk);
            }
            file = Some(PendingFile { extension, bytes });
        }

        let file = file.ok_or(UploadError::Missing)?;
        Ok(UploadForm {
            fields: Value::Object(fields),
            file,
        })
    }

    /// Write an accepted file under a fresh generated name
    pub async fn save(&self, file: &PendingFile) -> Result<StoredFile, UploadError> {
        fs::create_dir_all(&self.dir).await?;

        let name = generate_file_name(&file.extension);
        let path = self.dir.join(&name);
        let mut out = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        write_or_remove(&path, &mut out, &file.bytes).await?;

        debug!("Stored upload {} ({} bytes)", path.display(), file.bytes.len());
        Ok(StoredFile {
            path,
            public_path: format!("{}/{}", PUBLIC_PREFIX, name),
        })
    }

    /// Best-effort removal of a file whose order was never recorded
    pub async fn discard(&self, stored: &StoredFile) {
        if let Err(e) = fs::remove_file(&stored.path).await {
            warn!("Failed to remove orphaned upload {}: {}", stored.path.display(), e);
        }
    }
}

/// Write `bytes` to a freshly created file, removing it again if the write fails
async fn write_or_remove<W>(path: &Path, out: &mut W, bytes: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = match out.write_all(bytes).await {
        Ok(()) => out.flush().await,
        Err(e) => Err(e),
    };
    if let Err(e) = written {
        if let Err(remove) = fs::remove_file(path).await {
            warn!("Failed to remove partial upload {}: {}", path.display(), remove);
        }
        return Err(e);
    }
    Ok(())
}

fn generate_file_name(extension: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("{}-{}.{}", Utc::now().timestamp_millis(), suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("upload-test-{}-{}", tag, std::process::id()))
    }

    #[test]
    fn extension_and_mime_must_both_match() {
        let store = UploadStore::new("unused");
        assert_eq!(
            store.check_type(Some("Shot.PNG"), Some("image/png")).unwrap(),
            "png"
        );
        assert!(
            store
                .check_type(Some("shot.jpeg"), Some("image/jpeg; charset=binary"))
                .is_ok()
        );
        assert!(matches!(
            store.check_type(Some("shot.png"), Some("text/plain")),
            Err(UploadError::InvalidType)
        ));
        assert!(matches!(
            store.check_type(Some("shot.gif"), Some("image/png")),
            Err(UploadError::InvalidType)
        ));
        assert!(matches!(
            store.check_type(None, Some("image/png")),
            Err(UploadError::InvalidType)
        ));
    }

    #[test]
    fn size_limit_is_inclusive() {
        let store = UploadStore::new("unused");
        assert!(store.check_size(MAX_UPLOAD_BYTES).is_ok());
        assert!(matches!(
            store.check_size(MAX_UPLOAD_BYTES + 1),
            Err(UploadError::TooLarge)
        ));
    }

    #[test]
    fn generated_names_follow_pattern() {
        let name = generate_file_name("webp");
        let (stem, ext) = name.rsplit_once('.').unwrap();
        assert_eq!(ext, "webp");
        let (millis, random) = stem.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert!(random.parse::<u32>().unwrap() < 1_000_000_000);
    }

    #[tokio::test]
    async fn save_then_discard() {
        let dir = temp_dir("save");
        let store = UploadStore::new(&dir);
        let pending = PendingFile {
            extension: "png".to_string(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        };

        let stored = store.save(&pending).await.unwrap();
        assert!(stored.public_path.starts_with("/uploads/"));
        assert!(stored.public_path.ends_with(".png"));
        assert_eq!(fs::read(&stored.path).await.unwrap(), pending.bytes);

        store.discard(&stored).await;
        assert!(!stored.path.exists());

        let _ = fs::remove_dir_all(&dir).await;
    }

    struct FullDisk;

    impl AsyncWrite for FullDisk {
        fn poll_write(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            _buf: &[u8],
        ) -> std::task::Poll<std::io::Result<usize>> {
            std::task::Poll::Ready(Err(std::io::Error::other("no space left on device")))
        }

        fn poll_flush(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }

        fn poll_shutdown(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn failed_write_leaves_no_partial_file() {
        let dir = temp_dir("partial");
        fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("half-written.png");
        fs::write(&path, b"\x89PN").await.unwrap();

        let result = write_or_remove(&path, &mut FullDisk, b"\x89PNG body").await;
        assert!(result.is_err());
        assert!(!path.exists());

        let _ = fs::remove_dir_all(&dir).await;
    }
}
