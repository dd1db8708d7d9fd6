//! Local storage for uploaded meeting recordings.
//!
//! Files are written once under `<unix-millis>_<original name>` and never deleted
//! by the application; disk space reclamation is left to the operator.

use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use futures_util::{pin_mut, Stream, StreamExt};
use log::*;
use std::error::Error as StdError;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Name used when the client supplied no usable file name.
const FALLBACK_NAME: &str = "upload";

/// Suffixed names tried before giving up on a name collision.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// A recording persisted to local storage, ready to be handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub stored_path: PathBuf,
    /// File name as sent by the client.
    pub original_name: String,
    /// Timestamp-prefixed name the file was stored under.
    pub stored_name: String,
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the upload directory, including missing parents.
    pub async fn ensure_dir(&self) -> Result<(), Error> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Builds the on-disk name for an upload received at `timestamp_millis`.
    /// `attempt` disambiguates uploads of the same name within one millisecond.
    pub fn stored_name(original_name: &str, timestamp_millis: i64, attempt: u32) -> String {
        let name = sanitize_file_name(original_name);
        match attempt {
            0 => format!("{timestamp_millis}_{name}"),
            n => format!("{timestamp_millis}_{n}_{name}"),
        }
    }

    /// Streams `body` to a new file in the upload directory.
    ///
    /// An existing file is never overwritten. If the body stream or a disk write
    /// fails part way, the partial file is removed before the error is returned.
    pub async fn store<S, B, E>(&self, original_name: &str, body: S) -> Result<UploadedFile, Error>
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: StdError + Send + Sync + 'static,
    {
        let (stored_name, stored_path, file) = self
            .create_unique(original_name, chrono::Utc::now().timestamp_millis())
            .await?;

        let written = write_or_remove(&stored_path, file, body).await.map_err(|err| {
            warn!("Upload of {} aborted: {}", original_name, err);
            err
        })?;
        debug!("Stored {} bytes at {}", written, stored_path.display());

        Ok(UploadedFile {
            stored_path,
            original_name: original_name.to_string(),
            stored_name,
        })
    }

    async fn create_unique(
        &self,
        original_name: &str,
        timestamp_millis: i64,
    ) -> Result<(String, PathBuf, tokio::fs::File), Error> {
        let mut attempt = 0;
        loop {
            let stored_name = Self::stored_name(original_name, timestamp_millis, attempt);
            let stored_path = self.dir.join(&stored_name);

            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&stored_path)
                .await
            {
                Ok(file) => return Ok((stored_name, stored_path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists && attempt < MAX_NAME_ATTEMPTS => {
                    debug!("{} already exists, picking another name", stored_path.display());
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Writes `body` to `file` at `path`, deleting the file again if anything fails.
async fn write_or_remove<S, B, E>(path: &Path, file: tokio::fs::File, body: S) -> Result<u64, Error>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: StdError + Send + Sync + 'static,
{
    let result = write_body(file, body).await;
    if result.is_err() {
        if let Err(remove_err) = tokio::fs::remove_file(path).await {
            debug!("Failed to remove partial upload {}: {}", path.display(), remove_err);
        }
    }
    result
}

/// Copies every chunk of `body` into `file`, returning the number of bytes written.
async fn write_body<S, B, E>(mut file: tokio::fs::File, body: S) -> Result<u64, Error>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: StdError + Send + Sync + 'static,
{
    let mut written: u64 = 0;

    pin_mut!(body);
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Upload),
        })?;
        file.write_all(chunk.as_ref()).await?;
        written += chunk.as_ref().len() as u64;
    }
    file.flush().await?;

    Ok(written)
}

/// Reduces a client-supplied file name to its final path component so it cannot
/// escape the upload directory.
fn sanitize_file_name(original_name: &str) -> &str {
    original_name
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or(FALLBACK_NAME)
}
