//! HTTP download of prebuilt archives

use super::{ArchiveKind, ArtifactSource, ArtifactSpec};
use crate::error::{DepchainError, DepchainResult};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Downloads over HTTP(S) with `ureq` and unpacks with zip/tar
pub struct HttpArchiveFetcher {
    scratch_dir: PathBuf,
}

impl HttpArchiveFetcher {
    /// Download into the system temp directory
    pub fn new() -> Self {
        Self::with_scratch_dir(std::env::temp_dir())
    }

    /// Download into `scratch_dir`
    pub fn with_scratch_dir(scratch_dir: PathBuf) -> Self {
        Self { scratch_dir }
    }
}

impl Default for HttpArchiveFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactSource for HttpArchiveFetcher {
    async fn fetch_and_unpack(&self, spec: &ArtifactSpec, dest: &Path) -> DepchainResult<()> {
        let spec = spec.clone();
        let dest = dest.to_path_buf();
        let scratch_dir = self.scratch_dir.clone();

        tokio::task::spawn_blocking(move || fetch_blocking(&spec, &scratch_dir, &dest))
            .await
            .map_err(|e| DepchainError::Internal(format!("artifact download task: {}", e)))?
    }
}

/// Downloaded archive on disk, removed when dropped
struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    fn new(dir: &Path, extension: &str) -> Self {
        Self {
            path: dir.join(format!("{}.{}", Uuid::new_v4(), extension)),
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove {}: {}", self.path.display(), e);
            }
        }
    }
}

fn fetch_blocking(spec: &ArtifactSpec, scratch_dir: &Path, dest: &Path) -> DepchainResult<()> {
    let kind = ArchiveKind::from_url(&spec.url);
    let scratch = ScratchFile::new(scratch_dir, kind.extension());

    info!("Fetching {}", spec.url);
    let digest = download(&spec.url, &scratch.path)?;

    if let Some(expected) = &spec.sha256 {
        verify_digest(&spec.url, expected, &digest)?;
        debug!("Checksum verified: {}", digest);
    }

    kind.unpack(&scratch.path, dest)
}

/// Stream the response body to `path`, returning its SHA-256
fn download(url: &str, path: &Path) -> DepchainResult<String> {
    let fetch_failed = |reason: String| DepchainError::ArtifactFetch {
        url: url.to_string(),
        reason,
    };

    let mut response = ureq::get(url).call().map_err(|e| fetch_failed(e.to_string()))?;

    let file = File::create(path)
        .map_err(|e| DepchainError::io(format!("creating {}", path.display()), e))?;
    let mut writer = BufWriter::new(file);

    let mut reader = response.body_mut().as_reader();
    let digest = copy_hashing(&mut reader, &mut writer).map_err(|e| fetch_failed(e.to_string()))?;
    writer
        .flush()
        .map_err(|e| DepchainError::io(format!("writing {}", path.display()), e))?;

    Ok(digest)
}

fn verify_digest(url: &str, expected: &str, actual: &str) -> DepchainResult<()> {
    if expected.trim().eq_ignore_ascii_case(actual) {
        Ok(())
    } else {
        Err(DepchainError::ArtifactChecksum {
            url: url.to_string(),
            expected: expected.trim().to_string(),
            actual: actual.to_string(),
        })
    }
}

/// Copy `reader` into `writer`, hashing the bytes on the way
fn copy_hashing(reader: &mut impl Read, writer: &mut impl Write) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        writer.write_all(&buf[..n])?;
    }
    Ok(hex::encode(hasher.finalize()))
}
