//! Archive extraction

use crate::error::{DepchainError, DepchainResult};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use tar::Archive;
use tracing::info;

/// Archive formats understood by the fetcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    TarGz,
    Tar,
}

impl ArchiveKind {
    /// Detect the format from the URL path; anything unrecognised is
    /// treated as zip
    pub fn from_url(url: &str) -> Self {
        let path = url
            .split(['?', '#'])
            .next()
            .unwrap_or(url)
            .to_ascii_lowercase();

        if path.ends_with(".tar.gz") || path.ends_with(".tgz") {
            Self::TarGz
        } else if path.ends_with(".tar") {
            Self::Tar
        } else {
            Self::Zip
        }
    }

    /// File extension used for the downloaded temp file
    pub fn extension(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
            Self::Tar => "tar",
        }
    }

    /// Unpack `archive_path` into `dest`, creating `dest` if needed
    pub fn unpack(self, archive_path: &Path, dest: &Path) -> DepchainResult<()> {
        let failed = |reason: String| DepchainError::ArtifactUnpack {
            path: archive_path.to_path_buf(),
            reason,
        };

        fs::create_dir_all(dest)
            .map_err(|e| DepchainError::io(format!("creating {}", dest.display()), e))?;

        let file = File::open(archive_path)
            .map_err(|e| DepchainError::io(format!("opening {}", archive_path.display()), e))?;
        let reader = BufReader::new(file);

        match self {
            Self::Zip => {
                let mut archive =
                    zip::ZipArchive::new(reader).map_err(|e| failed(e.to_string()))?;
                archive.extract(dest).map_err(|e| failed(e.to_string()))?;
            }
            Self::TarGz => {
                let mut archive = Archive::new(GzDecoder::new(reader));
                archive.unpack(dest).map_err(|e| failed(e.to_string()))?;
            }
            Self::Tar => {
                let mut archive = Archive::new(reader);
                archive.unpack(dest).map_err(|e| failed(e.to_string()))?;
            }
        }

        info!("Unpacked to {}", dest.display());
        Ok(())
    }
}
