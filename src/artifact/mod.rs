//! Prebuilt artifact substitution
//!
//! A project may publish a prebuilt archive of its install tree. When the
//! run prefers artifacts, a stale project is installed by downloading and
//! unpacking that archive instead of configure + install.

mod http;
mod unpack;

pub use http::HttpArchiveFetcher;
pub use unpack::ArchiveKind;

use crate::error::DepchainResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where a project's prebuilt archive lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSpec {
    /// Archive URL; `.zip`, `.tar.gz`, `.tgz` or `.tar`
    pub url: String,

    /// Expected SHA-256 of the archive bytes (hex)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

/// Abstract archive transfer interface
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Download `spec.url` and unpack it into `dest`
    async fn fetch_and_unpack(&self, spec: &ArtifactSpec, dest: &Path) -> DepchainResult<()>;
}
