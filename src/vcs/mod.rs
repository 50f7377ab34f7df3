//! Version control collaborator
//!
//! The engine never inspects git objects. It needs exactly four blocking
//! capabilities from the remote/working copy, expressed by [`VersionControl`]:
//! - list the heads and tags of a remote
//! - clone (by ref, optionally shallow, or checkout-less)
//! - check out a revision
//! - report the hash of `HEAD`

mod checkout;
mod git;
mod remote;

pub use checkout::Checkout;
pub use git::GitCli;
pub use remote::{resolve_remote, RefListing};

use crate::error::DepchainResult;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Which revision of a project to build.
///
/// A project follows either a named reference or a pinned commit, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum VersionSelector {
    /// Branch or tag name, resolved through the remote
    Ref(String),
    /// Commit hash (full or abbreviated), compared by prefix
    Commit(String),
}

impl Default for VersionSelector {
    fn default() -> Self {
        Self::Ref("master".to_string())
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ref(name) => write!(f, "{}", name),
            Self::Commit(hash) => write!(f, "@{}", hash),
        }
    }
}

/// Abstract version control interface
///
/// Implemented by [`GitCli`] for real runs and by in-memory fakes in tests.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// List `refs/heads/*` and `refs/tags/*` of a remote without cloning
    async fn list_refs(&self, url: &str) -> DepchainResult<RefListing>;

    /// Clone `url` into `dest` with `reference` checked out
    async fn clone_ref(
        &self,
        url: &str,
        reference: &str,
        depth: Option<u32>,
        dest: &Path,
    ) -> DepchainResult<()>;

    /// Full clone of `url` into `dest` without checking out a working tree
    async fn clone_no_checkout(&self, url: &str, dest: &Path) -> DepchainResult<()>;

    /// Move the working copy at `dir` to `revision`
    async fn checkout(&self, dir: &Path, revision: &str) -> DepchainResult<()>;

    /// Hash of the revision currently checked out at `dir`
    async fn head(&self, dir: &Path) -> DepchainResult<String>;
}
