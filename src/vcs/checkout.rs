//! Working copy of one project

use super::{VersionControl, VersionSelector};
use crate::error::{DepchainError, DepchainResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A project's local working copy at `<source_root>/<identity>`
pub struct Checkout<'a> {
    vcs: &'a dyn VersionControl,
    url: &'a str,
    selector: &'a VersionSelector,
    path: PathBuf,
}

impl<'a> Checkout<'a> {
    pub fn new(
        vcs: &'a dyn VersionControl,
        url: &'a str,
        selector: &'a VersionSelector,
        path: PathBuf,
    ) -> Self {
        Self {
            vcs,
            url,
            selector,
            path,
        }
    }

    /// Directory holding the working copy
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True iff version control metadata is present. Never touches the network.
    pub fn exists(&self) -> bool {
        self.path.join(".git").exists()
    }

    /// Materialize the working copy.
    ///
    /// Refs are cloned directly (shallow when `depth` is set). Pinned
    /// commits get a full checkout-less clone followed by an explicit
    /// checkout, since servers need not allow fetching a bare commit.
    pub async fn clone(&self, depth: Option<u32>) -> DepchainResult<()> {
        info!("Cloning {} ({}) into {}", self.url, self.selector, self.path.display());

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DepchainError::io(format!("creating source root {}", parent.display()), e)
            })?;
        }

        match self.selector {
            VersionSelector::Ref(reference) => {
                self.vcs
                    .clone_ref(self.url, reference, depth, &self.path)
                    .await
            }
            VersionSelector::Commit(commit) => {
                if depth.is_some() {
                    debug!("Ignoring clone depth for pinned commit {}", commit);
                }
                self.vcs.clone_no_checkout(self.url, &self.path).await?;
                self.checkout(commit).await
            }
        }
    }

    /// Hash of the checked-out revision
    pub async fn current_hash(&self) -> DepchainResult<String> {
        if !self.exists() {
            return Err(DepchainError::NotCloned(self.path.clone()));
        }
        let hash = self.vcs.head(&self.path).await?;
        Ok(hash.trim().to_string())
    }

    /// Move the working copy to `revision`
    pub async fn checkout(&self, revision: &str) -> DepchainResult<()> {
        if !self.exists() {
            return Err(DepchainError::NotCloned(self.path.clone()));
        }
        debug!("Checking out {} in {}", revision, self.path.display());
        self.vcs.checkout(&self.path, revision).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::RefListing;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records calls and fakes a clone by creating `.git`
    #[derive(Default)]
    struct RecordingVcs {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingVcs {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VersionControl for RecordingVcs {
        async fn list_refs(&self, _url: &str) -> DepchainResult<RefListing> {
            self.calls.lock().unwrap().push("list_refs".into());
            Ok(RefListing::default())
        }

        async fn clone_ref(
            &self,
            _url: &str,
            reference: &str,
            depth: Option<u32>,
            dest: &Path,
        ) -> DepchainResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("clone_ref {} {:?}", reference, depth));
            std::fs::create_dir_all(dest.join(".git")).unwrap();
            Ok(())
        }

        async fn clone_no_checkout(&self, _url: &str, dest: &Path) -> DepchainResult<()> {
            self.calls.lock().unwrap().push("clone_no_checkout".into());
            std::fs::create_dir_all(dest.join(".git")).unwrap();
            Ok(())
        }

        async fn checkout(&self, _dir: &Path, revision: &str) -> DepchainResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("checkout {}", revision));
            Ok(())
        }

        async fn head(&self, _dir: &Path) -> DepchainResult<String> {
            Ok("abc123\n".to_string())
        }
    }

    #[tokio::test]
    async fn ref_clone_is_direct_and_shallow() {
        let dir = TempDir::new().unwrap();
        let vcs = RecordingVcs::default();
        let selector = VersionSelector::Ref("develop".into());
        let checkout = Checkout::new(&vcs, "u", &selector, dir.path().join("proj"));

        assert!(!checkout.exists());
        checkout.clone(Some(1)).await.unwrap();

        assert!(checkout.exists());
        assert_eq!(vcs.calls(), vec!["clone_ref develop Some(1)"]);
    }

    #[tokio::test]
    async fn commit_clone_checks_out_after_full_clone() {
        let dir = TempDir::new().unwrap();
        let vcs = RecordingVcs::default();
        let selector = VersionSelector::Commit("deadbeef".into());
        let checkout = Checkout::new(&vcs, "u", &selector, dir.path().join("proj"));

        checkout.clone(Some(1)).await.unwrap();

        assert_eq!(vcs.calls(), vec!["clone_no_checkout", "checkout deadbeef"]);
    }

    #[tokio::test]
    async fn current_hash_requires_checkout() {
        let dir = TempDir::new().unwrap();
        let vcs = RecordingVcs::default();
        let selector = VersionSelector::default();
        let checkout = Checkout::new(&vcs, "u", &selector, dir.path().join("proj"));

        let err = checkout.current_hash().await.unwrap_err();
        assert!(matches!(err, DepchainError::NotCloned(_)));

        std::fs::create_dir_all(dir.path().join("proj/.git")).unwrap();
        assert_eq!(checkout.current_hash().await.unwrap(), "abc123");
    }

    #[tokio::test]
    async fn checkout_requires_checkout() {
        let dir = TempDir::new().unwrap();
        let vcs = RecordingVcs::default();
        let selector = VersionSelector::default();
        let checkout = Checkout::new(&vcs, "u", &selector, dir.path().join("proj"));

        assert!(checkout.checkout("abc").await.is_err());
        assert!(vcs.calls().is_empty());
    }
}
