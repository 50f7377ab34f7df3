//! Remote reference resolution
//!
//! Parses `git ls-remote --heads --tags` output and resolves a branch or tag
//! name to a commit hash with a single listing call.

use super::VersionControl;
use crate::error::{DepchainError, DepchainResult};
use std::collections::BTreeMap;
use tracing::debug;

/// Suffix git appends to the peeled entry of an annotated tag
const PEELED_SUFFIX: &str = "^{}";

/// Heads and tags advertised by a remote, name to hash
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefListing {
    pub heads: BTreeMap<String, String>,
    pub tags: BTreeMap<String, String>,
}

impl RefListing {
    /// Parse `<hash>\trefs/<namespace>/<name>` lines.
    ///
    /// Namespaces other than `heads` and `tags` are ignored. A line that does
    /// not have this shape makes the whole listing malformed.
    pub fn parse(url: &str, output: &str) -> DepchainResult<Self> {
        let mut listing = Self::default();

        for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let (hash, full_ref) = line
                .split_once('\t')
                .ok_or_else(|| DepchainError::remote(url, format!("malformed ref line: {}", line)))?;

            if hash.is_empty() || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(DepchainError::remote(
                    url,
                    format!("malformed hash in ref line: {}", line),
                ));
            }

            let (namespace, name) = full_ref
                .strip_prefix("refs/")
                .and_then(|rest| rest.split_once('/'))
                .filter(|(ns, name)| !ns.is_empty() && !name.is_empty())
                .ok_or_else(|| DepchainError::remote(url, format!("malformed ref name: {}", full_ref)))?;

            match namespace {
                "heads" => {
                    listing.heads.insert(name.to_string(), hash.to_string());
                }
                "tags" => {
                    listing.tags.insert(name.to_string(), hash.to_string());
                }
                other => debug!("Ignoring ref namespace {}: {}", other, name),
            }
        }

        Ok(listing)
    }

    /// Resolve a reference name.
    ///
    /// Order: exact branch, peeled tag (the commit an annotated tag points
    /// at), raw tag.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        if let Some(hash) = self.heads.get(name) {
            return Some(hash.as_str());
        }
        if let Some(hash) = self.tags.get(&format!("{}{}", name, PEELED_SUFFIX)) {
            return Some(hash.as_str());
        }
        self.tags.get(name).map(String::as_str)
    }
}

/// List the remote once and resolve `name` against it
pub async fn resolve_remote(
    vcs: &dyn VersionControl,
    url: &str,
    name: &str,
) -> DepchainResult<Option<String>> {
    let listing = vcs.list_refs(url).await?;
    let resolved = listing.resolve(name).map(str::to_string);
    debug!("Resolved {} of {} to {:?}", name, url, resolved);
    Ok(resolved)
}
