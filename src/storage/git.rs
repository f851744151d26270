//! Git transport for fetching skill and extension repositories.

use std::path::Path;

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{Direction, FetchOptions, Remote, Repository};
use tracing::{debug, info};

use crate::error::{Result, SkmError};

pub trait GitTransport {
    /// Shallow (depth 1) clone of `url` into `dest`.
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()>;

    /// Highest tag advertised by the remote, if any can be resolved.
    fn latest_tag(&self, url: &str) -> Option<String>;

    /// Fetch the current branch's upstream and fast-forward the checkout.
    fn pull(&self, repo_path: &Path) -> Result<()>;
}

/// libgit2-backed transport.
#[derive(Debug, Default, Clone, Copy)]
pub struct Git2Transport;

impl Git2Transport {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Depth-1 fetch options. libgit2's local transport cannot fetch shallow,
/// so local paths and `file://` URLs get a full fetch.
fn fetch_options<'cb>(url: &str) -> FetchOptions<'cb> {
    let mut options = FetchOptions::new();
    if !is_local_url(url) {
        options.depth(1);
    }
    options
}

fn is_local_url(url: &str) -> bool {
    url.starts_with("file://") || Path::new(url).exists()
}

impl GitTransport for Git2Transport {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        debug!(url, dest = %dest.display(), "cloning repository");
        RepoBuilder::new()
            .fetch_options(fetch_options(url))
            .clone(url, dest)?;
        info!(url, dest = %dest.display(), "cloned repository");
        Ok(())
    }

    fn latest_tag(&self, url: &str) -> Option<String> {
        let mut remote = Remote::create_detached(url).ok()?;
        remote.connect(Direction::Fetch).ok()?;
        let tags = remote
            .list()
            .ok()?
            .iter()
            .filter_map(|head| head.name().strip_prefix("refs/tags/"))
            .map(|tag| tag.trim_end_matches("^{}").to_string())
            .collect::<Vec<_>>();
        highest_tag(tags)
    }

    fn pull(&self, repo_path: &Path) -> Result<()> {
        let repo = Repository::open(repo_path)?;
        let head = repo.head()?;
        let branch = head
            .shorthand()
            .ok_or_else(|| SkmError::Git("git: detached HEAD, nothing to pull".to_string()))?
            .to_string();
        let refname = head
            .name()
            .ok_or_else(|| SkmError::Git("git: HEAD is not valid UTF-8".to_string()))?
            .to_string();

        let mut remote = repo.find_remote("origin")?;
        let url = remote.url().unwrap_or_default().to_string();
        remote.fetch(&[branch.as_str()], Some(&mut fetch_options(&url)), None)?;

        let fetch_head = repo.find_reference("FETCH_HEAD")?;
        let incoming = repo.reference_to_annotated_commit(&fetch_head)?;
        let (analysis, _) = repo.merge_analysis(&[&incoming])?;

        if analysis.is_up_to_date() {
            debug!(path = %repo_path.display(), "already up to date");
            return Ok(());
        }
        if !analysis.is_fast_forward() {
            return Err(SkmError::Git(format!(
                "git: {} has diverged from origin/{branch}; cannot fast-forward",
                repo_path.display()
            )));
        }

        let mut reference = repo.find_reference(&refname)?;
        reference.set_target(incoming.id(), "skm: fast-forward")?;
        repo.set_head(&refname)?;
        repo.checkout_head(Some(CheckoutBuilder::default().force()))?;
        info!(path = %repo_path.display(), branch = %branch, "pulled repository");
        Ok(())
    }
}

/// Pick the highest tag, comparing as semver where possible (leading `v`
/// ignored) and falling back to string order.
fn highest_tag(tags: Vec<String>) -> Option<String> {
    tags.into_iter().max_by(|a, b| match (parse_tag(a), parse_tag(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => a.cmp(b),
    })
}

fn parse_tag(tag: &str) -> Option<semver::Version> {
    semver::Version::parse(tag.trim_start_matches('v')).ok()
}
