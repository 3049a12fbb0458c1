use anyhow::{Context, Result};
use octocrab::Octocrab;
use tracing::debug;

use crate::models::{IssueDraft, LabelRegistry};

/// Minimal GitHub config used by the issue helpers.
#[derive(Clone, Debug)]
pub struct GhCfg {
    pub repo: String,  // "owner/repo"
    pub token: String, // PAT / App token
}

#[derive(Debug)]
pub struct Github {
    client: Octocrab,
    owner: String,
    repo: String,
}

impl Github {
    pub fn new(cfg: &GhCfg) -> Result<Self> {
        if cfg.token.is_empty() {
            anyhow::bail!("GITHUB_TOKEN is not set");
        }

        let (owner, repo) = cfg
            .repo
            .split_once('/')
            .ok_or_else(|| anyhow::anyhow!("Invalid repo '{}', expected owner/repo", cfg.repo))?;

        let client = Octocrab::builder()
            .personal_token(cfg.token.clone())
            .build()
            .context("Failed to create GitHub client")?;

        Ok(Self {
            client,
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// Snapshot the repository's current label names.
    pub async fn fetch_labels(&self) -> Result<LabelRegistry> {
        let page = self
            .client
            .issues(&self.owner, &self.repo)
            .list_labels_for_repo()
            .per_page(100)
            .send()
            .await
            .context("Failed to list repository labels")?;

        let labels = self
            .client
            .all_pages(page)
            .await
            .context("Failed to page through repository labels")?;

        debug!("{}/{}: {} labels", self.owner, self.repo, labels.len());

        Ok(LabelRegistry::new(labels.into_iter().map(|l| l.name)))
    }

    /// Create an issue and return its HTML URL.
    pub async fn create_issue(&self, draft: &IssueDraft) -> Result<String> {
        let issue = self
            .client
            .issues(&self.owner, &self.repo)
            .create(&draft.title)
            .body(&draft.body)
            .labels(draft.labels.clone())
            .send()
            .await
            .context("Failed to create issue")?;

        Ok(issue.html_url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_repo_without_owner() {
        let cfg = GhCfg {
            repo: "daggers".into(),
            token: "ghp_test".into(),
        };

        let err = Github::new(&cfg).unwrap_err();

        assert!(err.to_string().contains("expected owner/repo"));
    }

    #[test]
    fn rejects_empty_token() {
        let cfg = GhCfg {
            repo: "staticaland/daggers".into(),
            token: String::new(),
        };

        let err = Github::new(&cfg).unwrap_err();

        assert!(err.to_string().contains("GITHUB_TOKEN"));
    }

    #[tokio::test]
    async fn splits_owner_and_repo() {
        let cfg = GhCfg {
            repo: "staticaland/daggers".into(),
            token: "ghp_test".into(),
        };

        let github = Github::new(&cfg).unwrap();

        assert_eq!(github.owner, "staticaland");
        assert_eq!(github.repo, "daggers");
    }
}
