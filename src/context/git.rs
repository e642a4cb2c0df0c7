//
//  azure-devops-rest
//  context/git.rs
//
//  Created by Ngonidzashe Mangudya on 2026/10/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Read-only access to the local git repository.
//!
//! Used to find the `origin` remote (to infer organization and project) and
//! the current branch (the default ref for `azdo build queue` and
//! `azdo pipeline run`).

use std::path::Path;

use anyhow::Result;
use git2::Repository;

/// An open git repository.
pub struct GitContext {
    repo: Repository,
}

impl GitContext {
    /// Opens the repository containing the current directory.
    pub fn open() -> Result<Self> {
        let repo = Repository::discover(".")?;
        Ok(Self { repo })
    }

    /// Opens the repository at `path`, searching parent directories.
    pub fn open_at(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)?;
        Ok(Self { repo })
    }

    /// Short name of the checked-out branch, e.g. `main`.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        Ok(head.shorthand().unwrap_or("HEAD").to_string())
    }

    /// URL of the named remote, or `None` if it does not exist.
    pub fn remote_url(&self, name: &str) -> Result<Option<String>> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(str::to_string)),
            Err(_) => Ok(None),
        }
    }

    pub fn origin_url(&self) -> Result<Option<String>> {
        self.remote_url("origin")
    }
}
