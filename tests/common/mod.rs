#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex}
};

use async_trait::async_trait;
use git2::{Oid, Repository, Signature};
use scaffolder_azure::{
    domain::{
        credential::{AzureCredential, GitAuth, OrgAuth},
        error::ActionError,
        repository::{CommitInfo, CreatedPullRequest, GitIdentity, PullRequestSpec}
    },
    port::{
        git::{CloneOptions, GitClient, PushOptions},
        integration::IntegrationRegistry,
        pull_request::{PullRequestClient, PullRequestClientFactory}
    }
};

/// Integrations from a fixed host list
pub struct StaticIntegrations(pub Vec<(String, Vec<AzureCredential>)>);

impl StaticIntegrations {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self(Vec::new()))
    }

    pub fn with_pat(host: &str, token: &str) -> Arc<Self> {
        Arc::new(Self(vec![(host.to_string(), vec![AzureCredential::personal_access_token(token)])]))
    }
}

impl IntegrationRegistry for StaticIntegrations {
    fn by_host(&self, host: &str) -> Vec<AzureCredential> {
        self.0.iter().find(|(h, _)| h == host).map(|(_, c)| c.clone()).unwrap_or_default()
    }
}

/// Git client that records calls instead of touching any repository
#[derive(Default)]
pub struct RecordingGit {
    pub calls: Mutex<Vec<String>>,
    pub auth:  Mutex<Vec<GitAuth>>
}

impl RecordingGit {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn passwords(&self) -> Vec<String> {
        self.auth.lock().unwrap().iter().map(|a| a.password.clone()).collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl GitClient for RecordingGit {
    async fn clone_repository(&self, url: &str, dir: &Path, options: &CloneOptions) -> Result<(), ActionError> {
        if let Some(auth) = &options.auth {
            self.auth.lock().unwrap().push(auth.clone());
        }
        self.record(format!("clone {} {}", url, dir.display()));
        Ok(())
    }

    async fn add_remote(&self, _dir: &Path, remote: &str, url: &str) -> Result<(), ActionError> {
        self.record(format!("remote {} {}", remote, url));
        Ok(())
    }

    async fn checkout(&self, _dir: &Path, branch: &str, remote: &str) -> Result<(), ActionError> {
        self.record(format!("checkout {} {}", branch, remote));
        Ok(())
    }

    async fn current_branch(&self, _dir: &Path) -> Result<Option<String>, ActionError> {
        self.record("current_branch".to_string());
        Ok(Some("main".to_string()))
    }

    async fn branch(&self, _dir: &Path, branch: &str) -> Result<(), ActionError> {
        self.record(format!("branch {}", branch));
        Ok(())
    }

    async fn add_all(&self, _dir: &Path) -> Result<(), ActionError> {
        self.record("add_all".to_string());
        Ok(())
    }

    async fn commit(
        &self,
        _dir: &Path,
        message: &str,
        author: &GitIdentity,
        _committer: &GitIdentity
    ) -> Result<CommitInfo, ActionError> {
        self.record(format!("commit {} <{}> {}", author.name, author.email, message));
        Ok(CommitInfo {
            id:       "0123456789abcdef0123456789abcdef01234567".to_string(),
            short_id: "01234567".to_string()
        })
    }

    async fn push(&self, _dir: &Path, options: &PushOptions) -> Result<(), ActionError> {
        if let Some(auth) = &options.auth {
            self.auth.lock().unwrap().push(auth.clone());
        }
        self.record(format!("push {} {}:{}", options.remote, options.branch, options.remote_ref));
        Ok(())
    }
}

/// One recorded create-pull-request call
#[derive(Debug, Clone)]
pub struct RecordedPullRequest {
    pub server:              String,
    pub auth:                OrgAuth,
    pub spec:                PullRequestSpec,
    pub repo_id:             String,
    pub project:             Option<String>,
    pub supports_iterations: Option<bool>
}

/// Pull request factory whose sessions record every call and answer with a fixed id
#[derive(Default)]
pub struct RecordingPullRequests {
    pub connects: Mutex<Vec<(String, OrgAuth)>>,
    pub requests: Arc<Mutex<Vec<RecordedPullRequest>>>
}

impl RecordingPullRequests {
    pub fn requests(&self) -> Vec<RecordedPullRequest> {
        self.requests.lock().unwrap().clone()
    }
}

struct RecordingSession {
    server:   String,
    auth:     OrgAuth,
    requests: Arc<Mutex<Vec<RecordedPullRequest>>>
}

#[async_trait]
impl PullRequestClient for RecordingSession {
    async fn create_pull_request(
        &self,
        spec: &PullRequestSpec,
        repo_id: &str,
        project: Option<&str>,
        supports_iterations: Option<bool>
    ) -> Result<CreatedPullRequest, ActionError> {
        self.requests.lock().unwrap().push(RecordedPullRequest {
            server: self.server.clone(),
            auth: self.auth.clone(),
            spec: spec.clone(),
            repo_id: repo_id.to_string(),
            project: project.map(str::to_string),
            supports_iterations
        });

        Ok(CreatedPullRequest {
            pull_request_id: 7,
            url:             Some(format!("https://{}/{}/_apis/git/pullRequests/7", self.server, self.auth.org)),
            status:          Some("active".to_string())
        })
    }
}

impl PullRequestClientFactory for RecordingPullRequests {
    fn connect(&self, server: &str, auth: &OrgAuth) -> Result<Box<dyn PullRequestClient>, ActionError> {
        self.connects.lock().unwrap().push((server.to_string(), auth.clone()));
        Ok(Box::new(RecordingSession {
            server:   server.to_string(),
            auth:     auth.clone(),
            requests: self.requests.clone()
        }))
    }
}

/// Bare repository with `main` (README.md) and `develop` (README.md + DEVELOP.md)
pub fn bare_remote(root: &Path) -> PathBuf {
    let path = root.join("remote.git");
    let repo = Repository::init_bare(&path).unwrap();
    let sig = Signature::now("Fixture", "fixture@example.com").unwrap();

    let main = commit_file(&repo, "refs/heads/main", "README.md", "# service\n", None, &sig);
    commit_file(&repo, "refs/heads/develop", "DEVELOP.md", "work in progress\n", Some(main), &sig);
    repo.set_head("refs/heads/main").unwrap();

    path
}

fn commit_file(
    repo: &Repository,
    refname: &str,
    name: &str,
    content: &str,
    parent: Option<Oid>,
    sig: &Signature<'_>
) -> Oid {
    let parent = parent.map(|oid| repo.find_commit(oid).unwrap());
    let base_tree = parent.as_ref().map(|c| c.tree().unwrap());

    let blob = repo.blob(content.as_bytes()).unwrap();
    let mut builder = repo.treebuilder(base_tree.as_ref()).unwrap();
    builder.insert(name, blob, 0o100644).unwrap();
    let tree = repo.find_tree(builder.write().unwrap()).unwrap();

    let parents: Vec<_> = parent.iter().collect();
    repo.commit(Some(refname), sig, sig, &format!("add {}", name), &tree, &parents).unwrap()
}

/// Path of a repository as a clone URL
pub fn url_of(path: &Path) -> String {
    path.display().to_string()
}
