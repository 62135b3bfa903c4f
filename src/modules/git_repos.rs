use crate::shell::{
    content_fn, Module, RefreshContext, Region, RenderState, Result, Widget, WidgetContent,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use walkdir::WalkDir;

pub const ID: &str = "git_repos";
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Directories below the root that are searched for repositories.
const MAX_DEPTH: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GitRepo {
    pub name: String,
    pub path: PathBuf,
    /// Path relative to the search root, `/`-separated.
    pub relative: String,
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Repositories (directories holding a `.git` directory) below `root`.
/// Hidden directories are skipped; nested repositories are reported too.
pub fn find_repositories(root: &Path) -> Vec<GitRepo> {
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(MAX_DEPTH)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));
    let mut repos = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!(root = %root.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_dir() || !entry.path().join(".git").is_dir() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        repos.push(GitRepo {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path().to_path_buf(),
            relative,
        });
    }
    repos
}

/// Branch named by the contents of `.git/HEAD`; detached heads show the
/// short commit id.
pub fn parse_head(head: &str) -> Option<String> {
    let head = head.trim();
    if let Some(reference) = head.strip_prefix("ref:") {
        let reference = reference.trim();
        let branch = reference.strip_prefix("refs/heads/").unwrap_or(reference);
        return (!branch.is_empty()).then(|| branch.to_string());
    }
    if head.len() >= 7 && head.chars().all(|c| c.is_ascii_hexdigit()) {
        return Some(format!("detached-{}", &head[..7]));
    }
    None
}

pub fn branch_name(repo: &Path) -> Option<String> {
    let head = std::fs::read_to_string(repo.join(".git").join("HEAD")).ok()?;
    parse_head(&head)
}

struct BranchStatus {
    path: PathBuf,
}

impl WidgetContent for BranchStatus {
    fn render(&mut self, _ctx: &RefreshContext) -> anyhow::Result<RenderState> {
        if !self.path.join(".git").is_dir() {
            anyhow::bail!("{} is no longer a git repository", self.path.display());
        }
        let branch = branch_name(&self.path).unwrap_or_else(|| "Unknown".into());
        Ok(RenderState::text(branch))
    }
}

pub fn module(root: impl Into<PathBuf>) -> Result<Module> {
    let root = root.into();
    let repos = find_repositories(&root);
    tracing::info!(root = %root.display(), repos = repos.len(), "git repositories discovered");

    let listing = if repos.is_empty() {
        vec!["No repositories found.".to_string()]
    } else {
        repos.iter().map(|r| r.relative.clone()).collect()
    };
    let root_line = root.display().to_string();
    let mut builder = Module::builder(ID, "Git repositories", Region::Right).widget(
        Widget::new_static(
            "repos",
            "Repositories",
            content_fn(move |_| {
                Ok(RenderState::lines(
                    std::iter::once(root_line.clone()).chain(listing.iter().cloned()),
                ))
            }),
        ),
    );
    for repo in repos {
        builder = builder.widget(Widget::new_timed(
            format!("branch:{}", repo.relative),
            repo.name,
            REFRESH_INTERVAL,
            BranchStatus { path: repo.path },
        )?);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn make_repo(path: &Path, head: &str) {
        fs::create_dir_all(path.join(".git")).unwrap();
        fs::write(path.join(".git").join("HEAD"), head).unwrap();
    }

    #[test]
    fn head_parsing() {
        assert_eq!(parse_head("ref: refs/heads/main\n").as_deref(), Some("main"));
        assert_eq!(
            parse_head("ref: refs/heads/feature/login").as_deref(),
            Some("feature/login")
        );
        assert_eq!(
            parse_head("3f2a9c1d0e8b7a6f5e4d3c2b1a0f9e8d7c6b5a49").as_deref(),
            Some("detached-3f2a9c1")
        );
        assert_eq!(parse_head("garbage"), None);
    }

    #[test]
    fn finds_nested_repos_and_skips_hidden_dirs() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        make_repo(&root.join("alpha"), "ref: refs/heads/main");
        make_repo(&root.join("alpha").join("vendor").join("beta"), "ref: refs/heads/dev");
        make_repo(&root.join(".cache").join("gamma"), "ref: refs/heads/main");
        fs::create_dir_all(root.join("notes")).unwrap();

        let found: Vec<String> = find_repositories(root).into_iter().map(|r| r.relative).collect();
        assert_eq!(found, vec!["alpha", "alpha/vendor/beta"]);
    }

    #[test]
    fn repos_deeper_than_the_limit_are_ignored() {
        let dir = tempdir().unwrap();
        make_repo(&dir.path().join("a/b/c/d/e"), "ref: refs/heads/main");
        make_repo(&dir.path().join("a/b/c/d"), "ref: refs/heads/main");
        let found: Vec<String> = find_repositories(dir.path())
            .into_iter()
            .map(|r| r.relative)
            .collect();
        assert_eq!(found, vec!["a/b/c/d"]);
    }

    #[test]
    fn module_has_one_branch_widget_per_repo() {
        let dir = tempdir().unwrap();
        make_repo(&dir.path().join("one"), "ref: refs/heads/main");
        make_repo(&dir.path().join("two"), "ref: refs/heads/release");
        let module = module(dir.path()).unwrap();
        let ids: Vec<&str> = module.widgets().iter().map(|w| w.id().as_str()).collect();
        assert_eq!(ids, vec!["repos", "branch:one", "branch:two"]);
        assert!(!module.widgets()[0].is_timed());
        assert_eq!(module.widgets()[1].kind().interval(), Some(REFRESH_INTERVAL));
    }

    #[test]
    fn empty_root_still_builds_a_listing() {
        let dir = tempdir().unwrap();
        let module = module(dir.path()).unwrap();
        assert_eq!(module.widgets().len(), 1);
    }
}
