use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::{Path, PathBuf};

/// Directories searched for counter binaries: configured ones first, then `PATH`.
pub(super) fn search_dirs(configured: &[PathBuf]) -> Vec<PathBuf> {
    let from_env = std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).collect::<Vec<_>>())
        .unwrap_or_default();
    configured.iter().cloned().chain(from_env).collect()
}

/// First file in `dirs` whose name matches one of `patterns`.
///
/// Directories are tried in order. Within one directory an earlier pattern
/// wins, then the lexically smallest name.
pub(super) fn find_binary(patterns: &[&str], dirs: &[PathBuf]) -> anyhow::Result<Option<PathBuf>> {
    let matcher = build_matcher(patterns)?;
    for dir in dirs {
        let Ok(entries) = fs::read_dir(dir) else {
            continue;
        };
        let mut candidates = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(|path| {
                let rank = pattern_rank(&matcher, &path)?;
                Some((rank, path))
            })
            .collect::<Vec<_>>();
        candidates.sort();
        if let Some((_, path)) = candidates.into_iter().next() {
            tracing::debug!(binary = %path.display(), "discovered counter binary");
            return Ok(Some(path));
        }
    }
    Ok(None)
}

fn build_matcher(patterns: &[&str]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(
            Glob::new(pattern).with_context(|| format!("invalid binary pattern '{}'", pattern))?,
        );
    }
    builder.build().context("failed to build binary pattern set")
}

fn pattern_rank(matcher: &GlobSet, path: &Path) -> Option<usize> {
    let name = path.file_name()?;
    matcher.matches(Path::new(name)).into_iter().min()
}
