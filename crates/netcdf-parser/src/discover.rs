//! Discovery of multi-file datasets on disk.
//!
//! Model runs are laid out as one directory per run, each holding its own
//! output files (`run20191001/snow.nc`, `run20191002/snow.nc`, ...). A pattern
//! such as `run*/*snow.nc` is matched component by component below a root
//! directory.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{NetCdfError, NetCdfResult};

/// Find every file below `root` whose relative path matches `pattern`.
///
/// `pattern` is split on `/`; each component may contain `*` (any run of
/// characters) and `?` (any single character). The result is sorted by path.
pub fn discover_files(root: &Path, pattern: &str) -> NetCdfResult<Vec<PathBuf>> {
    let components: Vec<&str> = pattern.split('/').filter(|c| !c.is_empty()).collect();
    if components.is_empty() {
        return Err(NetCdfError::InvalidPattern(pattern.to_string()));
    }
    if components.iter().any(|c| *c == "..") {
        return Err(NetCdfError::InvalidPattern(format!(
            "'{}' must not leave the root directory",
            pattern
        )));
    }

    let depth = components.len();
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(depth)
        .max_depth(depth)
        .follow_links(true)
    {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        if parts.len() == depth
            && parts
                .iter()
                .zip(&components)
                .all(|(part, pat)| wildcard_match(pat, part))
        {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!(root = %root.display(), pattern, count = files.len(), "Discovered dataset files");
    Ok(files)
}

/// Match a single path component against a `*`/`?` wildcard pattern.
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();

    let (mut pi, mut ti) = (0usize, 0usize);
    // Position of the last '*' and the text index it is currently matched up to
    let mut star: Option<(usize, usize)> = None;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some((pi, ti));
            pi += 1;
        } else if let Some((star_pi, star_ti)) = star {
            pi = star_pi + 1;
            ti = star_ti + 1;
            star = Some((star_pi, star_ti + 1));
        } else {
            return false;
        }
    }

    p[pi..].iter().all(|&c| c == '*')
}
