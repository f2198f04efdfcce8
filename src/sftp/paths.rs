//! Mapping between remote paths, catalog ids and local files

use std::path::{Path, PathBuf};

use crate::catalog::Folder;

/// Folder listed when the host does not name one
pub const ROOT: &str = ".";

pub fn strip_dot_prefix(path: &str) -> &str {
    path.strip_prefix("./").unwrap_or(path)
}

/// Extension after the last `.` of the basename, or empty.
pub fn format_of(name: &str) -> &str {
    let base = title_of(name);
    match base.rfind('.') {
        Some(i) => &base[i + 1..],
        None => "",
    }
}

/// Last path segment
pub fn title_of(id: &str) -> &str {
    let trimmed = id.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

pub fn child_id(folder: &str, name: &str) -> String {
    format!("{}/{}", folder.trim_end_matches('/'), name)
}

/// Ancestors of `folder` from the top level down to `folder` itself.
///
/// Ids keep the caller's `./` prefix so they can be listed again.
pub fn breadcrumb(folder: &str) -> Vec<Folder> {
    let has_dot = folder.starts_with("./");
    let mut rest = strip_dot_prefix(folder).trim_end_matches('/');
    if rest == ROOT {
        rest = "";
    }

    let mut crumbs = Vec::new();
    while !rest.is_empty() {
        let id = if has_dot {
            format!("./{}", rest)
        } else {
            rest.to_string()
        };
        crumbs.insert(0, Folder::new(id, title_of(rest)));
        rest = match rest.rfind('/') {
            Some(i) => &rest[..i],
            None => "",
        };
    }
    crumbs
}

/// Local destination of a remote resource under `tmp_dir`
pub fn local_target(tmp_dir: &Path, id: &str) -> PathBuf {
    strip_dot_prefix(id)
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .fold(tmp_dir.to_path_buf(), |acc, segment| acc.join(segment))
}
