//! Path resolution and relative-path math.
//!
//! Settings written on the host side may carry Windows-style paths (drive
//! letters, backslashes) even when this tool runs elsewhere, so all prefix
//! tests and segment splits work on the raw strings and treat `/` and `\`
//! as the same separator. Comparisons are ASCII case-insensitive, matching
//! the host filesystem's behavior.
//!
//! Every function here is total: an input that cannot be interpreted is
//! returned unchanged, never turned into an error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Strategy for rewriting an absolute track path against a relative root.
///
/// Two strategies exist because exports consumed by different players want
/// different shapes: prefix subtraction only rewrites true descendants of
/// the root, while common-ancestor walking also reaches sibling subtrees
/// via `..` segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelativeMode {
    /// Strip the root prefix and prepend a `./` marker; non-descendants
    /// fall back to the absolute path.
    #[default]
    PrefixSubtraction,

    /// Ascend with `..` segments to the deepest common ancestor, then
    /// descend into the target subtree.
    CommonAncestor,
}

/// Resolves user-supplied path strings against a base (install) directory.
#[derive(Debug, Clone)]
pub struct PathResolver {
    base_dir: PathBuf,
}

impl PathResolver {
    /// Create a resolver based on the running executable's directory,
    /// falling back to the current working directory.
    pub fn new() -> Self {
        Self {
            base_dir: install_dir(),
        }
    }

    /// Create a resolver with an explicit base directory.
    pub fn with_base(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Turn a configured path string into an absolute path string.
    ///
    /// Blank input stays blank. A `./` (or `.\`) prefix is stripped and the
    /// remainder joined to the base directory; any other non-rooted input
    /// is joined directly; rooted input passes through unchanged.
    pub fn resolve_base(&self, input: &str) -> String {
        let input = input.trim();
        if input.is_empty() {
            return String::new();
        }
        if let Some(rest) = input.strip_prefix("./").or_else(|| input.strip_prefix(".\\")) {
            return self.join_base(rest);
        }
        if !is_rooted(input) {
            return self.join_base(input);
        }
        input.to_string()
    }

    fn join_base(&self, rest: &str) -> String {
        self.base_dir.join(rest).to_string_lossy().into_owned()
    }
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Rewrite `file` relative to `root` using the selected strategy.
///
/// Whenever the two paths have no usable relation (different drives, no
/// shared prefix, blank input) the original `file` string is returned
/// unchanged so the exported playlist still points somewhere valid.
pub fn relative_to(mode: RelativeMode, root: &str, file: &str) -> String {
    if root.is_empty() || file.is_empty() {
        return file.to_string();
    }
    match mode {
        RelativeMode::PrefixSubtraction => relative_by_prefix(root, file),
        RelativeMode::CommonAncestor => relative_by_ancestor(root, file),
    }
}

/// True when `file` lies under the directory `root` (case-insensitive,
/// separator-normalized prefix test). Used by the prefix strategy and by
/// configuration validation.
pub fn is_descendant(root: &str, file: &str) -> bool {
    !root.is_empty() && !file.is_empty() && strip_prefix_ci(file, root).is_some()
}

fn relative_by_prefix(root: &str, file: &str) -> String {
    match strip_prefix_ci(file, root) {
        Some(tail) => {
            let sep = separator_of(file);
            let tail = tail.trim_start_matches(['/', '\\']);
            format!(".{sep}{tail}")
        }
        None => file.to_string(),
    }
}

fn relative_by_ancestor(root: &str, file: &str) -> String {
    let (root_drive, root_segs) = split_path(root);
    let (file_drive, file_segs) = split_path(file);

    // No shared drive/root means no relation at all.
    let related = match (root_drive, file_drive) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    };
    if !related {
        return file.to_string();
    }

    let common = root_segs
        .iter()
        .zip(file_segs.iter())
        .take_while(|(a, b)| a.eq_ignore_ascii_case(b))
        .count();
    if common == 0 {
        // Only the drive root is shared; an all-`..` path would be
        // fragile, keep the absolute path instead.
        return file.to_string();
    }

    let sep = separator_of(file);
    let mut parts: Vec<&str> = Vec::new();
    for _ in common..root_segs.len() {
        parts.push("..");
    }
    parts.extend(&file_segs[common..]);
    if parts.is_empty() {
        return format!(".{sep}");
    }

    let joined = parts.join(&sep.to_string());
    if joined.starts_with("..") {
        joined
    } else {
        format!(".{sep}{joined}")
    }
}

/// Case- and separator-insensitive prefix strip. Returns the byte tail of
/// `file` after the root (root is treated as ending in a separator).
fn strip_prefix_ci<'a>(file: &'a str, root: &str) -> Option<&'a str> {
    let mut root_norm: String = root.chars().map(norm_char).collect();
    if !root_norm.ends_with('/') {
        root_norm.push('/');
    }
    let file_norm: String = file.chars().map(norm_char).collect();
    // norm_char is byte-length preserving, so the normalized offset is a
    // valid char boundary in the original string.
    if file_norm.starts_with(&root_norm) {
        file.get(root_norm.len()..)
    } else {
        None
    }
}

fn norm_char(c: char) -> char {
    if c == '\\' {
        '/'
    } else {
        c.to_ascii_lowercase()
    }
}

/// Split into (drive-or-root marker, segments). `C:\Music\A` becomes
/// `(Some("C:"), ["Music", "A"])`; `/srv/music` becomes `(Some("/"),
/// ["srv", "music"])`; a non-rooted path has no marker.
fn split_path(path: &str) -> (Option<&str>, Vec<&str>) {
    let bytes = path.as_bytes();
    let (root, rest) = if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        (Some(&path[..2]), &path[2..])
    } else if bytes.first().is_some_and(|b| *b == b'/' || *b == b'\\') {
        (Some("/"), path)
    } else {
        (None, path)
    };
    let segs = rest.split(['/', '\\']).filter(|s| !s.is_empty()).collect();
    (root, segs)
}

fn is_rooted(path: &str) -> bool {
    split_path(path).0.is_some()
}

fn separator_of(path: &str) -> char {
    if path.contains('\\') {
        '\\'
    } else {
        '/'
    }
}

/// The leaf segment of a fully-qualified playlist name: everything after
/// the last separator, or the whole name when there is none.
pub fn leaf_name(name: &str) -> &str {
    match name.rsplit(['\\', '/']).next() {
        Some(leaf) if !leaf.is_empty() => leaf,
        _ => name,
    }
}

/// Replace every character that is illegal in a filename with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if (c as u32) < 0x20 => '_',
            c => c,
        })
        .collect()
}
