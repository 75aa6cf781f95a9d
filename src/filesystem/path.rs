//! Canonical absolute path strings.

pub const SEPARATOR: char = '/';
pub const ROOT_PATH: &str = "/";

/// Builds the path of a child from its parent's canonical path.
pub fn join(parent: &str, name: &str) -> String {
    if parent == ROOT_PATH {
        format!("{SEPARATOR}{name}")
    } else {
        format!("{parent}{SEPARATOR}{name}")
    }
}

/// Builds a canonical path from the names between the root (exclusive) and
/// the target (inclusive), ordered from the target upwards.
pub(crate) fn from_reversed_names<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut names = names.into_iter().collect::<Vec<_>>();
    if names.is_empty() {
        return ROOT_PATH.to_string();
    }
    names.reverse();

    let mut path = String::with_capacity(names.iter().map(|n| n.len() + 1).sum());
    for name in names {
        path.push(SEPARATOR);
        path.push_str(name);
    }
    path
}
