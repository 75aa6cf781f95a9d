//! Text renderings of namespace results.
//!
//! Styling goes through `colored`, so whether escape codes are emitted is
//! decided once, globally, by the application.

use std::fmt::{Display, Write as _};

use colored::Colorize;

use crate::ext::SystemTimeExt;
use crate::filesystem::{Descriptor, EntryKind, RenderEntry, Stats};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const GAP: &str = "    ";

pub fn success(message: impl Display) -> String {
    format!("{} {}\n", "✓".green(), message)
}

pub fn error(error: impl Display) -> String {
    format!("{} {}\n", "Error:".red().bold(), error)
}

pub fn listing(path: &str, entries: &[Descriptor]) -> String {
    let mut out = format!("--- Directory: {} ---\n", path.bold());
    if entries.is_empty() {
        out.push_str("(empty)\n");
    }
    for entry in entries {
        match entry.kind {
            EntryKind::Directory => {
                let _ = writeln!(out, "[DIR]  {}", entry.name.blue().bold());
            }
            EntryKind::File => {
                let _ = writeln!(out, "[FILE] {} ({} bytes)", entry.name, entry.size);
            }
        }
    }
    out
}

pub fn content(name: &str, content: &str) -> String {
    let body = if content.is_empty() { "(empty)" } else { content };
    let mut out = format!("--- Content of {} ---\n{}", name.bold(), body);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

pub fn descriptor(descriptor: &Descriptor) -> String {
    format!(
        "--- Details ---\nName: {}\nType: {}\nSize: {} bytes\nCreated: {}\nModified: {}\n",
        descriptor.name,
        descriptor.kind,
        descriptor.size,
        descriptor.created_at.to_rfc3339(),
        descriptor.modified_at.to_rfc3339(),
    )
}

pub fn search_results(term: &str, results: &[String]) -> String {
    let mut out = format!("Searching for '{}'...\n", term);
    if results.is_empty() {
        out.push_str("No files found\n");
    }
    for path in results {
        let _ = writeln!(out, "Found: {}", path);
    }
    out
}

pub fn stats(stats: &Stats, indexed_paths: usize) -> String {
    format!(
        "--- File System Statistics ---\nTotal Files: {}\nTotal Directories: {}\nTotal Size: {} bytes\nIndexed Paths: {}\n",
        stats.file_count, stats.dir_count, stats.total_bytes, indexed_paths
    )
}

/// Draws the render description with box connectors, one line per entry.
pub fn tree(entries: &[RenderEntry]) -> String {
    let mut out = String::new();
    // For every ancestor level below the root: whether siblings still follow
    let mut open_levels: Vec<bool> = Vec::new();

    for entry in entries {
        if entry.depth > 0 {
            open_levels.truncate(entry.depth - 1);
            for &open in &open_levels {
                out.push_str(if open { PIPE } else { GAP });
            }
            out.push_str(if entry.is_last { LAST_BRANCH } else { BRANCH });
            open_levels.push(!entry.is_last);
        }

        let label = match (entry.kind, entry.size) {
            (EntryKind::Directory, _) if entry.depth == 0 => entry.name.clone(),
            (EntryKind::Directory, _) => format!("{}/", entry.name),
            (EntryKind::File, Some(size)) => format!("{} ({} bytes)", entry.name, size),
            (EntryKind::File, None) => entry.name.clone(),
        };
        match (entry.is_cursor, entry.kind) {
            (true, _) => {
                let _ = writeln!(out, "{} {}", label.green().bold(), "(current)".green());
            }
            (false, EntryKind::Directory) => {
                let _ = writeln!(out, "{}", label.blue().bold());
            }
            (false, EntryKind::File) => {
                let _ = writeln!(out, "{}", label);
            }
        }
    }
    out
}
