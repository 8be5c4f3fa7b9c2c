//! Branch listing normalization.
//!
//! `git branch` output is loosely structured text: a fixed two-character
//! prefix (`* ` for the current branch, spaces otherwise), then either a
//! plain local name or a `remotes/<remote>/<path>` reference, optionally
//! followed by a symbolic-ref annotation (`-> origin/master`). This module
//! turns that text into a deduplicated, deterministically ordered list of
//! [`Branch`] records. Pure parsing, no I/O.

/// Length of the marker-plus-separator prefix on every branch line.
const PREFIX_LEN: usize = 2;

/// Prefix git uses for remote-tracking references in `branch --all` output.
const REMOTES_PREFIX: &str = "remotes/";

/// A named line of development.
///
/// Identity for deduplication purposes is `name` alone; `is_remote` and
/// `is_current` are display attributes carried from whichever occurrence
/// survives deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Branch name, non-empty, may contain `/` separators.
    pub name: String,
    /// Remote-tracking reference (stripped of its `remotes/<remote>/` prefix).
    pub is_remote: bool,
    /// Currently checked out in the working copy.
    pub is_current: bool,
}

/// Parse raw `git branch` output into a sorted, deduplicated branch list.
///
/// Ordering is total and deterministic: names ascending (case-insensitive,
/// exact bytes as tiebreak), then local before remote. Deduplication keeps
/// the first entry per name after that sort, so a local branch always wins
/// over a remote-tracking branch of the same name.
///
/// Lines shorter than the fixed prefix, and remote references with no
/// branch path left after stripping (e.g. a bare `remotes/origin`), are
/// skipped with a diagnostic rather than failing the whole listing.
/// Empty input yields an empty list.
pub fn parse_branch_list(raw: &str) -> Vec<Branch> {
    let trimmed = raw.trim_end();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let normalized = trimmed.replace("\r\n", "\n").replace('\r', "\n");
    let mut branches: Vec<Branch> = normalized.lines().filter_map(parse_line).collect();

    // Primary key is case-insensitive; the exact name as secondary key
    // keeps equal names adjacent for dedup, and local-before-remote
    // decides which duplicate survives.
    branches.sort_by_cached_key(|branch| {
        (branch.name.to_lowercase(), branch.name.clone(), branch.is_remote)
    });
    branches.dedup_by(|current, kept| current.name == kept.name);

    branches
}

fn parse_line(line: &str) -> Option<Branch> {
    let is_current = line.starts_with('*');

    let Some(body) = line.get(PREFIX_LEN..) else {
        log::warn!("skipping malformed branch line (shorter than prefix): {line:?}");
        return None;
    };

    let (name, is_remote) = if body.starts_with(REMOTES_PREFIX) {
        // Cut at the first space to drop symbolic-ref annotations like
        // `-> origin/master`, then drop the `remotes` and `<remote>`
        // segments so only the branch path remains.
        let reference = body.split(' ').next().unwrap_or_default();
        let name = reference
            .split('/')
            .skip(2)
            .collect::<Vec<_>>()
            .join("/");
        (name, true)
    } else {
        (body.to_string(), false)
    };

    if name.is_empty() {
        log::warn!("skipping branch line with empty name: {line:?}");
        return None;
    }

    Some(Branch {
        name,
        is_remote,
        is_current,
    })
}
