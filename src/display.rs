//! Numbering and filtering of branch lists for display.

use crate::branch::Branch;

/// One row of the branch list, rebuilt on every render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchDisplay<'a> {
    /// Space-padded ordinal label with trailing `". "`, e.g. `" 6. "`.
    pub number: String,
    pub name: &'a str,
    pub is_remote: bool,
    pub is_current: bool,
}

/// Number branches by their unfiltered position, then apply the filter.
///
/// The display number and its padding width come from the **full** branch
/// count and the branch's position in the **unfiltered** list, before the
/// filter runs. Entries surviving the filter keep their original numbers;
/// nothing is renumbered. With 100 branches the first row is `"  1. "` and
/// the last `"100. "`.
///
/// The filter is a case-sensitive substring match on the branch name.
/// `None` yields every entry in input order. The sequence is lazy and
/// restartable: calling again with the same inputs yields identical rows.
pub fn filter_and_number<'a>(
    branches: &'a [Branch],
    filter: Option<&'a str>,
) -> impl Iterator<Item = BranchDisplay<'a>> + 'a {
    let width = branches.len().to_string().len();

    branches
        .iter()
        .enumerate()
        .map(move |(index, branch)| BranchDisplay {
            number: format!("{:>width$}. ", index + 1),
            name: &branch.name,
            is_remote: branch.is_remote,
            is_current: branch.is_current,
        })
        .filter(move |row| filter.is_none_or(|needle| row.name.contains(needle)))
}
