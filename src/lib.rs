//! Interactive branch switcher for git.
//!
//! The crate is split along the seams of the interactive loop:
//! - [`branch`] normalizes raw `git branch` output into branch records
//! - [`display`] numbers and filters those records for rendering
//! - [`session`] owns the read/dispatch/render state machine
//! - [`git`] is the subprocess gateway behind a trait seam
//! - [`render`] and [`styling`] turn tagged spans into terminal output

pub mod branch;
pub mod display;
pub mod git;
pub mod render;
pub mod session;
pub mod styling;

pub use branch::{Branch, parse_branch_list};
pub use display::{BranchDisplay, filter_and_number};
pub use git::{CheckoutOutput, Gateway, GitCli, GitError, exit_code};
pub use render::{AnsiRenderer, Render, Span, SpanKind};
pub use session::{EXIT_NO_INPUT, SessionEnd, run};
