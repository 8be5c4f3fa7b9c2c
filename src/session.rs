//! The interactive session state machine.
//!
//! One iteration renders the current branch list, reads a line, and
//! dispatches it. Every transition is a value: [`dispatch`] consumes the
//! current [`SessionState`] and returns either a replacement state or a
//! terminal [`SessionEnd`] carrying the exit status. Nothing here touches
//! the terminal or the process exit code directly: output goes through
//! the [`Render`] collaborator and the status is threaded back to `main`.

use std::io::BufRead;

use crate::branch::{Branch, parse_branch_list};
use crate::display::filter_and_number;
use crate::git::{Gateway, GitError};
use crate::render::{Render, Span};

/// Exit status when the input stream ends before any terminating command.
pub const EXIT_NO_INPUT: i32 = 2;

/// Everything the session owns between iterations.
///
/// Replaced wholesale on every transition; the `R` toggle swaps in a
/// freshly fetched branch list rather than patching the old one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    branches: Vec<Branch>,
    include_remote: bool,
    filter: Option<String>,
}

/// Terminal state of the session, parameterized by how it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// User quit; normal termination.
    Quit,
    /// Input stream ended with no command left to read.
    InputExhausted,
    /// A checkout ran; its exit code propagates verbatim, zero or not.
    CheckoutComplete { code: i32 },
}

impl SessionEnd {
    pub fn exit_code(self) -> i32 {
        match self {
            SessionEnd::Quit => 0,
            SessionEnd::InputExhausted => EXIT_NO_INPUT,
            SessionEnd::CheckoutComplete { code } => code,
        }
    }
}

enum Step {
    Continue(SessionState),
    Done(SessionEnd),
}

/// One parsed input line.
///
/// Recognition order matters and matches the dispatch table: `M` exactly,
/// then a case-insensitive `q` prefix, then `R` exactly, then a `/` filter,
/// then a strictly positive number. Everything else is unrecognized.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command<'a> {
    CheckoutDefault,
    Quit,
    ToggleRemote,
    SetFilter(Option<&'a str>),
    Select(usize),
    Unrecognized,
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        if line == "M" {
            return Command::CheckoutDefault;
        }
        if line
            .chars()
            .next()
            .is_some_and(|c| c.eq_ignore_ascii_case(&'q'))
        {
            return Command::Quit;
        }
        if line == "R" {
            return Command::ToggleRemote;
        }
        if let Some(rest) = line.strip_prefix('/') {
            // An empty query means "no filter", not "match nothing".
            return Command::SetFilter((!rest.is_empty()).then_some(rest));
        }
        match line.parse::<usize>() {
            Ok(number) if number > 0 => Command::Select(number),
            _ => Command::Unrecognized,
        }
    }
}

/// Run the session to completion.
///
/// Fetches the initial local-only branch list, then loops: render, read,
/// dispatch. Gateway failures (listing at startup or during the `R`
/// toggle) abort the whole session and surface to the caller with their
/// exit code intact.
pub fn run(
    gateway: &dyn Gateway,
    input: impl BufRead,
    renderer: &mut dyn Render,
) -> anyhow::Result<SessionEnd> {
    let mut state = SessionState {
        branches: fetch(gateway, false)?,
        include_remote: false,
        filter: None,
    };

    let mut lines = input.lines();
    loop {
        render_screen(&state, renderer);

        let Some(line) = lines.next() else {
            renderer.blank();
            return Ok(SessionEnd::InputExhausted);
        };
        let line = line?;

        match dispatch(state, line.trim(), gateway, renderer)? {
            Step::Continue(next) => state = next,
            Step::Done(end) => return Ok(end),
        }
    }
}

fn fetch(gateway: &dyn Gateway, include_remote: bool) -> Result<Vec<Branch>, GitError> {
    Ok(parse_branch_list(&gateway.list_branches(include_remote)?))
}

fn dispatch(
    state: SessionState,
    line: &str,
    gateway: &dyn Gateway,
    renderer: &mut dyn Render,
) -> anyhow::Result<Step> {
    match Command::parse(line) {
        Command::CheckoutDefault => Ok(Step::Done(checkout(gateway, "master", renderer)?)),

        Command::Quit => Ok(Step::Done(SessionEnd::Quit)),

        Command::ToggleRemote => {
            let include_remote = !state.include_remote;
            let branches = fetch(gateway, include_remote)?;
            Ok(Step::Continue(SessionState {
                branches,
                include_remote,
                filter: None,
            }))
        }

        Command::SetFilter(filter) => Ok(Step::Continue(SessionState {
            filter: filter.map(String::from),
            ..state
        })),

        // Selection is by position in the unfiltered list; display
        // numbers survive filtering, so the lookup stays valid.
        Command::Select(number) => match state.branches.get(number - 1).cloned() {
            Some(branch) => Ok(Step::Done(checkout(gateway, &branch.name, renderer)?)),
            None => {
                report_input_error(renderer, &format!("no branch numbered {number}!"));
                Ok(Step::Continue(state))
            }
        },

        Command::Unrecognized => {
            report_input_error(renderer, "no number specified!");
            Ok(Step::Continue(state))
        }
    }
}

fn checkout(
    gateway: &dyn Gateway,
    branch: &str,
    renderer: &mut dyn Render,
) -> Result<SessionEnd, GitError> {
    let result = gateway.checkout(branch)?;
    renderer.line(&[Span::plain(result.output)]);
    Ok(SessionEnd::CheckoutComplete { code: result.code })
}

fn render_screen(state: &SessionState, renderer: &mut dyn Render) {
    let title = match &state.filter {
        Some(filter) => format!("Choose a Branch (Filter: {filter})"),
        None => "Choose a Branch".to_string(),
    };
    let underline = "-".repeat(title.len());
    renderer.line(&[Span::header(title)]);
    renderer.line(&[Span::header(underline)]);
    renderer.blank();

    for row in filter_and_number(&state.branches, state.filter.as_deref()) {
        let mut spans = vec![Span::plain(row.number)];
        spans.push(if row.is_current {
            Span::current_branch(row.name)
        } else {
            Span::plain(row.name)
        });
        if row.is_remote {
            spans.push(Span::remote_marker(" (R)"));
        }
        renderer.line(&spans);
    }

    renderer.blank();
    renderer.line(&[Span::hint(
        "number → select    M → master    R → show remote branches    /QUERY → filter",
    )]);
    renderer.fragment(&[Span::prompt("> ")]);
}

fn report_input_error(renderer: &mut dyn Render, message: &str) {
    renderer.line(&[Span::error("Error: "), Span::plain(message)]);
    renderer.blank();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::CheckoutOutput;
    use crate::render::SpanKind;
    use rstest::rstest;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::io::Cursor;

    /// Gateway double: scripted listings, recorded requests and checkouts.
    /// An exhausted listing script reports a failure, which doubles as the
    /// refetch-failure fixture.
    struct FakeGateway {
        listings: RefCell<VecDeque<String>>,
        requests: RefCell<Vec<bool>>,
        checkouts: RefCell<Vec<String>>,
        checkout_code: i32,
    }

    impl FakeGateway {
        fn new(listings: &[&str]) -> Self {
            Self {
                listings: RefCell::new(listings.iter().map(|s| s.to_string()).collect()),
                requests: RefCell::new(Vec::new()),
                checkouts: RefCell::new(Vec::new()),
                checkout_code: 0,
            }
        }
    }

    impl Gateway for FakeGateway {
        fn list_branches(&self, include_remote: bool) -> Result<String, GitError> {
            self.requests.borrow_mut().push(include_remote);
            self.listings
                .borrow_mut()
                .pop_front()
                .ok_or(GitError::ListFailed {
                    output: "fatal: scripted listing failure".to_string(),
                    code: 128,
                })
        }

        fn checkout(&self, branch: &str) -> Result<CheckoutOutput, GitError> {
            self.checkouts.borrow_mut().push(branch.to_string());
            Ok(CheckoutOutput {
                output: format!("Switched to branch '{branch}'"),
                code: self.checkout_code,
            })
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        lines: Vec<Vec<Span>>,
        fragments: Vec<Vec<Span>>,
    }

    impl RecordingRenderer {
        fn text(&self) -> String {
            self.lines
                .iter()
                .map(|spans| {
                    spans
                        .iter()
                        .map(|span| span.text.as_str())
                        .collect::<String>()
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
    }

    impl Render for RecordingRenderer {
        fn line(&mut self, spans: &[Span]) {
            self.lines.push(spans.to_vec());
        }

        fn fragment(&mut self, spans: &[Span]) {
            self.fragments.push(spans.to_vec());
        }
    }

    const TEN_BRANCHES: &str = "  a\n  b\n  c\n  d\n  e\n* f\n  g\n  h\n  i\n  j";

    fn run_session(gateway: &FakeGateway, input: &str) -> (anyhow::Result<SessionEnd>, RecordingRenderer) {
        let mut renderer = RecordingRenderer::default();
        let result = run(gateway, Cursor::new(input.as_bytes().to_vec()), &mut renderer);
        (result, renderer)
    }

    #[rstest]
    #[case("M", Command::CheckoutDefault)]
    #[case("q", Command::Quit)]
    #[case("Q", Command::Quit)]
    #[case("quit now", Command::Quit)]
    #[case("R", Command::ToggleRemote)]
    #[case("/release", Command::SetFilter(Some("release")))]
    #[case("/", Command::SetFilter(None))]
    #[case("7", Command::Select(7))]
    #[case("0", Command::Unrecognized)]
    #[case("-3", Command::Unrecognized)]
    #[case("m", Command::Unrecognized)]
    #[case("r", Command::Unrecognized)]
    #[case("", Command::Unrecognized)]
    #[case("checkout f", Command::Unrecognized)]
    fn command_recognition(#[case] line: &str, #[case] expected: Command<'_>) {
        assert_eq!(Command::parse(line), expected);
    }

    #[test]
    fn quit_ends_with_success() {
        let gateway = FakeGateway::new(&[TEN_BRANCHES]);
        let (result, _) = run_session(&gateway, "q\n");

        let end = result.unwrap();
        assert_eq!(end, SessionEnd::Quit);
        assert_eq!(end.exit_code(), 0);
        assert!(gateway.checkouts.borrow().is_empty());
    }

    #[test]
    fn input_exhaustion_has_its_own_status() {
        let gateway = FakeGateway::new(&[TEN_BRANCHES]);
        let (result, renderer) = run_session(&gateway, "");

        let end = result.unwrap();
        assert_eq!(end, SessionEnd::InputExhausted);
        assert_eq!(end.exit_code(), EXIT_NO_INPUT);
        // Trailing blank line after the prompt, nothing else.
        assert!(renderer.lines.last().unwrap().is_empty());
    }

    #[test]
    fn m_checks_out_master() {
        let gateway = FakeGateway::new(&[TEN_BRANCHES]);
        let (result, renderer) = run_session(&gateway, "M\n");

        assert_eq!(result.unwrap(), SessionEnd::CheckoutComplete { code: 0 });
        assert_eq!(*gateway.checkouts.borrow(), vec!["master".to_string()]);
        assert!(renderer.text().contains("Switched to branch 'master'"));
    }

    #[test]
    fn filter_then_select_uses_unfiltered_position() {
        let gateway = FakeGateway::new(&[TEN_BRANCHES]);
        let (result, _) = run_session(&gateway, "/f\n6\n");

        assert_eq!(result.unwrap(), SessionEnd::CheckoutComplete { code: 0 });
        assert_eq!(*gateway.checkouts.borrow(), vec!["f".to_string()]);
    }

    #[test]
    fn nonzero_checkout_code_propagates() {
        let mut gateway = FakeGateway::new(&["  only"]);
        gateway.checkout_code = 1;
        let (result, _) = run_session(&gateway, "1\n");

        let end = result.unwrap();
        assert_eq!(end, SessionEnd::CheckoutComplete { code: 1 });
        assert_eq!(end.exit_code(), 1);
    }

    #[test]
    fn out_of_range_selection_is_recoverable() {
        let gateway = FakeGateway::new(&[TEN_BRANCHES]);
        let (result, renderer) = run_session(&gateway, "99\nq\n");

        assert_eq!(result.unwrap(), SessionEnd::Quit);
        assert!(gateway.checkouts.borrow().is_empty());
        assert!(renderer.text().contains("no branch numbered 99!"));
    }

    #[test]
    fn unrecognized_input_is_recoverable() {
        let gateway = FakeGateway::new(&[TEN_BRANCHES]);
        let (result, renderer) = run_session(&gateway, "bogus\nq\n");

        assert_eq!(result.unwrap(), SessionEnd::Quit);
        let error_spans: Vec<_> = renderer
            .lines
            .iter()
            .flatten()
            .filter(|span| span.kind == SpanKind::Error)
            .collect();
        assert_eq!(error_spans.len(), 1);
        assert!(renderer.text().contains("no number specified!"));
    }

    #[test]
    fn toggle_refetches_and_clears_filter() {
        let gateway = FakeGateway::new(&[TEN_BRANCHES, "  a\n  remotes/origin/extra"]);
        let (result, renderer) = run_session(&gateway, "/f\nR\nq\n");

        assert_eq!(result.unwrap(), SessionEnd::Quit);
        assert_eq!(*gateway.requests.borrow(), vec![false, true]);

        let text = renderer.text();
        assert!(text.contains("Choose a Branch (Filter: f)"));
        assert!(text.contains("extra (R)"));
        // The screen after R shows no filter in its header.
        let headers: Vec<_> = text
            .lines()
            .filter(|line| line.starts_with("Choose a Branch"))
            .collect();
        assert_eq!(
            headers,
            vec![
                "Choose a Branch",
                "Choose a Branch (Filter: f)",
                "Choose a Branch",
            ]
        );
    }

    #[test]
    fn refetch_failure_aborts_the_session() {
        let gateway = FakeGateway::new(&[TEN_BRANCHES]);
        let (result, _) = run_session(&gateway, "R\n");

        let err = result.unwrap_err();
        assert_eq!(crate::git::exit_code(&err), Some(128));
        assert!(gateway.checkouts.borrow().is_empty());
    }

    #[test]
    fn empty_filter_clears_an_active_one() {
        let gateway = FakeGateway::new(&[TEN_BRANCHES]);
        let (result, renderer) = run_session(&gateway, "/f\n/\nq\n");

        assert_eq!(result.unwrap(), SessionEnd::Quit);
        let text = renderer.text();
        let filtered = text
            .lines()
            .filter(|line| line.contains("(Filter:"))
            .count();
        assert_eq!(filtered, 1);
    }

    #[test]
    fn prompt_is_emitted_as_a_fragment() {
        let gateway = FakeGateway::new(&[TEN_BRANCHES]);
        let (_, renderer) = run_session(&gateway, "q\n");

        assert_eq!(renderer.fragments.len(), 1);
        assert_eq!(renderer.fragments[0], vec![Span::prompt("> ")]);
    }

    #[test]
    fn screen_layout() {
        let gateway = FakeGateway::new(&["* bar\n  remotes/origin/baz\n  foo"]);
        let (_, renderer) = run_session(&gateway, "q\n");

        insta::assert_snapshot!(renderer.text(), @r"
        Choose a Branch
        ---------------

        1. bar
        2. baz (R)
        3. foo

        number → select    M → master    R → show remote branches    /QUERY → filter
        ");
    }

    #[test]
    fn current_and_remote_rows_are_tagged() {
        let gateway = FakeGateway::new(&["* bar\n  remotes/origin/baz"]);
        let (_, renderer) = run_session(&gateway, "q\n");

        let spans: Vec<_> = renderer.lines.iter().flatten().collect();
        assert!(
            spans
                .iter()
                .any(|s| s.kind == SpanKind::CurrentBranch && s.text == "bar")
        );
        assert!(
            spans
                .iter()
                .any(|s| s.kind == SpanKind::RemoteMarker && s.text == " (R)")
        );
    }
}
