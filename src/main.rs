use clap::Parser;
use std::process;

use git_pick::git::{self, GitCli};
use git_pick::render::AnsiRenderer;
use git_pick::session;

#[derive(Parser)]
#[command(name = "git-pick")]
#[command(about = "Interactive branch switcher for git", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose output (show git commands and debug info)
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // Configure logging based on --verbose flag or RUST_LOG env var
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "off" }),
    )
    .format(|buf, record| {
        use anstyle::Style;
        use std::io::Write;

        let msg = record.args().to_string();

        // Commands start with $, make only the command bold (not the $)
        if let Some(rest) = msg.strip_prefix("$ ") {
            let bold = Style::new().bold();
            writeln!(buf, "$ {bold}{rest}{bold:#}")
        } else {
            let dim = Style::new().dimmed();
            writeln!(buf, "{dim}{msg}{dim:#}")
        }
    })
    .init();

    let gateway = GitCli;
    let stdin = std::io::stdin().lock();
    let mut renderer = AnsiRenderer;

    match session::run(&gateway, stdin, &mut renderer) {
        Ok(end) => process::exit(end.exit_code()),
        Err(e) => {
            // Error messages are already formatted with colors
            eprintln!("{e}");
            process::exit(git::exit_code(&e).unwrap_or(1));
        }
    }
}
