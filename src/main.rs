use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::Parser;

use git_release::config::{self, ReleaseOptions};
use git_release::git::SystemGit;
use git_release::host::GhCli;
use git_release::preflight;
use git_release::ui::{self, BumpChooser, BumpPrompt, NonInteractive};
use git_release::workflow::ReleaseWorkflow;
use git_release::ReleaseError;

#[derive(clap::Parser)]
#[command(
    name = "git-release",
    about = "Bump the version, regenerate the changelog, tag, and publish a release"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Branch to release from (overrides RELEASE_BRANCH)")]
    branch: Option<String>,

    #[arg(
        long,
        value_name = "X.Y.Z",
        help = "Explicit new version, bypassing bump selection (overrides VERSION)"
    )]
    set_version: Option<String>,

    #[arg(long, help = "Version bump kind: major, minor or patch (overrides BUMP)")]
    bump: Option<String>,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn main() {
    let args = Args::parse();

    if args.version {
        println!("git-release {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    if let Err(err) = run(&args) {
        ui::display_error(&format!("{err:#}"));
        let code = err
            .downcast_ref::<ReleaseError>()
            .map(ReleaseError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn run(args: &Args) -> Result<()> {
    preflight::ensure_dependencies()?;

    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;
    let options = ReleaseOptions::resolve(
        &config,
        args.branch.as_deref(),
        args.set_version.as_deref(),
        args.bump.as_deref(),
    )?;

    let git = SystemGit::new();
    let host = GhCli::new();

    // Only prompt when attached to a terminal on both ends; detached
    // sessions silently take the patch default
    let interactive = io::stdin().is_terminal() && io::stdout().is_terminal();
    let mut chooser: Box<dyn BumpChooser> = if interactive {
        Box::new(BumpPrompt::new(io::stdin().lock()))
    } else {
        Box::new(NonInteractive::patch())
    };

    let mut workflow = ReleaseWorkflow::new(&git, &host, chooser.as_mut(), options);
    let result = workflow.run()?;

    ui::display_success(&format!("Release {} completed.", result.tag));
    Ok(())
}
