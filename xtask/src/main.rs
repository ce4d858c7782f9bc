//! Workspace build tasks.
//!
//! ```text
//! cargo run -p triview-xtask -- build-ui          # trunk build --release
//! cargo run -p triview-xtask -- build-ui --debug
//! ```

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(about = "Build tasks for the triview workspace")]
struct Cli {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Build the Dioxus parameter panel into `crates/triview-ui/dist`.
    BuildUi {
        /// Build without optimisations.
        #[arg(long)]
        debug: bool,
    },
}

fn workspace_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask has no parent directory")
}

fn run(mut command: Command) -> Result<()> {
    let program = command.get_program().to_string_lossy().into_owned();
    let status = command
        .status()
        .with_context(|| format!("failed to start `{program}`; is it installed?"))?;
    if !status.success() {
        bail!("`{program}` exited with {status}");
    }
    Ok(())
}

fn build_ui(root: &Path, debug: bool) -> Result<()> {
    let mut trunk = Command::new("trunk");
    let _ = trunk.arg("build").current_dir(root.join("crates/triview-ui"));
    if !debug {
        let _ = trunk.arg("--release");
    }
    run(trunk)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = workspace_root()?;
    match cli.task {
        Task::BuildUi { debug } => build_ui(&root, debug),
    }
}
