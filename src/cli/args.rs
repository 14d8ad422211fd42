use clap::Parser;
use std::path::PathBuf;

use crate::TEMPLATES_PATH;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about,
    help_template(
        "{before-help}{name} {version}\n{author-with-newline}{about-with-newline}\n{usage-heading} {usage}\n\n{all-args}{after-help}"
    )
)]
pub struct Args {
    /// Directory of TOML template libraries.
    #[arg(short, long, default_value = TEMPLATES_PATH)]
    pub templates: PathBuf,

    /// Path to TOML or JSON run file.
    #[arg(short, long, default_value = "schemgen.toml")]
    pub config: PathBuf,

    /// File to which the composed netlist should be written.
    ///
    /// Defaults to `<lib>__<cell>.json` in the current directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of threads used to design sibling instances.
    ///
    /// With one job, siblings are designed sequentially.
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Do not print the banner or step progress.
    #[arg(short, long)]
    pub quiet: bool,
}
