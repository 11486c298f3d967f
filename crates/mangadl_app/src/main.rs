mod platform;

use std::path::PathBuf;

use clap::Parser;

/// Download selected manga chapters, optionally packed as archives.
#[derive(Debug, Parser)]
#[command(name = "mangadl", version)]
pub struct Args {
    /// RON configuration file; defaults are used when it does not exist.
    #[arg(long, default_value = "mangadl.ron")]
    pub config: PathBuf,

    /// RON chapter list: manga title plus chapter descriptors in table order.
    #[arg(long)]
    pub chapters: PathBuf,

    /// Comma separated rows to download; all rows not yet on disk when omitted.
    #[arg(long, value_delimiter = ',')]
    pub rows: Option<Vec<usize>>,
}

fn main() -> anyhow::Result<()> {
    platform::run_app(Args::parse())
}
