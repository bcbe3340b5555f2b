//! The `imagescout search` command.

use clap::Args;
use imagescout_core::{Config, ImageScout, OutputWriter};

/// Arguments for the `search` command.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Chinese description of the image you want
    pub description: String,

    /// Pretty-print the JSON result
    #[arg(long)]
    pub pretty: bool,
}

pub async fn execute(args: SearchArgs, config: Config) -> anyhow::Result<()> {
    let scout = ImageScout::new(&config)?;
    let response = scout.search(&args.description).await?;

    tracing::info!(
        keyword = %response.translation,
        count = response.total_count,
        pages = response.search_info.total_pages,
        "Search finished"
    );

    let mut writer = OutputWriter::new(std::io::stdout().lock(), args.pretty);
    writer.write(&response)?;
    writer.flush()?;
    Ok(())
}
