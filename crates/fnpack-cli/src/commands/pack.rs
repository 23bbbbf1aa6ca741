//! Pack command implementation.

use crate::cli::PackArgs;
use crate::error::add_pack_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use fnpack_core::DirectoryPackager;

pub async fn execute(args: &PackArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "Output file already exists: {}\n\
             HINT: Use --force to overwrite it.",
            args.output.display()
        );
    }

    let packager = DirectoryPackager::new(&args.source, &args.output)
        .config(args.to_config())
        .boxed_observer(formatter.entry_observer());

    let report = add_pack_context(packager.pack().await, &args.source)?;
    formatter.format_pack_result(&report)?;

    Ok(())
}
