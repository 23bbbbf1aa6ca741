//! List-files command implementation.

use crate::cli::ListFilesArgs;
use crate::error::add_pack_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use fnpack_core::plan;

pub fn execute(args: &ListFilesArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let plan = add_pack_context(plan(&args.source, &args.to_config()), &args.source)?;
    formatter.format_file_list(&plan)
}
