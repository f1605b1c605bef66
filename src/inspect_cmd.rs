//! Inspect command: summarize a field dataset.

use anyhow::{Context, Result};
use tracing::info_span;

use boreas_dataset::{add_dataset_path, open_dataset};

use crate::cli::InspectArgs;

/// Print a short summary of a dataset.
pub fn run(args: InspectArgs) -> Result<()> {
    let _cmd = info_span!("inspect").entered();

    for dir in &args.path {
        add_dataset_path(dir);
    }

    let ds = open_dataset(&args.dataset)
        .with_context(|| format!("failed to open dataset '{}'", args.dataset))?;

    println!("dataset:  {}", ds.request());
    println!("path:     {}", ds.path().display());
    println!("fields:   {}", ds.len());

    let params = ds.fields().unique_values("param");
    let names: Vec<&str> = params.values().iter().map(String::as_str).collect();
    println!("params:   {}", names.join(", "));

    let dates = ds.fields().unique_values("valid_datetime");
    println!("dates:    {}", dates.len());
    let numbers = ds.fields().unique_values("number");
    if !numbers.is_empty() {
        println!("numbers:  {}", numbers.len());
    }
    Ok(())
}
