//! `colors` command.

use std::path::Path;

use super::{CliError, open_catalog};

/// Print each distinct catalog color, in the order inference checks them.
#[allow(clippy::print_stdout)]
pub fn run(data: Option<&Path>) -> Result<(), CliError> {
    let catalog = open_catalog(data)?;
    for (_, original) in catalog.colors().iter() {
        println!("{original}");
    }
    Ok(())
}
