//! Libraries command handler.

use crate::config::AppConfig;
use crate::pipeline::{exit_codes, load_catalog};
use anyhow::Result;

/// Print the catalogued libraries, marking the monitored ones.
pub fn run_libraries(config: &AppConfig) -> Result<i32> {
    let catalog = load_catalog(config)?;
    let mut names = catalog.library_names();
    names.sort_by_key(|n| n.to_lowercase());

    for name in &names {
        let monitored = config
            .monitored_libraries
            .iter()
            .any(|m| m.eq_ignore_ascii_case(name));
        println!("{name}{}", if monitored { "" } else { " (not monitored)" });
    }
    tracing::debug!("{} libraries in catalog", names.len());
    Ok(exit_codes::SUCCESS)
}
