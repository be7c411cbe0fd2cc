//! TeamCity service-message emission.

use crate::console::Console;

/// Formats the `buildNumber` service message the TeamCity log scraper
/// recognizes. The version is inserted verbatim, single-quoted, with no
/// escaping.
pub fn build_number_message(version: &str) -> String {
    format!("##teamcity[buildNumber '{version}']")
}

/// Emits the `buildNumber` service message as one stdout line.
pub fn set_build_number(console: &mut Console<'_>, version: &str) {
    console.log(&build_number_message(version));
}
