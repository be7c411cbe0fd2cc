//! Chained resolution of TeamCity properties.
//!
//! TeamCity hands a build step one small "build properties" file whose
//! `teamcity.configuration.properties.file` entry points at the much larger
//! configuration-properties file holding branch and counter metadata. Every
//! query walks that chain from the top; nothing is cached, since the agent
//! may rewrite the files between steps.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::console::Console;
use crate::error::PropertyError;
use crate::properties;
use crate::settings;

/// Key in the build-properties file pointing at the configuration file.
pub const CONFIG_FILE_KEY: &str = "teamcity.configuration.properties.file";

/// Environment variable naming the build-properties file.
pub const BUILD_PROPERTIES_ENV: &str = "TEAMCITY_BUILD_PROPERTIES_FILE";

/// Resolves named properties through the two-file TeamCity chain.
#[derive(Debug, Default)]
pub struct PropertyResolver {
    build_properties_file: Option<PathBuf>,
}

impl PropertyResolver {
    /// Creates a resolver from `TEAMCITY_BUILD_PROPERTIES_FILE`, read once
    /// at startup through the settings fallback. An unset or empty variable
    /// leaves the resolver without a file, which every later query reports.
    pub fn from_env() -> Self {
        let build_properties_file = settings::get_env_var(BUILD_PROPERTIES_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        debug!(?build_properties_file, "resolved build properties file");
        Self {
            build_properties_file,
        }
    }

    /// Creates a resolver over an explicit build-properties file.
    pub fn with_build_properties_file(path: impl Into<PathBuf>) -> Self {
        Self {
            build_properties_file: Some(path.into()),
        }
    }

    /// Resolves `name` through the build-properties file and the
    /// configuration-properties file it points at.
    ///
    /// Each failure logs its own diagnostic line before returning; callers
    /// treat every error as "property absent" and terminate successfully.
    pub fn resolve(
        &self,
        console: &mut Console<'_>,
        name: &str,
    ) -> Result<String, PropertyError> {
        let Some(build_props) = self.build_properties_file.as_deref() else {
            console.warn("Couldn't find Teamcity build properties file.");
            return Err(PropertyError::MissingEnvironment);
        };

        let config_file = match lookup_in_file(console, build_props, CONFIG_FILE_KEY) {
            Ok(value) => PathBuf::from(value),
            Err(err) => {
                console.warn(&format!(
                    "Couldn't find Teamcity build property: '{CONFIG_FILE_KEY}'"
                ));
                return Err(err);
            }
        };

        match lookup_in_file(console, &config_file, name) {
            Ok(value) => Ok(value),
            Err(err) => {
                console.warn(&format!("Couldn't find Teamcity config property: '{name}'"));
                Err(err)
            }
        }
    }
}

/// Reads one properties file whole and looks up `key` in it.
fn lookup_in_file(
    console: &mut Console<'_>,
    path: &Path,
    key: &str,
) -> Result<String, PropertyError> {
    console.log(&format!(
        "Reading Teamcity properties file: '{}'",
        path.display()
    ));

    let contents = match fs::read(path) {
        Ok(contents) => contents,
        Err(err) => {
            debug!("failed to read {}: {err}", path.display());
            console.warn("Couldn't open Teamcity properties file.");
            return Err(PropertyError::UnreadableFile(path.to_path_buf()));
        }
    };

    properties::lookup(&contents, key)
        .ok_or_else(|| PropertyError::MissingProperty(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use termcolor::Buffer;

    fn resolve_captured(
        resolver: &PropertyResolver,
        name: &str,
    ) -> (Result<String, PropertyError>, String) {
        let mut buf = Buffer::no_color();
        let result = {
            let mut console = Console::new(&mut buf);
            resolver.resolve(&mut console, name)
        };
        (result, String::from_utf8_lossy(buf.as_slice()).into_owned())
    }

    fn chained_files(config_lines: &str) -> (tempfile::TempDir, PropertyResolver) {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("configuration.properties");
        fs::write(&config, config_lines).unwrap();

        let build = dir.path().join("build.properties");
        fs::write(
            &build,
            format!("{CONFIG_FILE_KEY}={}\n", config.display()),
        )
        .unwrap();

        let resolver = PropertyResolver::with_build_properties_file(&build);
        (dir, resolver)
    }

    #[test]
    fn resolves_through_the_chain() {
        let (_dir, resolver) = chained_files("teamcity.build.branch=feature/x\n");
        let (result, output) = resolve_captured(&resolver, "teamcity.build.branch");
        assert_eq!(result.unwrap(), "feature/x");
        assert_eq!(output.matches("Reading Teamcity properties file:").count(), 2);
    }

    #[test]
    fn missing_configured_file_reports_missing_environment() {
        let resolver = PropertyResolver::default();
        let (result, output) = resolve_captured(&resolver, "anything");
        assert!(matches!(result, Err(PropertyError::MissingEnvironment)));
        assert!(output.contains("Couldn't find Teamcity build properties file."));
    }

    #[test]
    fn unreadable_build_file_logs_open_failure_then_missing_property() {
        let resolver = PropertyResolver::with_build_properties_file("/nonexistent/build.properties");
        let (result, output) = resolve_captured(&resolver, "anything");
        assert!(matches!(result, Err(PropertyError::UnreadableFile(_))));

        let open_failure = output
            .find("Couldn't open Teamcity properties file.")
            .unwrap();
        let missing = output
            .find("Couldn't find Teamcity build property: 'teamcity.configuration.properties.file'")
            .unwrap();
        assert!(open_failure < missing);
    }

    #[test]
    fn missing_pointer_key_reports_build_property() {
        let dir = tempfile::tempdir().unwrap();
        let build = dir.path().join("build.properties");
        fs::write(&build, "some.other.key=1\n").unwrap();

        let resolver = PropertyResolver::with_build_properties_file(&build);
        let (result, output) = resolve_captured(&resolver, "anything");
        assert!(matches!(result, Err(PropertyError::MissingProperty(_))));
        assert!(output.contains(
            "Couldn't find Teamcity build property: 'teamcity.configuration.properties.file'"
        ));
    }

    #[test]
    fn missing_leaf_key_reports_config_property() {
        let (_dir, resolver) = chained_files("present=1\n");
        let (result, output) = resolve_captured(&resolver, "absent");
        assert!(matches!(result, Err(PropertyError::MissingProperty(_))));
        assert!(output.contains("Couldn't find Teamcity config property: 'absent'"));
    }

    #[test]
    fn pointer_value_is_escape_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config:with:colons.properties");
        fs::write(&config, "build.counter=7\n").unwrap();

        let escaped = config
            .display()
            .to_string()
            .replace('\\', "\\\\")
            .replace(':', "\\:");
        let build = dir.path().join("build.properties");
        fs::write(&build, format!("{CONFIG_FILE_KEY}={escaped}\n")).unwrap();

        let resolver = PropertyResolver::with_build_properties_file(&build);
        let (result, _output) = resolve_captured(&resolver, "build.counter");
        assert_eq!(result.unwrap(), "7");
    }

    #[test]
    fn every_query_rereads_the_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("configuration.properties");
        fs::write(&config, "build.counter=1\n").unwrap();

        let build = dir.path().join("build.properties");
        fs::write(&build, format!("{CONFIG_FILE_KEY}={}\n", config.display())).unwrap();

        let resolver = PropertyResolver::with_build_properties_file(&build);
        let (first, _) = resolve_captured(&resolver, "build.counter");
        assert_eq!(first.unwrap(), "1");

        fs::write(&config, "build.counter=2\n").unwrap();
        let (second, _) = resolve_captured(&resolver, "build.counter");
        assert_eq!(second.unwrap(), "2");
    }
}
