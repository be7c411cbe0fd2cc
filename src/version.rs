//! Branch-based build-number policy.
//!
//! Master and default-branch builds keep the build number the server
//! assigned. Every other branch gets `0.0.<build.counter>` stamped through
//! a service message, so branch builds are always version-ordered below
//! real releases.

use crate::console::Console;
use crate::notify;
use crate::resolver::PropertyResolver;

/// Branch property reported by the server for the running build.
pub const BUILD_BRANCH_KEY: &str = "teamcity.build.branch";

/// Branch property attached to the VCS root; fallback for older servers
/// that do not report `teamcity.build.branch`.
pub const VCS_ROOT_BRANCH_KEY: &str = "vcsroot.branch";

/// Set to `true` by the server when the build branch is the default branch.
pub const IS_DEFAULT_BRANCH_KEY: &str = "teamcity.build.branch.is_default";

/// Per-configuration build counter maintained by the server.
pub const BUILD_COUNTER_KEY: &str = "build.counter";

/// Outcome of one policy run. Every variant is a successful termination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildNumberDecision {
    /// Master or default branch; the server-assigned build number stands.
    Keep,
    /// Branch build; the contained version was stamped (or would be,
    /// under dry-run).
    Set(String),
    /// No branch property resolved; nothing to do.
    NoBranch,
    /// No build counter resolved; nothing to do.
    NoCounter,
}

impl BuildNumberDecision {
    /// The pure policy over already-resolved property values.
    ///
    /// The counter is copied into the version verbatim; a non-numeric
    /// counter still composes.
    pub fn decide(
        branch: Option<&str>,
        is_default: Option<&str>,
        counter: Option<&str>,
    ) -> Self {
        let Some(branch) = branch else {
            return Self::NoBranch;
        };
        if is_master_branch(branch) || is_default == Some("true") {
            return Self::Keep;
        }
        match counter {
            Some(counter) => Self::Set(compose_version(counter)),
            None => Self::NoCounter,
        }
    }
}

/// Exact-match test against the two spellings the server reports for the
/// master branch. No normalization is applied.
pub fn is_master_branch(branch: &str) -> bool {
    branch == "master" || branch == "refs/heads/master"
}

/// Composes the stamped version from the build counter.
pub fn compose_version(counter: &str) -> String {
    format!("0.0.{counter}")
}

/// Runs the whole policy: resolve the branch and counter, decide, log, and
/// emit the service message unless `dry_run` is set.
///
/// Every terminal state is a success; missing properties only change which
/// diagnostic lines appear.
pub fn run(
    resolver: &PropertyResolver,
    console: &mut Console<'_>,
    dry_run: bool,
) -> BuildNumberDecision {
    let Some(branch) = resolve_branch(resolver, console) else {
        console.warn("Couldn't find any branch name.");
        return BuildNumberDecision::NoBranch;
    };

    let is_default = resolver.resolve(console, IS_DEFAULT_BRANCH_KEY).ok();
    match &is_default {
        Some(value) => console.log(&format!("{IS_DEFAULT_BRANCH_KEY}: '{value}'")),
        None => console.log(&format!("{IS_DEFAULT_BRANCH_KEY}: <null>")),
    }

    if is_master_branch(&branch) {
        console.log(&format!(
            "On master branch: '{branch}', keeping build number."
        ));
        return BuildNumberDecision::Keep;
    }
    if is_default.as_deref() == Some("true") {
        console.log(&format!(
            "On default branch: '{branch}', keeping build number."
        ));
        return BuildNumberDecision::Keep;
    }

    let Ok(counter) = resolver.resolve(console, BUILD_COUNTER_KEY) else {
        console.warn("Couldn't find any build counter.");
        return BuildNumberDecision::NoCounter;
    };
    console.log(&format!("Found {BUILD_COUNTER_KEY}: '{counter}'"));

    let version = compose_version(&counter);
    console.log(&format!("Setting build number: '{version}'"));

    if !dry_run {
        notify::set_build_number(console, &version);
    }

    BuildNumberDecision::Set(version)
}

/// Resolves the branch name, preferring the build branch over the VCS root.
fn resolve_branch(resolver: &PropertyResolver, console: &mut Console<'_>) -> Option<String> {
    if let Ok(branch) = resolver.resolve(console, BUILD_BRANCH_KEY) {
        console.log(&format!("Found {BUILD_BRANCH_KEY}: '{branch}'"));
        return Some(branch);
    }
    if let Ok(branch) = resolver.resolve(console, VCS_ROOT_BRANCH_KEY) {
        console.log(&format!("Found {VCS_ROOT_BRANCH_KEY}: '{branch}'"));
        return Some(branch);
    }
    None
}
