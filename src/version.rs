//! Build metadata embedded by `build.rs` (vergen).

use std::fmt;

use serde::Serialize;

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

const UNKNOWN: &str = "unknown";

/// What was built, from where, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_branch: &'static str,
    pub git_sha: &'static str,
    pub git_dirty: bool,
    /// RFC 3339 build timestamp, when the build script could record one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub built_at: Option<&'static str>,
}

impl BuildInfo {
    /// Metadata of the running binary.
    pub fn current() -> Self {
        Self {
            version: PKG_VERSION,
            git_branch: match option_env!("VERGEN_GIT_BRANCH") {
                Some(branch) => branch,
                None => UNKNOWN,
            },
            git_sha: match option_env!("VERGEN_GIT_SHA") {
                Some(sha) => sha,
                None => UNKNOWN,
            },
            git_dirty: matches!(option_env!("VERGEN_GIT_DIRTY"), Some("true")),
            built_at: option_env!("VERGEN_BUILD_TIMESTAMP"),
        }
    }

    /// First seven characters of the commit SHA.
    pub fn short_sha(&self) -> &'static str {
        let sha: &'static str = self.git_sha;
        &sha[..7.min(sha.len())]
    }
}

/// `{version}+{branch}.{sha}`, with `.dirty` appended for a dirty tree.
impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}.{}", self.version, self.git_branch, self.short_sha())?;
        if self.git_dirty {
            f.write_str(".dirty")?;
        }
        Ok(())
    }
}

/// Version string reported by `mimird` at startup and on `GET /health`.
pub fn version_string() -> String {
    BuildInfo::current().to_string()
}
