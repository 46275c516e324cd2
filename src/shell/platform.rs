//! Platform detection.

/// Host platform family.
///
/// Only the distinction that changes behaviour is modelled: Windows uses
/// executable suffixes, `Scripts\` environment layouts and PowerShell
/// bootstrap commands; everything else is POSIX.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Posix,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }

    /// Candidate file names for an executable called `name`.
    ///
    /// On Windows a bare name is tried with the usual executable suffixes;
    /// a name that already has an extension is tried as-is.
    pub fn executable_names(&self, name: &str) -> Vec<String> {
        match self {
            Platform::Posix => vec![name.to_string()],
            Platform::Windows => {
                if std::path::Path::new(name).extension().is_some() {
                    vec![name.to_string()]
                } else {
                    ["exe", "cmd", "bat"]
                        .iter()
                        .map(|ext| format!("{}.{}", name, ext))
                        .collect()
                }
            }
        }
    }

    /// Default interpreter names, in lookup order.
    pub fn default_interpreters(&self) -> Vec<String> {
        match self {
            Platform::Posix => vec!["python3".to_string(), "python".to_string()],
            Platform::Windows => vec!["python".to_string(), "py".to_string()],
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Posix => "posix",
        }
    }
}

/// Check if running in a CI environment.
///
/// Used to auto-detect CI and force non-interactive mode in `main()`.
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}
