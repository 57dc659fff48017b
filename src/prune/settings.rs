use std::{fmt, str::FromStr};

use crate::{
    config::{ConfigError, FailurePolicy, PruneConfig},
    db::{DbResult, PruneQuery, VersionRepo},
};

/// Versions kept per record when no (or a non-positive) count is given.
pub const DEFAULT_KEEP_VERSIONS: u32 = 5;

/// Minimum number of most recent versions kept per live record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepVersions(u32);

impl KeepVersions {
    /// Normalizes `keep <= 0` to [`DEFAULT_KEEP_VERSIONS`]. Zero never means
    /// "delete every version".
    pub fn new(keep: i64) -> Self {
        if keep <= 0 {
            return Self::default();
        }
        Self(u32::try_from(keep).unwrap_or(u32::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for KeepVersions {
    fn default() -> Self {
        Self(DEFAULT_KEEP_VERSIONS)
    }
}

impl fmt::Display for KeepVersions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether matched rows are deleted or only counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Execute,
    DryRun,
}

impl RunMode {
    pub fn is_dry_run(self) -> bool {
        matches!(self, RunMode::DryRun)
    }

    /// Prefix for progress lines.
    pub fn prefix(self) -> &'static str {
        match self {
            RunMode::Execute => "",
            RunMode::DryRun => "(dry): ",
        }
    }

    /// Delete the rows `query` matches, or count them on a dry run.
    ///
    /// Both paths share the query's WHERE clause, so the returned numbers
    /// agree for the same store state.
    pub async fn apply(self, repo: &dyn VersionRepo, query: &PruneQuery) -> DbResult<u64> {
        match self {
            RunMode::Execute => repo.delete_matching(query).await,
            RunMode::DryRun => repo.count_matching(query).await,
        }
    }
}

/// The operator's `run` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationMode {
    /// `yes`: prune for real. Acknowledges that archived records become
    /// unrecoverable.
    Execute,
    /// `dry`: count only.
    DryRun,
    /// `fast`: prune for real but skip the per-record trim.
    Fast,
}

impl FromStr for InvocationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(InvocationMode::Execute),
            "dry" => Ok(InvocationMode::DryRun),
            "fast" => Ok(InvocationMode::Fast),
            _ => Err(ConfigError::Validation(
                "Please provide the 'run' argument with either 'yes', 'dry', or 'fast'".into(),
            )),
        }
    }
}

impl fmt::Display for InvocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InvocationMode::Execute => "yes",
            InvocationMode::DryRun => "dry",
            InvocationMode::Fast => "fast",
        })
    }
}

/// Settings for one prune run, passed explicitly to every operation.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub mode: RunMode,
    /// Skip the old-version trim and only sweep archived and orphaned rows.
    pub fast: bool,
    pub keep: KeepVersions,
    pub batch_size: u32,
    pub on_error: FailurePolicy,
}

impl RunSettings {
    pub fn new(invocation: InvocationMode, keep: Option<i64>, config: &PruneConfig) -> Self {
        let (mode, fast) = match invocation {
            InvocationMode::Execute => (RunMode::Execute, false),
            InvocationMode::DryRun => (RunMode::DryRun, false),
            InvocationMode::Fast => (RunMode::Execute, true),
        };
        Self {
            mode,
            fast,
            keep: keep.map(KeepVersions::new).unwrap_or_default(),
            batch_size: config.batch_size.max(1),
            on_error: config.on_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::positive(3, 3)]
    #[case::one(1, 1)]
    #[case::zero(0, DEFAULT_KEEP_VERSIONS)]
    #[case::negative(-2, DEFAULT_KEEP_VERSIONS)]
    #[case::huge(i64::MAX, u32::MAX)]
    fn test_keep_versions_normalization(#[case] input: i64, #[case] expected: u32) {
        assert_eq!(KeepVersions::new(input).get(), expected);
    }

    #[rstest]
    #[case::yes("yes", InvocationMode::Execute)]
    #[case::dry("dry", InvocationMode::DryRun)]
    #[case::fast("fast", InvocationMode::Fast)]
    fn test_invocation_mode_parse(#[case] input: &str, #[case] expected: InvocationMode) {
        let mode: InvocationMode = input.parse().unwrap();
        assert_eq!(mode, expected);
        assert_eq!(mode.to_string(), input);
    }

    #[rstest]
    #[case::empty("")]
    #[case::uppercase("YES")]
    #[case::truthy("true")]
    #[case::typo("dryrun")]
    fn test_invocation_mode_rejects_other_values(#[case] input: &str) {
        let err = input.parse::<InvocationMode>().unwrap_err();
        assert!(err.to_string().contains("'yes', 'dry', or 'fast'"));
    }

    #[test]
    fn test_run_settings_from_invocation() {
        let config = PruneConfig::default();

        let execute = RunSettings::new(InvocationMode::Execute, None, &config);
        assert_eq!(execute.mode, RunMode::Execute);
        assert!(!execute.fast);
        assert_eq!(execute.keep.get(), DEFAULT_KEEP_VERSIONS);

        let dry = RunSettings::new(InvocationMode::DryRun, Some(2), &config);
        assert!(dry.mode.is_dry_run());
        assert!(!dry.fast);
        assert_eq!(dry.keep.get(), 2);

        let fast = RunSettings::new(InvocationMode::Fast, Some(0), &config);
        assert_eq!(fast.mode, RunMode::Execute);
        assert!(fast.fast);
        assert_eq!(fast.keep.get(), DEFAULT_KEEP_VERSIONS);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(RunMode::Execute.prefix(), "");
        assert_eq!(RunMode::DryRun.prefix(), "(dry): ");
    }
}
