use std::collections::HashMap;
use std::path::Path;

use super::Assertions;
use crate::configuration::BuildOptions;
use crate::error::ToolError;
use crate::location::Location;
use crate::tool::{BuildRequest, ExitStatus};

impl Assertions<'_> {
    /// Builds `path` once per configuration in `options`.
    ///
    /// Every configuration is attempted; each one that fails is reported
    /// separately.
    pub fn assert_builds(&self, path: &Path, options: &BuildOptions, location: Location) {
        for configuration in &options.configurations {
            tracing::info!(configuration = %configuration, path = %path.display(), "Building");
            let request = BuildRequest {
                path,
                configuration: Some(configuration),
                cc_flags: &options.cc_flags,
                linker_flags: &options.linker_flags,
                compiler_flags: &options.compiler_flags,
                env: options.env.as_ref(),
            };

            if let Err(err) = self.tool.build(&request) {
                self.fail(
                    format!(
                        "`{} build` failed for configuration '{configuration}':\n\n{err}\n",
                        self.tool.name()
                    ),
                    location,
                );
            }
        }
    }

    /// Runs the package's tests once.
    pub fn assert_tests_pass(
        &self,
        path: &Path,
        env: Option<&HashMap<String, String>>,
        location: Location,
    ) {
        tracing::info!(path = %path.display(), "Running tests");
        if let Err(err) = self.tool.test(path, env) {
            self.fail(
                format!("`{} test` failed:\n\n{err}\n", self.tool.name()),
                location,
            );
        }
    }

    /// Builds the default configuration and expects the tool to exit
    /// unsuccessfully.
    ///
    /// Only a `NonZeroExit` whose status is not a clean `exit 0` counts as
    /// the expected failure. `options.configurations` is ignored.
    pub fn assert_build_fails(&self, path: &Path, options: &BuildOptions, location: Location) {
        tracing::info!(path = %path.display(), "Building, expecting failure");
        let request = BuildRequest {
            path,
            configuration: None,
            cc_flags: &options.cc_flags,
            linker_flags: &options.linker_flags,
            compiler_flags: &options.compiler_flags,
            env: options.env.as_ref(),
        };

        match self.tool.build(&request) {
            Ok(_) => self.fail(
                format!(
                    "`{} build` succeeded but should have failed",
                    self.tool.name()
                ),
                location,
            ),
            Err(ToolError::NonZeroExit(result))
                if result.exit_status != (ExitStatus::Terminated { code: 0 }) =>
            {
                tracing::debug!(status = %result.exit_status, "Build failed as expected");
            }
            Err(err) => self.fail(
                format!(
                    "`{} build` failed in an unexpected manner:\n\n{err}\n",
                    self.tool.name()
                ),
                location,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::Configuration;
    use crate::here;
    use crate::reporter::FailureLog;
    use crate::test_utils::mocks::{BuildOutcome, MockTool};

    const PKG: &str = "/packages/hello";

    #[test]
    fn test_assert_builds_reports_each_failing_configuration() {
        let tool = MockTool::new()
            .with_build_outcome(Configuration::Debug, BuildOutcome::Exit(101))
            .with_build_outcome(Configuration::Release, BuildOutcome::Exit(101));
        let log = FailureLog::new();
        let check = Assertions::new(&log).with_tool(tool.clone());

        check.assert_builds(Path::new(PKG), &BuildOptions::default(), here!());

        let messages = log.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("'debug'"));
        assert!(messages[1].contains("'release'"));
        assert!(messages[1].contains("exit code 101"));
        assert_eq!(tool.build_calls().len(), 2);
    }

    #[test]
    fn test_assert_builds_continues_after_failure() {
        let tool = MockTool::new().with_build_outcome(Configuration::Debug, BuildOutcome::Exit(1));
        let log = FailureLog::new();
        let check = Assertions::new(&log).with_tool(tool.clone());

        check.assert_builds(Path::new(PKG), &BuildOptions::default(), here!());

        assert_eq!(log.len(), 1);
        let configurations: Vec<_> = tool
            .build_calls()
            .into_iter()
            .map(|call| call.configuration)
            .collect();
        assert_eq!(
            configurations,
            vec![Some(Configuration::Debug), Some(Configuration::Release)]
        );
    }

    #[test]
    fn test_assert_builds_passes_flags_and_env_through() {
        let tool = MockTool::new();
        let log = FailureLog::new();
        let check = Assertions::new(&log).with_tool(tool.clone());
        let options = BuildOptions::new()
            .with_configurations(["release"])
            .with_cc_flag("-DX")
            .with_linker_flag("-lm")
            .with_compiler_flag("-Dwarnings")
            .with_env("RUST_BACKTRACE", "1");

        check.assert_builds(Path::new(PKG), &options, here!());

        log.assert_clean();
        let calls = tool.build_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].cc_flags, vec!["-DX"]);
        assert_eq!(calls[0].linker_flags, vec!["-lm"]);
        assert_eq!(calls[0].compiler_flags, vec!["-Dwarnings"]);
        assert_eq!(
            calls[0].env.as_ref().and_then(|env| env.get("RUST_BACKTRACE")),
            Some(&"1".to_string())
        );
    }

    #[test]
    fn test_assert_builds_reports_at_given_location() {
        let tool =
            MockTool::new().with_build_outcome(Configuration::Release, BuildOutcome::Exit(2));
        let log = FailureLog::new();
        let check = Assertions::new(&log).with_tool(tool);
        let location = Location::new("tests/packages.rs", 42, 9);

        check.assert_builds(Path::new(PKG), &BuildOptions::default(), location);

        assert_eq!(log.failures()[0].location, location);
    }

    #[test]
    fn test_assert_tests_pass() {
        let log = FailureLog::new();
        Assertions::new(&log)
            .with_tool(MockTool::new())
            .assert_tests_pass(Path::new(PKG), None, here!());
        log.assert_clean();

        let failing = MockTool::new().with_test_outcome(BuildOutcome::Exit(101));
        Assertions::new(&log)
            .with_tool(failing)
            .assert_tests_pass(Path::new(PKG), None, here!());
        assert_eq!(log.len(), 1);
        assert!(log.messages()[0].starts_with("`mock test` failed:"));
    }

    #[test]
    fn test_assert_tests_pass_forwards_env() {
        let tool = MockTool::new();
        let log = FailureLog::new();
        let env = HashMap::from([("CI".to_string(), "1".to_string())]);

        Assertions::new(&log)
            .with_tool(tool.clone())
            .assert_tests_pass(Path::new(PKG), Some(&env), here!());

        assert_eq!(tool.test_calls(), vec![Some(env)]);
    }

    #[test]
    fn test_assert_build_fails_decision_table() {
        let cases = [
            (BuildOutcome::Success, Some("succeeded but should have failed")),
            (BuildOutcome::Exit(1), None),
            (BuildOutcome::Exit(101), None),
            (BuildOutcome::Signal(9), None),
            (BuildOutcome::Exit(0), Some("failed in an unexpected manner")),
            (BuildOutcome::SpawnError, Some("failed in an unexpected manner")),
            (BuildOutcome::InvalidPackage, Some("failed in an unexpected manner")),
        ];

        for (outcome, expected) in cases {
            let tool = MockTool::new().with_default_build_outcome(outcome.clone());
            let log = FailureLog::new();
            Assertions::new(&log).with_tool(tool).assert_build_fails(
                Path::new(PKG),
                &BuildOptions::default(),
                here!(),
            );

            match expected {
                Some(text) => {
                    assert_eq!(log.len(), 1, "outcome {outcome:?}");
                    assert!(log.messages()[0].contains(text), "outcome {outcome:?}");
                }
                None => assert!(log.is_empty(), "outcome {outcome:?}"),
            }
        }
    }

    #[test]
    fn test_assert_build_fails_uses_default_configuration() {
        let tool = MockTool::new().with_default_build_outcome(BuildOutcome::Exit(101));
        let log = FailureLog::new();
        Assertions::new(&log).with_tool(tool.clone()).assert_build_fails(
            Path::new(PKG),
            &BuildOptions::default(),
            here!(),
        );

        let calls = tool.build_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].configuration, None);
    }

    #[test]
    fn test_assert_build_fails_forwards_flags_and_env() {
        let tool = MockTool::new().with_default_build_outcome(BuildOutcome::Exit(101));
        let log = FailureLog::new();
        let options = BuildOptions::new()
            .with_cc_flag("-DBROKEN")
            .with_linker_flag("-lmissing")
            .with_compiler_flag("-Dwarnings")
            .with_env("CARGO_TERM_COLOR", "never");

        Assertions::new(&log)
            .with_tool(tool.clone())
            .assert_build_fails(Path::new(PKG), &options, here!());

        log.assert_clean();
        let calls = tool.build_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].cc_flags, vec!["-DBROKEN"]);
        assert_eq!(calls[0].linker_flags, vec!["-lmissing"]);
        assert_eq!(calls[0].compiler_flags, vec!["-Dwarnings"]);
        assert_eq!(
            calls[0].env.as_ref().and_then(|env| env.get("CARGO_TERM_COLOR")),
            Some(&"never".to_string())
        );
    }
}
