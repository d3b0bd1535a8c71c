// tests/subprocess_runner.rs
//
// Runs real processes through `sh`, so these only build on unix.
#![cfg(unix)]

use std::error::Error;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use tempfile::TempDir;

use feedbridge::config::LocatorSection;
use feedbridge::errors::FeedbridgeError;
use feedbridge::exec::{run_subprocess, ProcessRunner, RealProcessRunner};
use feedbridge::fs::RealFileSystem;
use feedbridge::locate::{Located, Locator};
use feedbridge::session::{run_discovery, DiscoveryOutcome, DiscoveryRequest};

type TestResult = Result<(), Box<dyn Error>>;

fn sh(script: &str) -> Vec<String> {
    vec!["-c".to_string(), script.to_string()]
}

#[test]
fn test_captures_exit_status_and_both_streams() -> TestResult {
    let result = run_subprocess(
        &Located::SearchPath("sh".to_string()),
        &sh("echo out; echo err >&2; exit 3"),
    )?;

    assert_eq!(result.exit_status, 3);
    assert!(!result.success());
    assert_eq!(result.stdout_lossy(), "out\n");
    assert_eq!(result.stderr_lossy(), "err\n");
    Ok(())
}

#[test]
fn test_stdin_is_closed() -> TestResult {
    // `cat` would block forever on an inherited terminal.
    let result = RealProcessRunner.run(&Located::SearchPath("cat".to_string()), &[])?;

    assert!(result.success());
    assert!(result.stdout.is_empty());
    Ok(())
}

#[test]
fn test_missing_program_is_a_launch_error() {
    let missing = Located::Path(PathBuf::from("/definitely/not/here/html2rss"));

    match run_subprocess(&missing, &[]) {
        Err(FeedbridgeError::Launch { program, .. }) => {
            assert_eq!(program, "/definitely/not/here/html2rss");
        }
        other => panic!("Expected Launch error, got: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_discovery_against_real_helper_script() -> TestResult {
    let tmp = TempDir::new()?;
    let feeds_file = tmp.path().join("config").join("local_feeds");
    fs::create_dir_all(feeds_file.parent().unwrap())?;

    let helper = tmp.path().join("bin").join("fakehelper");
    fs::create_dir_all(helper.parent().unwrap())?;
    fs::write(
        &helper,
        format!(
            "#!/bin/sh\n\
             [ \"$1\" = \"--query\" ] || exit 2\n\
             echo \"Found feed: $2/rss\"\n\
             echo \"Found feed: $2/atom\"\n\
             printf '%s\\n%s\\n' \"$2/rss\" \"$2/atom\" > '{}'\n",
            feeds_file.display()
        ),
    )?;
    fs::set_permissions(&helper, fs::Permissions::from_mode(0o755))?;

    let locator = Locator::new(
        std::sync::Arc::new(RealFileSystem),
        LocatorSection {
            dev_tree: vec![],
            build_output: None,
            install_bindir: Some(tmp.path().join("bin")),
            system_dirs: vec![],
        },
    );
    let request = DiscoveryRequest {
        helper_name: "fakehelper".to_string(),
        query_flag: "--query".to_string(),
        query: "https://site.test".to_string(),
        feeds_file: Some(feeds_file.clone()),
    };
    fs::write(&feeds_file, "https://stale.test/rss\n")?;

    let outcome = run_discovery(&locator, &RealProcessRunner, &RealFileSystem, &request)?;

    match outcome {
        DiscoveryOutcome::Completed { reported, feeds } => {
            assert_eq!(reported, 2);
            assert_eq!(feeds.urls(), ["https://site.test/rss", "https://site.test/atom"]);
        }
        other => panic!("Expected Completed, got: {:?}", other),
    }
    Ok(())
}

#[test]
fn test_discovery_with_unlaunchable_helper() -> TestResult {
    let locator = Locator::new(
        std::sync::Arc::new(RealFileSystem),
        LocatorSection {
            dev_tree: vec![],
            build_output: None,
            install_bindir: None,
            system_dirs: vec![],
        },
    );
    let request = DiscoveryRequest {
        helper_name: "feedbridge-no-such-helper".to_string(),
        query_flag: "--query".to_string(),
        query: "https://site.test".to_string(),
        feeds_file: None,
    };

    let outcome = run_discovery(&locator, &RealProcessRunner, &RealFileSystem, &request)?;

    match &outcome {
        DiscoveryOutcome::LaunchFailed { .. } => {
            let message = outcome.message("feedbridge-no-such-helper");
            assert!(message.text.starts_with("Could not run feedbridge-no-such-helper: "));
        }
        other => panic!("Expected LaunchFailed, got: {:?}", other),
    }
    Ok(())
}
