mod common;
use crate::common::builders::ConfigFileBuilder;
use crate::common::init_tracing;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use proptest::prelude::*;

use feedbridge::config::ConfigFile;
use feedbridge::fs::mock::{MockFileSystem, ProbeKind};
use feedbridge::locate::{case_variants, expand_template, Located, Locator};

type TestResult = Result<(), Box<dyn Error>>;

fn exe(path: &str) -> PathBuf {
    PathBuf::from(format!("{}{}", path, std::env::consts::EXE_SUFFIX))
}

fn layered_config() -> ConfigFile {
    ConfigFileBuilder::new()
        .helper_name("helper")
        .dev_tree("dev/{name}/release/{name}")
        .dev_tree("dev/{name}/debug/{name}")
        .build_output("build/{name}")
        .install_bindir("/opt/feedbridge/bin")
        .system_dir("/usr/local/bin")
        .system_dir("/usr/bin")
        .build()
}

#[test]
fn test_candidate_order_is_dev_build_bindir_system() {
    let cfg = layered_config();
    let locator = Locator::from_config(&cfg, Arc::new(MockFileSystem::new()));

    assert_eq!(
        locator.candidates("helper"),
        vec![
            exe("dev/helper/release/helper"),
            exe("dev/helper/debug/helper"),
            exe("build/helper"),
            exe("/opt/feedbridge/bin/helper"),
            exe("/opt/feedbridge/bin/Helper"),
            exe("/usr/local/bin/helper"),
            exe("/usr/local/bin/Helper"),
            exe("/usr/bin/helper"),
            exe("/usr/bin/Helper"),
        ]
    );
}

#[test]
fn test_first_match_wins_and_later_candidates_are_not_probed() -> TestResult {
    init_tracing();

    let cfg = layered_config();
    let fs = MockFileSystem::new();
    fs.add_file(exe("build/helper"), "binary");
    fs.add_file(exe("/usr/bin/helper"), "binary");

    let locator = Locator::from_config(&cfg, Arc::new(fs.clone()));
    let located = locator.locate("helper");

    assert_eq!(located, Located::Path(exe("build/helper")));
    assert_eq!(
        fs.probed_paths(),
        vec![
            exe("dev/helper/release/helper"),
            exe("dev/helper/debug/helper"),
            exe("build/helper"),
        ]
    );
    Ok(())
}

#[test]
fn test_directory_is_not_accepted_as_helper() {
    let cfg = layered_config();
    let fs = MockFileSystem::new();
    fs.add_dir(exe("dev/helper/release/helper"));
    fs.add_file(exe("/opt/feedbridge/bin/Helper"), "binary");

    let located = Locator::from_config(&cfg, Arc::new(fs.clone())).locate("helper");

    assert_eq!(located, Located::Path(exe("/opt/feedbridge/bin/Helper")));

    // The directory exists, so it was also checked for being a regular file.
    let dir_probes: Vec<ProbeKind> = fs
        .probes()
        .into_iter()
        .filter(|(_, path)| *path == exe("dev/helper/release/helper"))
        .map(|(kind, _)| kind)
        .collect();
    assert_eq!(dir_probes, vec![ProbeKind::Exists, ProbeKind::IsFile]);
}

#[test]
fn test_no_match_falls_back_to_search_path() {
    let cfg = layered_config();
    let fs = MockFileSystem::new();
    let locator = Locator::from_config(&cfg, Arc::new(fs.clone()));

    let located = locator.locate("helper");

    assert_eq!(located, Located::SearchPath("helper".to_string()));
    assert!(located.is_search_path());
    assert_eq!(located.path(), None);
    assert_eq!(located.to_string(), "helper (via PATH)");
    assert_eq!(fs.probed_paths(), locator.candidates("helper"));
}

#[test]
fn test_case_variants() {
    assert_eq!(case_variants("html2rss"), vec!["html2rss", "Html2rss"]);
    assert_eq!(case_variants("Helper"), vec!["Helper"]);
    assert_eq!(case_variants("2fa"), vec!["2fa"]);
}

#[test]
fn test_expand_template_substitutes_every_occurrence() {
    assert_eq!(
        expand_template("tools/{name}/target/release/{name}", "html2rss"),
        exe("tools/html2rss/target/release/html2rss")
    );
}

proptest! {
    #[test]
    fn test_locate_returns_first_existing_candidate(
        present in proptest::collection::vec(any::<bool>(), 9)
    ) {
        let cfg = layered_config();
        let fs = MockFileSystem::new();
        let locator = Locator::from_config(&cfg, Arc::new(fs.clone()));
        let candidates = locator.candidates("helper");
        prop_assert_eq!(candidates.len(), present.len());

        for (candidate, &exists) in candidates.iter().zip(&present) {
            if exists {
                fs.add_file(candidate, "binary");
            }
        }

        let located = locator.locate("helper");
        match present.iter().position(|&p| p) {
            Some(first) => {
                prop_assert_eq!(located, Located::Path(candidates[first].clone()));
                prop_assert_eq!(fs.probed_paths(), candidates[..=first].to_vec());
            }
            None => {
                prop_assert_eq!(located, Located::SearchPath("helper".to_string()));
                prop_assert_eq!(fs.probed_paths(), candidates);
            }
        }
    }
}
