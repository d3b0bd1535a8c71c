mod common;
use crate::common::builders::{ConfigFileBuilder, TEST_FEEDS_FILE};

use std::error::Error;
use std::path::{Path, PathBuf};

use proptest::prelude::*;
use tempfile::TempDir;

use feedbridge::config::ConfigFile;
use feedbridge::fs::mock::MockFileSystem;
use feedbridge::fs::{FileSystem, RealFileSystem};
use feedbridge::session::{
    clear_feeds_file, default_feeds_path, read_feeds_file, resolve_feeds_path, write_feeds_file,
    DiscoveredFeedSet, FEEDS_FILE_NAME,
};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn test_parse_skips_blank_lines_and_trims() {
    let set = DiscoveredFeedSet::parse("https://a.test/rss\n\n   \n  https://b.test/atom  \r\n");

    assert_eq!(set.urls(), ["https://a.test/rss", "https://b.test/atom"]);
    assert_eq!(set.first(), Some("https://a.test/rss"));
    assert_eq!(set.len(), 2);
}

#[test]
fn test_real_fs_round_trip_creates_parent_dirs() -> TestResult {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("feedbridge").join(FEEDS_FILE_NAME);
    let fs = RealFileSystem;
    let urls = vec!["https://a.test/rss".to_string(), "https://b.test/atom".to_string()];

    write_feeds_file(&fs, &path, &urls)?;
    let read = read_feeds_file(&fs, &path)?;

    assert_eq!(read.into_vec(), urls);
    Ok(())
}

#[test]
fn test_missing_file_reads_as_empty_set() -> TestResult {
    let tmp = TempDir::new()?;
    let path = tmp.path().join(FEEDS_FILE_NAME);

    let read = read_feeds_file(&RealFileSystem, &path)?;

    assert!(read.is_empty());
    Ok(())
}

#[test]
fn test_clear_removes_file_and_tolerates_absence() -> TestResult {
    let tmp = TempDir::new()?;
    let path = tmp.path().join(FEEDS_FILE_NAME);
    let fs = RealFileSystem;

    write_feeds_file(&fs, &path, &["https://a.test/rss".to_string()])?;
    clear_feeds_file(&fs, &path)?;
    assert!(!fs.exists(&path));

    clear_feeds_file(&fs, &path)?;
    Ok(())
}

#[test]
fn test_clear_refuses_to_remove_a_directory() {
    let fs = MockFileSystem::new();
    fs.add_dir("/cfg/feedbridge/local_feeds");

    assert!(clear_feeds_file(&fs, Path::new("/cfg/feedbridge/local_feeds")).is_err());
}

#[test]
fn test_feeds_path_override_and_default() {
    let cfg = ConfigFileBuilder::new().build();
    assert_eq!(resolve_feeds_path(&cfg), Some(PathBuf::from(TEST_FEEDS_FILE)));

    let defaults = ConfigFile::default();
    assert_eq!(resolve_feeds_path(&defaults), default_feeds_path("feedbridge"));
    if let Some(path) = default_feeds_path("feedbridge") {
        assert!(path.ends_with("feedbridge/local_feeds"));
    }
}

proptest! {
    #[test]
    fn test_written_urls_read_back_in_order(
        urls in proptest::collection::vec("https://[a-z]{1,12}\\.test/[a-z0-9/]{0,20}", 0..8)
    ) {
        let fs = MockFileSystem::new();
        let path = Path::new("/cfg/feedbridge/local_feeds");

        write_feeds_file(&fs, path, &urls).unwrap();
        let read = read_feeds_file(&fs, path).unwrap();

        prop_assert_eq!(read.into_vec(), urls);
    }
}

proptest! {
    #[test]
    fn test_parse_keeps_only_non_blank_urls_in_order(
        lines in proptest::collection::vec(
            (
                "https://[a-z]{1,12}\\.test/[a-z0-9/]{0,20}",
                proptest::sample::select(vec!["", " ", "\t", "  \t ", "\r"]),
                proptest::sample::select(vec!["", " ", "  "]),
            ),
            0..8,
        )
    ) {
        let mut text = String::new();
        for (url, blank, pad) in &lines {
            text.push_str(blank);
            text.push('\n');
            text.push_str(&format!("{pad}{url}{pad}\n"));
        }
        let expected: Vec<String> = lines.iter().map(|(url, _, _)| url.clone()).collect();

        let set = DiscoveredFeedSet::parse(&text);

        prop_assert_eq!(set.len(), expected.len());
        prop_assert_eq!(set.into_vec(), expected);
    }
}
