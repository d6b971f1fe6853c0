use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn headlines_cmd() -> Command {
    let mut cmd = Command::cargo_bin("headlines").unwrap();
    cmd.env("HEADLINES_LOG", "warn");
    cmd
}

fn rss(ids: &[&str]) -> String {
    let items: String = ids
        .iter()
        .map(|id| {
            format!(
                "<item><title>Story {id}</title><link>https://news.example.com/{id}</link></item>"
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>World News</title>
    <link>https://news.example.com/</link>
    <description>Latest stories</description>
    {items}
  </channel>
</rss>"#
    )
}

fn write_payload(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_help_lists_commands() {
    headlines_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("diff"))
        .stdout(predicate::str::contains("show"));
}

#[test]
fn test_run_help_shows_polling_flags() {
    headlines_cmd()
        .arg("run")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--polls"))
        .stdout(predicate::str::contains("--interval"))
        .stdout(predicate::str::contains("--headline-as-id"));
}

mod diff {
    use super::*;

    #[test]
    fn test_diff_prints_new_headlines() {
        let temp_dir = TempDir::new().unwrap();
        let baseline = write_payload(temp_dir.path(), "old.xml", &rss(&["a", "b"]));
        let current = write_payload(temp_dir.path(), "new.xml", &rss(&["c", "a", "b"]));

        headlines_cmd()
            .arg("diff")
            .arg(&baseline)
            .arg(&current)
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "+ Story c https://news.example.com/c",
            ))
            .stdout(predicate::str::contains("Story a").not());
    }

    #[test]
    fn test_diff_identical_payloads() {
        let temp_dir = TempDir::new().unwrap();
        let payload = rss(&["a", "b"]);
        let baseline = write_payload(temp_dir.path(), "old.xml", &payload);
        let current = write_payload(temp_dir.path(), "new.xml", &payload);

        headlines_cmd()
            .arg("diff")
            .arg(&baseline)
            .arg(&current)
            .assert()
            .success()
            .stdout(predicate::str::contains("No new headlines."));
    }

    #[test]
    fn test_diff_applies_boundary_rule() {
        let temp_dir = TempDir::new().unwrap();
        let baseline = write_payload(temp_dir.path(), "old.xml", &rss(&["a", "b", "c"]));
        let current = write_payload(temp_dir.path(), "new.xml", &rss(&["x", "a", "y", "b"]));

        headlines_cmd()
            .arg("diff")
            .arg(&baseline)
            .arg(&current)
            .assert()
            .success()
            .stdout(predicate::str::contains("+ Story x"))
            .stdout(predicate::str::contains("Story y").not());
    }

    #[test]
    fn test_diff_json_output() {
        let temp_dir = TempDir::new().unwrap();
        let baseline = write_payload(temp_dir.path(), "old.xml", &rss(&["a"]));
        let current = write_payload(temp_dir.path(), "new.xml", &rss(&["b", "a"]));

        headlines_cmd()
            .arg("diff")
            .arg(&baseline)
            .arg(&current)
            .arg("--json")
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""headline": "Story b""#))
            .stdout(predicate::str::contains(r#""identity": "https://news.example.com/b""#));
    }

    #[test]
    fn test_diff_rejects_malformed_payload() {
        let temp_dir = TempDir::new().unwrap();
        let baseline = write_payload(temp_dir.path(), "old.xml", &rss(&["a"]));
        let current = write_payload(temp_dir.path(), "new.xml", "<html>503</html>");

        headlines_cmd()
            .arg("diff")
            .arg(&baseline)
            .arg(&current)
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid payload"));
    }

    #[test]
    fn test_diff_ignores_invalid_run_settings() {
        let temp_dir = TempDir::new().unwrap();
        let baseline = write_payload(temp_dir.path(), "old.xml", &rss(&["a"]));
        let current = write_payload(temp_dir.path(), "new.xml", &rss(&["b", "a"]));

        headlines_cmd()
            .arg("diff")
            .arg(&baseline)
            .arg(&current)
            .env("HEADLINES_TIMEOUT_SECS", "soon")
            .env("HEADLINES_CACHE_BACKEND", "redis")
            .assert()
            .success()
            .stdout(predicate::str::contains("+ Story b"));
    }

    #[test]
    fn test_diff_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let current = write_payload(temp_dir.path(), "new.xml", &rss(&["a"]));

        headlines_cmd()
            .arg("diff")
            .arg(temp_dir.path().join("missing.xml"))
            .arg(&current)
            .assert()
            .failure()
            .stderr(predicate::str::contains("could not read baseline payload"));
    }
}

mod show {
    use super::*;

    #[test]
    fn test_show_prints_link_identities() {
        let temp_dir = TempDir::new().unwrap();
        let payload = rss(&["a"]).replace("https://news.example.com/a", "HTTPS://News.Example.com:443/a");
        let path = write_payload(temp_dir.path(), "feed.xml", &payload);

        headlines_cmd()
            .arg("show")
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::contains("https://news.example.com/a  Story a"));
    }

    #[test]
    fn test_show_headline_identities() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_payload(temp_dir.path(), "feed.xml", &rss(&["a"]));

        headlines_cmd()
            .arg("show")
            .arg(&path)
            .arg("--headline-as-id")
            .assert()
            .success()
            .stdout(predicate::str::is_match(r"^[0-9a-f]{32}  Story a\n$").unwrap());
    }

    #[test]
    fn test_show_reads_identity_mode_from_env_despite_bad_timeout() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_payload(temp_dir.path(), "feed.xml", &rss(&["a"]));

        headlines_cmd()
            .arg("show")
            .arg(&path)
            .env("HEADLINES_USE_HEADLINE_AS_ID", "true")
            .env("HEADLINES_TIMEOUT_SECS", "0")
            .assert()
            .success()
            .stdout(predicate::str::is_match(r"^[0-9a-f]{32}  Story a\n$").unwrap());
    }
}

mod run {
    use super::*;

    #[test]
    fn test_run_with_unreachable_feed_still_succeeds() {
        let temp_dir = TempDir::new().unwrap();

        headlines_cmd()
            .arg("run")
            .arg("--name")
            .arg("news")
            .arg("--url")
            .arg("ftp://news.example.com/feed.xml")
            .env("HEADLINES_CACHE_DIR", temp_dir.path())
            .env("HEADLINES_CACHE_BACKEND", "file")
            .assert()
            .success()
            .stdout(predicate::str::contains("Reported 0 new headlines."));

        // Nothing was refreshed, so nothing is cached
        assert!(!temp_dir.path().join("news.xml").exists());
    }

    #[test]
    fn test_run_restores_cached_baseline() {
        let temp_dir = TempDir::new().unwrap();
        write_payload(temp_dir.path(), "news.xml", &rss(&["a", "b"]));

        headlines_cmd()
            .arg("run")
            .arg("--name")
            .arg("news")
            .arg("--url")
            .arg("ftp://news.example.com/feed.xml")
            .env("HEADLINES_CACHE_DIR", temp_dir.path())
            .env("HEADLINES_CACHE_BACKEND", "file")
            .assert()
            .success()
            .stdout(predicate::str::contains("Restored 2 known headlines for news"));

        // The replayed payload is written back on shutdown
        let cached = fs::read_to_string(temp_dir.path().join("news.xml")).unwrap();
        assert!(cached.contains("Story a"));
    }

    #[test]
    fn test_run_rejects_unknown_cache_backend() {
        let temp_dir = TempDir::new().unwrap();

        headlines_cmd()
            .arg("run")
            .arg("--name")
            .arg("news")
            .arg("--url")
            .arg("https://news.example.com/feed.xml")
            .env("HEADLINES_CACHE_DIR", temp_dir.path())
            .env("HEADLINES_CACHE_BACKEND", "redis")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown cache backend"));
    }
}
