use aircheck_config::AircheckConfigLoader;
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
version: "0.1"
search:
  base_url: "https://www.example.com/api/article-search"
  section: "transcript"
  page_size: 30
  max_pages: 5
fetch:
  retries: 3
  retry_delay_ms: 500
  user_agent: "Mozilla/5.0 (test)"
output:
  html_dir: "${TRANSCRIPTS_OUT}/html"
  text_dir: "${TRANSCRIPTS_OUT}/text"
  json_dir: "${TRANSCRIPTS_OUT}/json"
  "#;
    let p = write_yaml(&tmp, "aircheck.yaml", file_yaml);

    temp_env::with_var("TRANSCRIPTS_OUT", Some("/tmp/aircheck"), || {
        let config = AircheckConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load harvester config");

        assert_eq!(config.search.section, "transcript");
        assert_eq!(config.search.max_pages, 5);
        assert_eq!(config.fetch.retries, 3);
        assert_eq!(config.output.json_dir, "/tmp/aircheck/json");
    });
}

#[test]
#[serial]
fn test_fetch_section_is_optional() {
    let config = AircheckConfigLoader::new()
        .with_yaml_str(
            r#"
search:
  base_url: "https://www.example.com/api/article-search"
  section: "transcript"
output:
  html_dir: "out/html"
  text_dir: "out/text"
  json_dir: "out/json"
"#,
        )
        .load()
        .expect("load with defaulted fetch section");

    assert_eq!(config.fetch.retries, 3);
    assert_eq!(config.fetch.retry_delay_ms, 2_000);
    assert!(config.fetch.user_agent.starts_with("Mozilla/5.0"));
}
