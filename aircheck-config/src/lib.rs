//! Loader for harvester configuration with YAML + environment overlays.
//!
//! `aircheck.yaml` carries three sections: `search` (the listing API),
//! `fetch` (article download policy) and `output` (persistence locations).
//! Any value may reference `${VAR}`; expansion happens after the `config`
//! crate merges file and `AIRCHECK__`-prefixed environment sources.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Deserialize)]
pub struct AircheckConfig {
    pub version: Option<String>,
    pub search: SearchConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    pub output: OutputConfig,
}

/// Listing API parameters: where to page and how fast.
#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    pub base_url: String,
    /// Site section the listing is scoped to, e.g. "transcript".
    pub section: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

/// Article download policy (retries, pacing, identification).
#[derive(Debug, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_retries")]
    pub retries: usize,
    /// Fixed delay between retry attempts, in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Pause between consecutive articles, in milliseconds.
    #[serde(default = "default_article_delay_ms")]
    pub article_delay_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            retries: default_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            article_delay_ms: default_article_delay_ms(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// The three persistence sinks, one directory per representation.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    pub html_dir: String,
    pub text_dir: String,
    pub json_dir: String,
}

fn default_page_size() -> u32 {
    30
}
fn default_max_pages() -> u32 {
    10
}
fn default_retries() -> usize {
    3
}
fn default_retry_delay_ms() -> u64 {
    2_000
}
fn default_article_delay_ms() -> u64 {
    1_000
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_user_agent() -> String {
    // A plain reqwest UA gets blocked outright by the transcript host.
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/124.0.0.0 Safari/537.36"
        .into()
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct AircheckConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for AircheckConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AircheckConfigLoader {
    /// Start with sensible defaults: YAML file + `AIRCHECK__` env overrides.
    ///
    /// ```
    /// use aircheck_config::AircheckConfigLoader;
    ///
    /// let config = AircheckConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// version: '1'
    /// search:
    ///   base_url: "https://example.com/api/article-search"
    ///   section: "transcript"
    /// output:
    ///   html_dir: "out/html"
    ///   text_dir: "out/text"
    ///   json_dir: "out/json"
    /// "#,
    ///     )
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.search.page_size, 30);
    /// ```
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(Environment::with_prefix("AIRCHECK").separator("__"));
        Self { builder }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self.builder.add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// `${VAR}` placeholders are expanded after merging, so secrets can live
    /// in the environment while paths and endpoints live in the file.
    pub fn load(self) -> Result<AircheckConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: AircheckConfig =
            serde_json::from_value(v).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use temp_env;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("FOO", Some("bar"), || {
            let mut v = json!("prefix-${FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars([("OUT", Some("archive")), ("YEAR", Some("2024"))], || {
            let mut v = json!([
                "texts-$OUT",
                { "dir": "${OUT}/${YEAR}" },
                42,
                true,
                null
            ]);
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!(["texts-archive", { "dir": "archive/2024" }, 42, true, null])
            );
        });
    }

    #[test]
    fn expands_recursively_across_env_values() {
        temp_env::with_vars(
            [
                ("ROOT", Some("/srv/aircheck")),
                ("DATA", Some("${ROOT}/data")),
                ("JSON", Some("${DATA}/json")),
            ],
            || {
                let mut v = json!("${JSON}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("/srv/aircheck/data/json"));
            },
        );
    }

    #[test]
    fn leaves_unknown_vars_untouched() {
        let mut v = json!("${AIRCHECK_DOES_NOT_EXIST_XYZ}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("${AIRCHECK_DOES_NOT_EXIST_XYZ}"));
    }
}
