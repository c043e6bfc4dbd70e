//! The harvest loop: listing → fetch → extract → persist.
//!
//! One failed article never aborts the batch; it is logged with its URL and
//! skipped. A fixed politeness delay separates consecutive article fetches.

use std::time::Duration;

use aircheck_config::AircheckConfig;
use aircheck_extract::extract_transcript;
use aircheck_http::{HttpClient, RequestOpts};
use aircheck_search::{ArticleMeta, ListingClient};
use aircheck_store::{ArticleStore, SaveOutcome};
use anyhow::{Context, Result};
use futures::StreamExt;

/// Counters for one harvest run.
#[derive(Debug, Default, Clone, Copy)]
pub struct HarvestReport {
    pub listed: usize,
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct Pipeline {
    listing: ListingClient,
    fetcher: HttpClient,
    store: ArticleStore,
    max_pages: u32,
    article_delay: Duration,
}

impl Pipeline {
    pub fn from_config(cfg: &AircheckConfig, max_pages_override: Option<u32>) -> Result<Self> {
        let fetcher = HttpClient::with_user_agent(&cfg.search.base_url, &cfg.fetch.user_agent)
            .context("building article fetcher")?
            .with_timeout(Duration::from_secs(cfg.fetch.timeout_secs))
            .with_retries(cfg.fetch.retries)
            .with_retry_delay(Duration::from_millis(cfg.fetch.retry_delay_ms));

        let listing = ListingClient::new(
            &cfg.search.base_url,
            &cfg.search.section,
            cfg.search.page_size,
        )
        .context("building listing client")?
        .with_http(fetcher.clone());

        let store = ArticleStore::new(
            &cfg.output.html_dir,
            &cfg.output.text_dir,
            &cfg.output.json_dir,
        );
        store.ensure_dirs().context("creating output directories")?;

        Ok(Self {
            listing,
            fetcher,
            store,
            max_pages: max_pages_override.unwrap_or(cfg.search.max_pages),
            article_delay: Duration::from_millis(cfg.fetch.article_delay_ms),
        })
    }

    pub async fn run(&self) -> Result<HarvestReport> {
        let mut report = HarvestReport::default();
        let mut stream = self.listing.listing_stream(self.max_pages);

        while let Some(item) = stream.next().await {
            let meta = match item {
                Ok(meta) => meta,
                Err(err) => {
                    // A broken listing page ends the run; articles already
                    // processed stay persisted.
                    tracing::error!(target: "pipeline", error = %err, "listing failed");
                    break;
                }
            };
            report.listed += 1;

            match self.process_article(&meta).await {
                Ok(SaveOutcome::Written(stem)) => {
                    report.written += 1;
                    tracing::info!(target: "pipeline", %stem, url = %meta.url, "article written");
                }
                Ok(SaveOutcome::SkippedExisting(stem)) => {
                    report.skipped += 1;
                    tracing::info!(target: "pipeline", %stem, "article skipped");
                }
                Err(err) => {
                    report.failed += 1;
                    tracing::warn!(
                        target: "pipeline",
                        url = %meta.url,
                        error = %err,
                        "article failed"
                    );
                }
            }

            tokio::time::sleep(self.article_delay).await;
        }

        Ok(report)
    }

    async fn process_article(&self, meta: &ArticleMeta) -> Result<SaveOutcome> {
        let opts = RequestOpts {
            allow_absolute: true,
            ..Default::default()
        };
        let html = self
            .fetcher
            .get_text(&meta.url, opts)
            .await
            .with_context(|| format!("fetching {}", meta.url))?;

        // Extraction never fails; an unrecognized layout just yields an
        // empty transcript, which is still persisted (prune handles those).
        let transcript = extract_transcript(&html, &meta.title);
        tracing::debug!(
            target: "pipeline",
            url = %meta.url,
            utterances = transcript.utterances.len(),
            "article extracted"
        );

        let outcome = self
            .store
            .save(&transcript, meta.publication_date.date_naive())
            .with_context(|| format!("persisting {}", meta.title))?;
        Ok(outcome)
    }
}
