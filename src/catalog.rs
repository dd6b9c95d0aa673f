use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Bundled snapshot of the portfolio data. Used when no catalog URL is
/// configured, or when the fetch fails.
const EMBEDDED_PROJECTS: &str = include_str!("../data/projects.json");

pub const DEFAULT_CATEGORY: &str = "Other";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProjectRecord {
    pub title: String,
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Where project records come from: an optional remote JSON document, with
/// the embedded snapshot as the fallback.
#[derive(Clone)]
pub struct CatalogSource {
    client: Client,
    url: Option<String>,
    embedded: Option<&'static str>,
}

impl CatalogSource {
    pub fn new(url: Option<String>) -> Self {
        Self::with_embedded(url, Some(EMBEDDED_PROJECTS))
    }

    pub fn with_embedded(url: Option<String>, embedded: Option<&'static str>) -> Self {
        Self {
            client: Client::new(),
            url,
            embedded,
        }
    }

    /// Load the catalog, degrading from the remote document to the embedded
    /// snapshot and finally to an empty list. Never fails; every fallback
    /// step is logged and otherwise invisible to callers.
    pub async fn load(&self) -> Vec<ProjectRecord> {
        if let Some(url) = &self.url {
            match self.fetch(url).await {
                Ok(records) => return records,
                Err(err) => log::warn!("catalog fetch from {url} failed: {err}"),
            }
        }

        match self.embedded {
            Some(raw) => match serde_json::from_str(raw) {
                Ok(records) => records,
                Err(err) => {
                    log::warn!("embedded catalog is not valid JSON: {err}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<ProjectRecord>> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("catalog request returned {}", response.status()));
        }

        Ok(response.json().await?)
    }
}

/// Category names in first-seen record order.
pub fn categories(records: &[ProjectRecord]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for record in records {
        if !names.contains(&record.category) {
            names.push(record.category.clone());
        }
    }
    names
}

/// Records belonging to one category, preserving input order.
pub fn in_category(records: &[ProjectRecord], category: &str) -> Vec<ProjectRecord> {
    records
        .iter()
        .filter(|record| record.category == category)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, category: &str) -> ProjectRecord {
        ProjectRecord {
            title: title.to_string(),
            description: String::new(),
            category: category.to_string(),
            tags: Vec::new(),
            url: None,
            icon: None,
        }
    }

    #[test]
    fn optional_fields_default_when_absent() {
        let parsed: ProjectRecord =
            serde_json::from_str(r#"{"title": "Suite", "description": "E2E checks"}"#)
                .expect("minimal record should deserialize");

        assert_eq!(parsed.category, DEFAULT_CATEGORY);
        assert!(parsed.tags.is_empty());
        assert!(parsed.url.is_none());
        assert!(parsed.icon.is_none());
    }

    #[test]
    fn embedded_snapshot_is_valid() {
        let records: Vec<ProjectRecord> =
            serde_json::from_str(EMBEDDED_PROJECTS).expect("bundled data should deserialize");
        assert!(!records.is_empty());
    }

    #[test]
    fn categories_preserve_first_seen_order() {
        let records = vec![
            record("a", "Automation"),
            record("b", "Manual Testing"),
            record("c", "Automation"),
            record("d", "Tooling"),
        ];

        assert_eq!(
            categories(&records),
            vec!["Automation", "Manual Testing", "Tooling"]
        );
        assert_eq!(in_category(&records, "Automation").len(), 2);
    }

    #[tokio::test]
    async fn load_falls_back_to_embedded_snapshot() {
        let source = CatalogSource::with_embedded(None, Some(r#"[{"title":"t","description":"d"}]"#));
        let records = source.load().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "t");
    }

    #[tokio::test]
    async fn load_is_empty_when_no_source_exists() {
        let source = CatalogSource::with_embedded(None, None);
        assert!(source.load().await.is_empty());
    }

    #[tokio::test]
    async fn load_is_empty_when_embedded_snapshot_is_corrupt() {
        let source = CatalogSource::with_embedded(None, Some("not json"));
        assert!(source.load().await.is_empty());
    }
}
