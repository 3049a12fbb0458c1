use anyhow::{Context, Result};
use reqwest::Client;
use tracing::debug;

use crate::models::AuditRecord;

/// Minimal Supabase config used by the audit helpers.
#[derive(Clone, Debug)]
pub struct SupabaseCfg {
    pub url: String,   // project URL, e.g. https://xyz.supabase.co
    pub key: String,   // service or anon key
    pub table: String, // target table name
}

#[derive(Debug)]
pub struct Supabase {
    client: Client,
    url: String,
    key: String,
    table: String,
}

impl Supabase {
    pub fn new(cfg: &SupabaseCfg) -> Result<Self> {
        if cfg.url.is_empty() || cfg.key.is_empty() {
            anyhow::bail!("SUPABASE_URL and SUPABASE_KEY must be set to log issues");
        }

        Ok(Self {
            client: Client::new(),
            url: cfg.url.trim_end_matches('/').to_string(),
            key: cfg.key.clone(),
            table: cfg.table.clone(),
        })
    }

    /// Insert one row through PostgREST. Fire-and-forget: any 2xx counts as
    /// success and nothing is read back.
    pub async fn insert(&self, record: &AuditRecord) -> Result<()> {
        let endpoint = format!("{}/rest/v1/{}", self.url, self.table);

        debug!("Supabase insert into {}", self.table);

        let response = self
            .client
            .post(&endpoint)
            .header("apikey", &self.key)
            .header("Authorization", format!("Bearer {}", self.key))
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await
            .context("Supabase request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Supabase insert failed ({status}): {body}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use wiremock::{
        matchers::{body_partial_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::models::IssueDraft;

    fn record() -> AuditRecord {
        AuditRecord::from_draft(&IssueDraft {
            title: "t".into(),
            body: "b".into(),
            labels: vec!["bug".into()],
        })
    }

    #[tokio::test]
    async fn inserts_into_the_configured_table() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/issues"))
            .and(header("apikey", "sb-test"))
            .and(header("Prefer", "return=minimal"))
            .and(body_partial_json(serde_json::json!({
                "title": "t",
                "labels": ["bug"]
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let supabase = Supabase::new(&SupabaseCfg {
            // trailing slash must not end up doubled in the endpoint
            url: format!("{}/", server.uri()),
            key: "sb-test".into(),
            table: "issues".into(),
        })
        .unwrap();

        supabase.insert(&record()).await.unwrap();
    }

    #[tokio::test]
    async fn non_2xx_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("permission denied"))
            .mount(&server)
            .await;

        let supabase = Supabase::new(&SupabaseCfg {
            url: server.uri(),
            key: "sb-test".into(),
            table: "issues".into(),
        })
        .unwrap();

        let err = supabase.insert(&record()).await.unwrap_err();

        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn requires_url_and_key() {
        let err = Supabase::new(&SupabaseCfg {
            url: String::new(),
            key: String::new(),
            table: "issues".into(),
        })
        .unwrap_err();

        assert!(err.to_string().contains("SUPABASE_URL"));
    }
}
