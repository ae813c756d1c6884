use async_trait::async_trait;
use log::info;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use urlencoding::encode;

use crate::config::AppConfig;
use crate::models::user::UserRecord;
use crate::repositories::UserRepository;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage error: {0}")]
    Backend(String),
}

/// Repository for the birthdays table behind the key-value store's REST API.
/// Records live at `{base}/{table}/{username}`; a 404 on read means absent.
#[derive(Clone)]
pub struct KvHttpRepository {
    client: Client,
    base_url: String,
    table_name: String,
    api_key: Option<String>,
}

impl KvHttpRepository {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            base_url: config.storage_url.trim_end_matches('/').to_string(),
            table_name: config.table_name.clone(),
            api_key: config.storage_api_key.clone(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/{}", self.base_url, self.table_name)
    }

    fn record_url(&self, username: &str) -> String {
        format!("{}/{}", self.table_url(), encode(username))
    }

    fn headers(&self) -> reqwest::header::HeaderMap {
        use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(ref key) = self.api_key {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", key)) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }

    /// Probe for the table and create it when absent. Startup convenience for
    /// local mode; production tables are provisioned out of band.
    pub async fn create_table_if_missing(&self) -> Result<(), RepoError> {
        let resp = self
            .client
            .get(self.table_url())
            .headers(self.headers())
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::NOT_FOUND {
            if !status.is_success() {
                let text = resp.text().await.unwrap_or_default();
                return Err(RepoError::Backend(format!("{} -> {}", status.as_u16(), text)));
            }
            return Ok(());
        }

        info!("Table {} does not exist, creating it.", self.table_name);

        let payload = serde_json::json!({
            "table": self.table_name,
            "keyAttribute": "username",
        });

        let resp = self
            .client
            .post(&self.base_url)
            .headers(self.headers())
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(RepoError::Backend(format!("{} -> {}", status.as_u16(), text)));
        }

        Ok(())
    }
}

#[async_trait]
impl UserRepository for KvHttpRepository {
    async fn get(&self, username: &str) -> Result<Option<UserRecord>, RepoError> {
        let resp = self
            .client
            .get(self.record_url(username))
            .headers(self.headers())
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(RepoError::Backend(format!("{} -> {}", status.as_u16(), text)));
        }

        let record: UserRecord = serde_json::from_str(&text)?;
        Ok(Some(record))
    }

    async fn put(&self, record: &UserRecord) -> Result<(), RepoError> {
        let resp = self
            .client
            .put(self.record_url(&record.username))
            .headers(self.headers())
            .json(record)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(RepoError::Backend(format!("{} -> {}", status.as_u16(), text)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mockito::Matcher;

    fn test_config(url: &str) -> AppConfig {
        AppConfig {
            storage_url: url.to_string(),
            storage_api_key: Some("secret".to_string()),
            table_name: "birthdays".to_string(),
            env: "local".to_string(),
            port: 0,
            allowed_origins: String::new(),
        }
    }

    fn repo_for(url: &str) -> KvHttpRepository {
        KvHttpRepository::new(Client::new(), &test_config(url))
    }

    #[tokio::test]
    async fn get_returns_record_when_present() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/birthdays/jane")
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_body(r#"{"username":"jane","dateOfBirth":"2000-03-01"}"#)
            .create_async()
            .await;

        let repo = repo_for(&server.url());
        let record = repo.get("jane").await.unwrap().unwrap();
        assert_eq!(record.username, "jane");
        assert_eq!(
            record.date_of_birth,
            NaiveDate::from_ymd_opt(2000, 3, 1).unwrap()
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn get_maps_404_to_absent() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/birthdays/ghost")
            .with_status(404)
            .create_async()
            .await;

        let repo = repo_for(&server.url());
        assert!(repo.get("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_surfaces_backend_failures() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/birthdays/jane")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let repo = repo_for(&server.url());
        assert!(matches!(
            repo.get("jane").await,
            Err(RepoError::Backend(_))
        ));
    }

    #[tokio::test]
    async fn put_writes_record_under_username_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/birthdays/jane")
            .match_header("authorization", "Bearer secret")
            .match_body(Matcher::Json(serde_json::json!({
                "username": "jane",
                "dateOfBirth": "2000-03-01",
            })))
            .with_status(200)
            .create_async()
            .await;

        let repo = repo_for(&server.url());
        let record = UserRecord {
            username: "jane".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2000, 3, 1).unwrap(),
        };
        repo.put(&record).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn creates_table_when_probe_misses() {
        let mut server = mockito::Server::new_async().await;
        let probe = server
            .mock("GET", "/birthdays")
            .with_status(404)
            .create_async()
            .await;
        let create = server
            .mock("POST", "/")
            .match_body(Matcher::Json(serde_json::json!({
                "table": "birthdays",
                "keyAttribute": "username",
            })))
            .with_status(201)
            .create_async()
            .await;

        let repo = repo_for(&server.url());
        repo.create_table_if_missing().await.unwrap();
        probe.assert_async().await;
        create.assert_async().await;
    }
}
