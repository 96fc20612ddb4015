use anyhow::{Context, Result};
use chrono::Utc;
use log::debug;
use reqwest::{header, Client, Method, StatusCode};

use super::models::Alert;
use super::signing;

const CUSTOMER_DASHBOARD: &str = "https://app.ninjarmm.com/#/customerDashboard/";

/// Where an alert's customer can be inspected by a human.
pub fn customer_dashboard_url(customer_id: i64) -> String {
    format!("{}{}/overview", CUSTOMER_DASHBOARD, customer_id)
}

pub struct NinjaClient {
    host: String,
    access_key_id: String,
    secret: String,
    client: Client,
}

impl NinjaClient {
    pub fn new(
        host: String,
        access_key_id: String,
        secret: String,
        timeout_secs: u64,
        connect_timeout: u64,
    ) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            access_key_id,
            secret,
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .connect_timeout(std::time::Duration::from_secs(connect_timeout))
                .build()
                .expect("Failed to build monitoring HTTP client"),
        }
    }

    /// Alerts newer than the watermark. Upstream gives no ordering promise
    /// for the batch, only the `since` filter.
    pub async fn alerts_since(&self, cursor: i64) -> Result<Vec<Alert>> {
        let resource = format!("/v1/alerts/since/{}", cursor);
        let res = self
            .signed_request(Method::GET, &resource)?
            .send()
            .await
            .with_context(|| format!("Failed to fetch alerts since {}", cursor))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Monitoring API error {}: {}", status, body));
        }

        res.json::<Vec<Alert>>()
            .await
            .context("Failed to parse alerts response")
    }

    /// Dismisses the alert at the source. Upstream acknowledges with 204 and
    /// nothing else.
    pub async fn reset_alert(&self, alert_id: i64) -> Result<()> {
        let resource = format!("/v1/alerts/{}", alert_id);
        let res = self
            .signed_request(Method::DELETE, &resource)?
            .send()
            .await
            .with_context(|| format!("Failed to send reset for alert {}", alert_id))?;

        if res.status() != StatusCode::NO_CONTENT {
            return Err(anyhow::anyhow!("Alert reset rejected: {}", res.status()));
        }
        Ok(())
    }

    fn signed_request(&self, method: Method, resource: &str) -> Result<reqwest::RequestBuilder> {
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        let sts = signing::string_to_sign(method.as_str(), "", "", &date, resource);
        let signature = signing::sign(&self.secret, &sts)?;

        debug!("Signed {} {}", method, resource);

        Ok(self
            .client
            .request(method, format!("{}{}", self.host, resource))
            .header(header::DATE, date.as_str())
            .header(
                header::AUTHORIZATION,
                format!("NJ {}:{}", self.access_key_id, signature),
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(uri: &str) -> NinjaClient {
        NinjaClient::new(uri.to_string(), "test-key".into(), "test-secret".into(), 5, 2)
    }

    #[tokio::test]
    async fn alerts_since_parses_unordered_batch() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/alerts/since/0"))
            .and(header_exists("Authorization"))
            .and(header_exists("Date"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": 5,
                    "device": {"display_name": "SRV-01"},
                    "customer": {"id": 7, "name": "Acme"},
                    "message": "Disk almost full",
                    "timestamp": "Mon, 05 Jun 2023 14:00:00",
                    "can_reset": true
                },
                {
                    "id": "9",
                    "device": {"display_name": "SRV-02"},
                    "customer": {"id": 7, "name": "Acme"},
                    "message": "Agent offline",
                    "timestamp": "Mon, 05 Jun 2023 14:05:00",
                    "can_reset": false
                }
            ])))
            .mount(&server)
            .await;

        let alerts = test_client(&server.uri()).alerts_since(0).await.unwrap();

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].id, 5);
        assert_eq!(alerts[1].id, 9);
    }

    #[tokio::test]
    async fn alerts_since_fails_on_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/alerts/since/3"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = test_client(&server.uri()).alerts_since(3).await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn reset_accepts_only_no_content() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v1/alerts/11"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/v1/alerts/12"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(client.reset_alert(11).await.is_ok());

        let err = client.reset_alert(12).await.unwrap_err();
        assert!(err.to_string().contains("200"));
    }
}
