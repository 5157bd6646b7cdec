//! Azure Computer Vision Read gateway.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{check_sentinel, OcrGateway};
use crate::error::OcrError;
use crate::models::config::OcrConfig;

const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_HEADER: &str = "Operation-Location";

/// Read API result envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadOperation {
    status: String,
    #[serde(default)]
    analyze_result: Option<AnalyzeResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResult {
    #[serde(default)]
    read_results: Vec<ReadPage>,
}

#[derive(Debug, Deserialize)]
struct ReadPage {
    #[serde(default)]
    lines: Vec<ReadLine>,
}

#[derive(Debug, Deserialize)]
struct ReadLine {
    text: String,
}

/// Text lines of every page, in reading order.
fn collect_text(result: &AnalyzeResult) -> String {
    result
        .read_results
        .iter()
        .flat_map(|page| page.lines.iter())
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Gateway for the asynchronous Read API: submit, then poll.
pub struct AzureReadGateway {
    client: Client,
    analyze_url: String,
    api_key: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl AzureReadGateway {
    pub fn new(config: &OcrConfig) -> Result<Self, OcrError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| OcrError::NotConfigured("missing endpoint".to_string()))?;
        let api_key = config
            .resolved_api_key()
            .ok_or_else(|| OcrError::NotConfigured("missing API key".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OcrError::Request(e.to_string()))?;

        let analyze_url = format!(
            "{}/vision/{}/read/analyze?language={}",
            endpoint.trim_end_matches('/'),
            config.api_version,
            config.language
        );

        Ok(Self {
            client,
            analyze_url,
            api_key,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_polls: config.max_polls.max(1),
        })
    }

    fn submit(&self, image: &[u8]) -> Result<String, OcrError> {
        let response = self
            .client
            .post(&self.analyze_url)
            .header(KEY_HEADER, &self.api_key)
            .header("Content-Type", "application/octet-stream")
            .body(image.to_vec())
            .send()
            .map_err(|e| OcrError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(OcrError::Request(format!("analyze returned {}: {}", status, body)));
        }

        response
            .headers()
            .get(OPERATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| OcrError::Request(format!("response lacks {}", OPERATION_HEADER)))
    }

    fn poll(&self, operation_url: &str) -> Result<AnalyzeResult, OcrError> {
        for attempt in 1..=self.max_polls {
            thread::sleep(self.poll_interval);

            let response = self
                .client
                .get(operation_url)
                .header(KEY_HEADER, &self.api_key)
                .send()
                .map_err(|e| OcrError::Request(e.to_string()))?;

            if !response.status().is_success() {
                let status = response.status();
                return Err(OcrError::Request(format!("poll returned {}", status)));
            }

            let operation: ReadOperation = response
                .json()
                .map_err(|e| OcrError::Request(format!("invalid Read response: {}", e)))?;

            debug!(attempt, status = %operation.status, "Read operation polled");

            match operation.status.to_lowercase().as_str() {
                "succeeded" => {
                    return operation.analyze_result.ok_or_else(|| {
                        OcrError::Request("succeeded without analyzeResult".to_string())
                    });
                }
                "failed" => {
                    return Err(OcrError::Unavailable("Read operation failed".to_string()));
                }
                _ => {}
            }
        }

        warn!(polls = self.max_polls, "Read operation did not finish");
        Err(OcrError::Timeout {
            polls: self.max_polls,
        })
    }
}

impl OcrGateway for AzureReadGateway {
    fn analyze(&self, image: &[u8]) -> Result<String, OcrError> {
        let operation_url = self.submit(image)?;
        let result = self.poll(&operation_url)?;
        let text = collect_text(&result);
        info!(chars = text.len(), "Azure Read finished");
        check_sentinel(text)
    }

    fn name(&self) -> &str {
        "azure-read"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const READ_RESPONSE: &str = r#"{
        "status": "succeeded",
        "createdDateTime": "2025-06-24T14:02:11Z",
        "analyzeResult": {
            "version": "3.2.0",
            "readResults": [
                {"page": 1, "lines": [
                    {"text": "COMPROBANTE DE TRANSACCION", "boundingBox": [0, 0, 1, 1]},
                    {"text": "Folio 4560010758"}
                ]},
                {"page": 2, "lines": [{"text": "Total Pagado 8.153.962"}]}
            ]
        }
    }"#;

    #[test]
    fn test_collect_text_joins_lines() {
        let operation: ReadOperation = serde_json::from_str(READ_RESPONSE).unwrap();
        assert_eq!(operation.status, "succeeded");
        let text = collect_text(&operation.analyze_result.unwrap());
        assert_eq!(
            text,
            "COMPROBANTE DE TRANSACCION\nFolio 4560010758\nTotal Pagado 8.153.962"
        );
    }

    #[test]
    fn test_running_operation_has_no_result() {
        let operation: ReadOperation = serde_json::from_str(r#"{"status": "running"}"#).unwrap();
        assert!(operation.analyze_result.is_none());
    }

    #[test]
    fn test_missing_endpoint_is_not_configured() {
        let config = OcrConfig {
            endpoint: None,
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            AzureReadGateway::new(&config),
            Err(OcrError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_analyze_url() {
        let config = OcrConfig {
            endpoint: Some("https://aduana.cognitiveservices.azure.com/".to_string()),
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        let gateway = AzureReadGateway::new(&config).unwrap();
        assert_eq!(
            gateway.analyze_url,
            "https://aduana.cognitiveservices.azure.com/vision/v3.2/read/analyze?language=es"
        );
        assert_eq!(gateway.name(), "azure-read");
    }
}
