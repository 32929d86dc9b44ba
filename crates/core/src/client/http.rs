use crate::client::error::error_chain;
use crate::client::{ClientError, Endpoint, RecommendationApi};
use crate::config::Settings;
use crate::domain::recommendation::{MarketTrend, RecommendationRequest, RecommendationResponse};
use anyhow::Context;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone)]
pub struct HttpRecommendationApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRecommendationApi {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.http_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .context("failed to build recommendation service http client")?;

        Ok(Self::with_client(http, settings.api_base_url()))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint.path())
    }

    async fn decode<T: DeserializeOwned>(
        endpoint: Endpoint,
        res: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = res.status();
        let text = res.text().await.map_err(|e| transport(endpoint, &e))?;

        if !status.is_success() {
            return Err(ClientError::Service {
                endpoint,
                status: status.as_u16(),
                detail: text,
            });
        }

        serde_json::from_str::<T>(&text).map_err(|e| ClientError::Service {
            endpoint,
            status: status.as_u16(),
            detail: format!("response body does not match the expected shape: {e}"),
        })
    }
}

fn transport(endpoint: Endpoint, err: &reqwest::Error) -> ClientError {
    ClientError::Transport {
        endpoint,
        detail: error_chain(err),
    }
}

#[async_trait::async_trait]
impl RecommendationApi for HttpRecommendationApi {
    async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResponse, ClientError> {
        let endpoint = Endpoint::Recommend;
        tracing::debug!(
            industry = %request.industry,
            location = %request.location,
            budget = request.budget,
            "requesting recommendation"
        );

        let res = self
            .http
            .post(self.url(endpoint))
            .json(request)
            .send()
            .await
            .map_err(|e| transport(endpoint, &e))?;

        Self::decode(endpoint, res).await
    }

    async fn market_trends(&self, industry: &str) -> Result<MarketTrend, ClientError> {
        let endpoint = Endpoint::MarketTrends;
        tracing::debug!(%industry, "requesting market trends");

        let res = self
            .http
            .get(self.url(endpoint))
            .query(&[("industry", industry)])
            .send()
            .await
            .map_err(|e| transport(endpoint, &e))?;

        let trend: MarketTrend = Self::decode(endpoint, res).await?;
        if !trend.trend.is_parallel() {
            tracing::warn!(
                %industry,
                dates = trend.trend.dates.len(),
                values = trend.trend.values.len(),
                "market trend series has mismatched lengths"
            );
        }
        Ok(trend)
    }
}
