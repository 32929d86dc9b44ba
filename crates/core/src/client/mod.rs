use crate::domain::recommendation::{MarketTrend, RecommendationRequest, RecommendationResponse};
use crate::notify::Notifier;
use std::sync::Arc;

pub mod error;
pub mod http;

pub use error::{ClientError, Endpoint};
pub use http::HttpRecommendationApi;

/// Raw access to the recommendation service: one attempt per call, no
/// notifications.
#[async_trait::async_trait]
pub trait RecommendationApi: Send + Sync {
    async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResponse, ClientError>;

    async fn market_trends(&self, industry: &str) -> Result<MarketTrend, ClientError>;
}

/// Calls the service and reports failures twice: once through the
/// caller-supplied notifier, once as the returned error.
#[derive(Clone)]
pub struct RecommendationClient {
    api: Arc<dyn RecommendationApi>,
}

impl RecommendationClient {
    pub fn new(api: Arc<dyn RecommendationApi>) -> Self {
        Self { api }
    }

    pub async fn get_recommendations(
        &self,
        request: &RecommendationRequest,
        notifier: &dyn Notifier,
    ) -> Result<RecommendationResponse, ClientError> {
        self.api
            .recommend(request)
            .await
            .inspect_err(|err| report(err, notifier))
    }

    pub async fn get_market_trends(
        &self,
        industry: &str,
        notifier: &dyn Notifier,
    ) -> Result<MarketTrend, ClientError> {
        self.api
            .market_trends(industry)
            .await
            .inspect_err(|err| report(err, notifier))
    }
}

fn report(err: &ClientError, notifier: &dyn Notifier) {
    tracing::warn!(
        endpoint = err.endpoint().path(),
        transport = err.is_transport(),
        error = %err,
        "recommendation service call failed"
    );
    notifier.notify(err.notification());
}
