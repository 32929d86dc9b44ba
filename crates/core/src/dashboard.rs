use crate::client::{ClientError, RecommendationClient};
use crate::domain::recommendation::{
    MarketTrend, RecommendationRequest, RecommendationResponse, SearchHistoryItem,
};
use crate::history::SearchHistoryStore;
use crate::notify::{Notification, Notifier};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Holds at most the single recommendation of the latest cycle.
    pub recommendations: Vec<RecommendationResponse>,
    pub selected: Option<RecommendationResponse>,
    pub market_trend: Option<MarketTrend>,
    pub is_loading: bool,
    pub last_request: Option<RecommendationRequest>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Recommend,
    MarketTrends,
}

#[derive(Debug, Clone)]
pub struct CycleError {
    pub stage: PipelineStage,
    pub source: ClientError,
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "submission failed at {:?} stage: {}", self.stage, self.source)
    }
}

impl std::error::Error for CycleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum DashboardView<'a> {
    Loading,
    Detail(&'a RecommendationResponse),
    List {
        recommendations: &'a [RecommendationResponse],
        market_trend: Option<&'a MarketTrend>,
        industry: Option<&'a str>,
    },
}

pub struct DashboardController {
    client: RecommendationClient,
    history: SearchHistoryStore,
    notifier: Arc<dyn Notifier>,
    state: DashboardState,
}

impl DashboardController {
    pub fn new(
        client: RecommendationClient,
        history: SearchHistoryStore,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            client,
            history,
            notifier,
            state: DashboardState::default(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Runs one submission cycle for an already validated request.
    ///
    /// Any failure has been notified by the time this returns; the error is
    /// handed back only so the caller can tell which stage stopped the cycle.
    pub async fn submit(&mut self, request: RecommendationRequest) -> Result<(), CycleError> {
        self.history.save_search(&request);

        self.state.is_loading = true;
        self.state.selected = None;
        self.state.recommendations.clear();
        self.state.market_trend = None;
        self.state.last_request = Some(request.clone());

        let outcome = self.run_pipeline(&request).await;
        if let Err(err) = &outcome {
            tracing::error!(
                industry = %request.industry,
                stage = ?err.stage,
                error = %err.source,
                "error fetching recommendations or market trends"
            );
            self.notifier.notify(Notification::destructive(
                "Error",
                "Failed to fetch data. Please try again.",
            ));
        } else {
            tracing::info!(industry = %request.industry, "dashboard cycle completed");
        }

        self.state.is_loading = false;
        outcome
    }

    // The trend fetch only runs once the recommendation has arrived.
    async fn run_pipeline(&mut self, request: &RecommendationRequest) -> Result<(), CycleError> {
        let notifier = self.notifier.as_ref();

        let recommendation = self
            .client
            .get_recommendations(request, notifier)
            .await
            .map_err(|source| CycleError {
                stage: PipelineStage::Recommend,
                source,
            })?;
        self.state.recommendations = vec![recommendation];

        let trend = self
            .client
            .get_market_trends(&request.industry, notifier)
            .await
            .map_err(|source| CycleError {
                stage: PipelineStage::MarketTrends,
                source,
            })?;
        self.state.market_trend = Some(trend);

        Ok(())
    }

    /// Switches to the detail view. Returns false for an unknown id.
    pub fn select(&mut self, id: &str) -> bool {
        let Some(found) = self.state.recommendations.iter().find(|r| r.id == id) else {
            return false;
        };
        self.state.selected = Some(found.clone());
        true
    }

    pub fn back_to_list(&mut self) {
        self.state.selected = None;
    }

    pub fn view(&self) -> DashboardView<'_> {
        if self.state.is_loading {
            return DashboardView::Loading;
        }
        if let Some(selected) = &self.state.selected {
            return DashboardView::Detail(selected);
        }
        DashboardView::List {
            recommendations: &self.state.recommendations,
            market_trend: self.state.market_trend.as_ref(),
            industry: self
                .state
                .last_request
                .as_ref()
                .map(|r| r.industry.as_str()),
        }
    }

    pub fn recent_searches(&self) -> Vec<SearchHistoryItem> {
        self.history.get_search_history()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Endpoint, RecommendationApi};
    use crate::domain::recommendation::{RiskLevel, TrendSeries};
    use crate::notify::RecordingNotifier;
    use crate::storage::MemoryStore;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeApi {
        fail_recommend: AtomicBool,
        fail_trends: AtomicBool,
        recommend_calls: AtomicUsize,
        trend_calls: AtomicUsize,
    }

    fn series() -> TrendSeries {
        TrendSeries {
            dates: vec!["2024".to_string(), "2025".to_string()],
            values: vec![10.0, 12.5],
            trend_analysis: "Growing".to_string(),
        }
    }

    #[async_trait::async_trait]
    impl RecommendationApi for FakeApi {
        async fn recommend(
            &self,
            request: &RecommendationRequest,
        ) -> Result<RecommendationResponse, ClientError> {
            self.recommend_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_recommend.load(Ordering::SeqCst) {
                return Err(ClientError::Transport {
                    endpoint: Endpoint::Recommend,
                    detail: "connection refused".to_string(),
                });
            }
            Ok(RecommendationResponse {
                id: "rec-1".to_string(),
                title: format!("{} venture", request.industry),
                description: "desc".to_string(),
                investment_required: request.budget,
                roi: 12.0,
                risk_level: RiskLevel::Low,
                time_to_profit: "6 months".to_string(),
                market_trends: series(),
                key_benefits: vec!["benefit".to_string()],
                why_this_business: "because".to_string(),
            })
        }

        async fn market_trends(&self, industry: &str) -> Result<MarketTrend, ClientError> {
            self.trend_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_trends.load(Ordering::SeqCst) {
                return Err(ClientError::Service {
                    endpoint: Endpoint::MarketTrends,
                    status: 500,
                    detail: "boom".to_string(),
                });
            }
            Ok(MarketTrend {
                industry: industry.to_string(),
                trend: series(),
            })
        }
    }

    struct Fixture {
        api: Arc<FakeApi>,
        notifier: Arc<RecordingNotifier>,
        controller: DashboardController,
    }

    fn fixture(api: FakeApi) -> Fixture {
        let api = Arc::new(api);
        let notifier = Arc::new(RecordingNotifier::default());
        let controller = DashboardController::new(
            RecommendationClient::new(api.clone()),
            SearchHistoryStore::new(Arc::new(MemoryStore::default())),
            notifier.clone(),
        );
        Fixture {
            api,
            notifier,
            controller,
        }
    }

    fn request() -> RecommendationRequest {
        RecommendationRequest {
            industry: "Technology".to_string(),
            budget: 50000.0,
            location: "New York".to_string(),
        }
    }

    #[tokio::test]
    async fn successful_cycle_holds_one_recommendation_and_matching_trend() {
        let mut f = fixture(FakeApi::default());

        f.controller.submit(request()).await.unwrap();

        let state = f.controller.state();
        assert!(!state.is_loading);
        assert_eq!(state.recommendations.len(), 1);
        assert_eq!(
            state.market_trend.as_ref().unwrap().industry,
            request().industry
        );
        assert!(f.notifier.notifications().is_empty());
        assert_eq!(f.controller.recent_searches().len(), 1);
    }

    #[tokio::test]
    async fn transport_failure_skips_market_trends() {
        let mut f = fixture(FakeApi {
            fail_recommend: AtomicBool::new(true),
            ..FakeApi::default()
        });

        let err = f.controller.submit(request()).await.unwrap_err();

        assert_eq!(err.stage, PipelineStage::Recommend);
        let state = f.controller.state();
        assert!(!state.is_loading);
        assert!(state.recommendations.is_empty());
        assert!(state.market_trend.is_none());
        assert_eq!(f.api.recommend_calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.api.trend_calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            f.notifier.titles(),
            vec!["Network Error".to_string(), "Error".to_string()]
        );
        // The search is recorded even though the cycle failed.
        assert_eq!(f.controller.recent_searches().len(), 1);
    }

    #[tokio::test]
    async fn trend_failure_keeps_the_recommendation() {
        let mut f = fixture(FakeApi {
            fail_trends: AtomicBool::new(true),
            ..FakeApi::default()
        });

        let err = f.controller.submit(request()).await.unwrap_err();

        assert_eq!(err.stage, PipelineStage::MarketTrends);
        let state = f.controller.state();
        assert!(!state.is_loading);
        assert_eq!(state.recommendations.len(), 1);
        assert!(state.market_trend.is_none());
        assert_eq!(
            f.notifier.titles(),
            vec!["API Error".to_string(), "Error".to_string()]
        );
    }

    #[tokio::test]
    async fn new_cycle_clears_previous_results_and_selection() {
        let mut f = fixture(FakeApi::default());
        f.controller.submit(request()).await.unwrap();
        assert!(f.controller.select("rec-1"));

        f.api.fail_recommend.store(true, Ordering::SeqCst);
        let _ = f.controller.submit(request()).await;

        let state = f.controller.state();
        assert!(state.selected.is_none());
        assert!(state.recommendations.is_empty());
        assert!(state.market_trend.is_none());
        assert_eq!(f.controller.recent_searches().len(), 2);
    }

    #[tokio::test]
    async fn selection_switches_between_list_and_detail() {
        let mut f = fixture(FakeApi::default());
        f.controller.submit(request()).await.unwrap();

        match f.controller.view() {
            DashboardView::List {
                recommendations,
                market_trend,
                industry,
            } => {
                assert_eq!(recommendations.len(), 1);
                assert!(market_trend.is_some());
                assert_eq!(industry, Some("Technology"));
            }
            other => panic!("expected list view, got {other:?}"),
        }

        assert!(!f.controller.select("missing"));
        assert!(f.controller.select("rec-1"));
        assert!(matches!(f.controller.view(), DashboardView::Detail(r) if r.id == "rec-1"));

        f.controller.back_to_list();
        assert!(matches!(f.controller.view(), DashboardView::List { .. }));
        assert_eq!(f.api.recommend_calls.load(Ordering::SeqCst), 1);
    }
}
