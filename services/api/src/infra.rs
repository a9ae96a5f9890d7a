use diy_assess::assessment::{AssessmentService, JobCatalog, OpenAiProvider};
use diy_assess::config::ProviderConfig;
use diy_assess::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type ProductionService = AssessmentService<OpenAiProvider>;

/// Build the catalog and, when a credential is present, the completion provider.
pub(crate) fn build_assessment_service(
    provider_config: &ProviderConfig,
) -> Result<ProductionService, AppError> {
    let catalog = Arc::new(JobCatalog::standard()?);
    let provider = OpenAiProvider::from_config(provider_config)?.map(Arc::new);

    match &provider {
        Some(provider) => info!(model = provider.model(), "completion provider enabled"),
        None => info!("no provider credential configured, using the job catalog only"),
    }

    Ok(AssessmentService::new(catalog, provider).with_provider_timeout(provider_config.timeout))
}
