use std::sync::Arc;

use tracing::debug;

use super::catalog::JobCatalog;
use super::domain::{AssessmentInput, JobKey};

/// Keyword classifier over the catalog. The first entry in priority order wins.
#[derive(Debug, Clone)]
pub struct Classifier {
    catalog: Arc<JobCatalog>,
}

impl Classifier {
    pub fn new(catalog: Arc<JobCatalog>) -> Self {
        Self { catalog }
    }

    pub fn classify(&self, input: &AssessmentInput) -> Option<JobKey> {
        let text = input.search_text();
        let matched = self.catalog.first_match(&text);
        debug!(job = ?matched.map(|key| key.as_str()), "classified request text");
        matched
    }
}
