use std::sync::Arc;

use crate::services::classifier::Classifier;
use crate::services::report_store::ReportStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ReportStore>,
    pub classifier: Arc<Classifier>,
}
