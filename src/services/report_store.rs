use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::{
    ReportDraft, ReportStats, ReportStatus, WasteReport, MAX_DESCRIPTION_LEN,
};
use crate::utils::token::generate_token;

const DEFAULT_TITLE: &str = "Waste Report";

/// In-memory authority for report records: identity, token uniqueness, and
/// status transitions all live behind one lock. Writers hold it for their
/// whole check-and-mutate sequence, so concurrent creations can never mint a
/// duplicate token and a transition is always validated against the stored
/// status, not a stale read.
pub struct ReportStore {
    token_prefix: String,
    token_region: String,
    reports: RwLock<BTreeMap<String, WasteReport>>,
}

impl ReportStore {
    pub fn new(token_prefix: &str, token_region: &str) -> Self {
        Self {
            token_prefix: token_prefix.to_string(),
            token_region: token_region.to_string(),
            reports: RwLock::new(BTreeMap::new()),
        }
    }

    /// Validates the draft, assigns a fresh id and tracking token, and stores
    /// the record with `status = pending`.
    pub fn create_report(&self, draft: ReportDraft) -> Result<WasteReport, StoreError> {
        let category = draft.category.ok_or(StoreError::MissingField("category"))?;
        let severity = draft.severity.ok_or(StoreError::MissingField("severity"))?;
        if !(1..=5).contains(&severity) {
            return Err(StoreError::SeverityOutOfRange(severity));
        }
        let location = draft.location.ok_or(StoreError::MissingField("location"))?;
        if !(-90.0..=90.0).contains(&location.latitude)
            || !(-180.0..=180.0).contains(&location.longitude)
        {
            return Err(StoreError::CoordinatesOutOfRange(
                location.latitude,
                location.longitude,
            ));
        }
        let image_url = match draft.image_url {
            Some(url) if !url.trim().is_empty() => url,
            _ => return Err(StoreError::MissingField("image_url")),
        };
        let description = draft.description.unwrap_or_default();
        let description_len = description.chars().count();
        if description_len > MAX_DESCRIPTION_LEN {
            return Err(StoreError::DescriptionTooLong(description_len));
        }
        let title = match draft.title {
            Some(t) if !t.trim().is_empty() => t,
            _ => DEFAULT_TITLE.to_string(),
        };

        let mut reports = self
            .reports
            .write()
            .unwrap_or_else(|e| panic!("report store lock poisoned: {}", e));

        // Minted under the write lock: the uniqueness check and the insert
        // must not be separable.
        let token = loop {
            let candidate = generate_token(&self.token_prefix, &self.token_region);
            if !reports.values().any(|r| r.token == candidate) {
                break candidate;
            }
        };

        let report = WasteReport {
            id: Uuid::new_v4().to_string(),
            token,
            title,
            description,
            category,
            severity,
            location,
            image_url,
            resolved_image_url: None,
            status: ReportStatus::Pending,
            timestamp: Utc::now(),
            ai_analysis: draft.ai_analysis.filter(|s| !s.trim().is_empty()),
        };
        reports.insert(report.id.clone(), report.clone());
        Ok(report)
    }

    /// Exact, case-sensitive token lookup.
    pub fn get_by_token(&self, token: &str) -> Option<WasteReport> {
        let reports = self
            .reports
            .read()
            .unwrap_or_else(|e| panic!("report store lock poisoned: {}", e));
        reports.values().find(|r| r.token == token).cloned()
    }

    /// Advances a report one step along
    /// `pending -> assigned -> in_progress -> resolved`. Skips and
    /// regressions are rejected and the record is left untouched. Reaching
    /// `resolved` requires a resolution photo, which is stored alongside.
    pub fn update_status(
        &self,
        id: &str,
        new_status: ReportStatus,
        resolved_image_url: Option<String>,
    ) -> Result<WasteReport, StoreError> {
        let mut reports = self
            .reports
            .write()
            .unwrap_or_else(|e| panic!("report store lock poisoned: {}", e));
        let report = reports
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if !report.status.can_advance_to(new_status) {
            return Err(StoreError::InvalidTransition {
                from: report.status,
                to: new_status,
            });
        }
        if new_status == ReportStatus::Resolved {
            let proof = resolved_image_url
                .filter(|url| !url.trim().is_empty())
                .ok_or(StoreError::ResolvedImageRequired)?;
            report.resolved_image_url = Some(proof);
        }
        report.status = new_status;
        Ok(report.clone())
    }

    /// All reports, newest first. Returns clones so callers can never touch
    /// the stored records.
    pub fn list_all(&self) -> Vec<WasteReport> {
        let reports = self
            .reports
            .read()
            .unwrap_or_else(|e| panic!("report store lock poisoned: {}", e));
        let mut items: Vec<WasteReport> = reports.values().cloned().collect();
        items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        items
    }

    /// Reports in one lifecycle status, newest first. Worker queues read the
    /// active statuses; the completed tab reads `resolved`.
    pub fn list_by_status(&self, status: ReportStatus) -> Vec<WasteReport> {
        let reports = self
            .reports
            .read()
            .unwrap_or_else(|e| panic!("report store lock poisoned: {}", e));
        let mut items: Vec<WasteReport> = reports
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        items
    }

    /// Aggregate counts for the admin dashboard.
    pub fn stats(&self) -> ReportStats {
        let reports = self
            .reports
            .read()
            .unwrap_or_else(|e| panic!("report store lock poisoned: {}", e));
        let mut stats = ReportStats::default();
        for report in reports.values() {
            stats.total += 1;
            match report.status {
                ReportStatus::Pending => stats.pending += 1,
                ReportStatus::Assigned => stats.assigned += 1,
                ReportStatus::InProgress => stats.in_progress += 1,
                ReportStatus::Resolved => stats.resolved += 1,
            }
            if report.is_high_priority() {
                stats.high_priority += 1;
            }
        }
        stats
    }
}
