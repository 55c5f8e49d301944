use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Citizen-facing descriptions are capped at this many characters, both at
/// draft validation and when truncating classifier suggestions.
pub const MAX_DESCRIPTION_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum WasteCategory {
    Roadside,
    BinOverflow,
    Plastic,
    Wet,
    Construction,
    Other,
}

impl WasteCategory {
    pub fn label(self) -> &'static str {
        match self {
            WasteCategory::Roadside => "roadside",
            WasteCategory::BinOverflow => "bin-overflow",
            WasteCategory::Plastic => "plastic",
            WasteCategory::Wet => "wet",
            WasteCategory::Construction => "construction",
            WasteCategory::Other => "other",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "roadside" => Some(WasteCategory::Roadside),
            "bin-overflow" => Some(WasteCategory::BinOverflow),
            "plastic" => Some(WasteCategory::Plastic),
            "wet" => Some(WasteCategory::Wet),
            "construction" => Some(WasteCategory::Construction),
            "other" => Some(WasteCategory::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for WasteCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Assigned,
    InProgress,
    Resolved,
}

impl ReportStatus {
    /// The single status a report may advance to from here, if any.
    /// `Resolved` is terminal.
    pub fn successor(self) -> Option<ReportStatus> {
        match self {
            ReportStatus::Pending => Some(ReportStatus::Assigned),
            ReportStatus::Assigned => Some(ReportStatus::InProgress),
            ReportStatus::InProgress => Some(ReportStatus::Resolved),
            ReportStatus::Resolved => None,
        }
    }

    pub fn can_advance_to(self, next: ReportStatus) -> bool {
        self.successor() == Some(next)
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Assigned => "assigned",
            ReportStatus::InProgress => "in_progress",
            ReportStatus::Resolved => "resolved",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct WasteReport {
    pub id: String,
    /// Human-shareable tracking code, e.g. `TT-IND-2025-48291`. Unique across
    /// all reports and never reassigned.
    pub token: String,
    pub title: String,
    pub description: String,
    pub category: WasteCategory,
    pub severity: u8,
    pub location: Location,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_image_url: Option<String>,
    pub status: ReportStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<String>,
}

impl WasteReport {
    /// Severity 4-5 reports jump the worker queue.
    pub fn is_high_priority(&self) -> bool {
        self.severity >= 4
    }
}

// Request/Response DTOs

/// Incoming report draft. Required fields are validated by the store, not by
/// serde, so the caller gets a proper validation message instead of a 422.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct ReportDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<WasteCategory>,
    pub severity: Option<u8>,
    pub location: Option<Location>,
    pub image_url: Option<String>,
    pub ai_analysis: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateStatusRequest {
    pub status: ReportStatus,
    pub resolved_image_url: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ReportListResponse {
    pub reports: Vec<WasteReport>,
    pub count: usize,
}

#[derive(Debug, Default, PartialEq, Serialize, utoipa::ToSchema)]
pub struct ReportStats {
    pub total: usize,
    pub pending: usize,
    pub assigned: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub high_priority: usize,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ClassifyRequest {
    /// Base64 image payload; a `data:image/...;base64,` prefix is tolerated.
    pub image: String,
    pub mime_type: Option<String>,
}

/// Best-effort suggestion for pre-filling a report draft. Field names match
/// the JSON schema the classification service is asked to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub category: WasteCategory,
    pub description: String,
    pub severity: u8,
    pub estimated_weight_kg: f64,
    pub safety_warning: String,
}

impl ClassificationResult {
    /// Returned whenever the classification service is unavailable or replies
    /// with something unusable, so the reporting flow can proceed to manual
    /// entry.
    pub fn fallback() -> Self {
        ClassificationResult {
            category: WasteCategory::Other,
            description: "Could not analyze image automatically.".to_string(),
            severity: 1,
            estimated_weight_kg: 0.0,
            safety_warning: String::new(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_moves_forward_one_step() {
        assert_eq!(ReportStatus::Pending.successor(), Some(ReportStatus::Assigned));
        assert_eq!(ReportStatus::Assigned.successor(), Some(ReportStatus::InProgress));
        assert_eq!(ReportStatus::InProgress.successor(), Some(ReportStatus::Resolved));
        assert_eq!(ReportStatus::Resolved.successor(), None);
    }

    #[test]
    fn test_status_rejects_skips_and_regressions() {
        assert!(!ReportStatus::Pending.can_advance_to(ReportStatus::Resolved));
        assert!(!ReportStatus::Pending.can_advance_to(ReportStatus::InProgress));
        assert!(!ReportStatus::InProgress.can_advance_to(ReportStatus::Assigned));
        assert!(!ReportStatus::Resolved.can_advance_to(ReportStatus::Pending));
        assert!(!ReportStatus::Assigned.can_advance_to(ReportStatus::Assigned));
    }

    #[test]
    fn test_category_labels_round_trip() {
        for category in [
            WasteCategory::Roadside,
            WasteCategory::BinOverflow,
            WasteCategory::Plastic,
            WasteCategory::Wet,
            WasteCategory::Construction,
            WasteCategory::Other,
        ] {
            assert_eq!(WasteCategory::from_label(category.label()), Some(category));
        }
        assert_eq!(WasteCategory::from_label("hazardous"), None);
    }

    #[test]
    fn test_high_priority_threshold() {
        let mut report = WasteReport {
            id: "r1".to_string(),
            token: "TT-IND-2025-00001".to_string(),
            title: "Waste Report".to_string(),
            description: String::new(),
            category: WasteCategory::Plastic,
            severity: 3,
            location: Location {
                latitude: 28.61,
                longitude: 77.20,
                address: None,
                city: None,
                pincode: None,
            },
            image_url: "https://img.example/before.jpg".to_string(),
            resolved_image_url: None,
            status: ReportStatus::Pending,
            timestamp: chrono::Utc::now(),
            ai_analysis: None,
        };
        assert!(!report.is_high_priority());
        report.severity = 4;
        assert!(report.is_high_priority());
    }
}
