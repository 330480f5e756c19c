use serde::Deserialize;

use crate::domain::template::TemplateData;

/// Details of a waitlist signup used in the confirmation email.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistSignup {
    pub name: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodTestAnalysis {
    pub name: Option<String>,
    pub health_score: Option<u32>,
    pub key_findings: Option<String>,
    pub recommendations_count: Option<u32>,
    pub files_processed: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScoreResult {
    pub name: Option<String>,
    pub score: Option<u32>,
    pub category: Option<String>,
    pub top_strength: Option<String>,
    pub improvement_area: Option<String>,
    pub tips: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthAuditResult {
    pub name: Option<String>,
    pub audit_score: Option<String>,
    pub critical_gaps: Option<u32>,
    pub action_items: Option<u32>,
    pub priority_focus: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplementCheck {
    pub name: Option<String>,
    pub safety_score: Option<String>,
    pub supplements_count: Option<u32>,
    pub interactions_found: Option<u32>,
    pub timing_recommendations: Option<String>,
}

impl From<WaitlistSignup> for TemplateData {
    fn from(signup: WaitlistSignup) -> Self {
        TemplateData::new()
            .with_some("user_name", signup.name)
            .with_some("signup_source", signup.source)
    }
}

impl From<BloodTestAnalysis> for TemplateData {
    fn from(analysis: BloodTestAnalysis) -> Self {
        TemplateData::new()
            .with_some("user_name", analysis.name)
            .with_some("health_score", analysis.health_score)
            .with_some("key_findings", analysis.key_findings)
            .with_some("recommendations_count", analysis.recommendations_count)
            .with_some("files_processed", analysis.files_processed)
    }
}

impl From<HealthScoreResult> for TemplateData {
    fn from(result: HealthScoreResult) -> Self {
        TemplateData::new()
            .with_some("user_name", result.name)
            .with_some("health_score", result.score)
            .with_some("score_category", result.category)
            .with_some("top_strength", result.top_strength)
            .with_some("improvement_area", result.improvement_area)
            .with_some("personalized_tips", result.tips)
    }
}

impl From<HealthAuditResult> for TemplateData {
    fn from(result: HealthAuditResult) -> Self {
        TemplateData::new()
            .with_some("user_name", result.name)
            .with_some("audit_score", result.audit_score)
            .with_some("critical_gaps", result.critical_gaps)
            .with_some("action_items", result.action_items)
            .with_some("priority_focus", result.priority_focus)
    }
}

impl From<SupplementCheck> for TemplateData {
    fn from(check: SupplementCheck) -> Self {
        TemplateData::new()
            .with_some("user_name", check.name)
            .with_some("safety_score", check.safety_score)
            .with_some("supplements_checked", check.supplements_count)
            .with_some("interactions_found", check.interactions_found)
            .with_some("timing_recommendations", check.timing_recommendations)
    }
}
