use askama::Template;

use super::TemplateData;

pub const DEFAULT_USER_NAME: &str = "Wellness Enthusiast";
pub const DEFAULT_MEMBER_COUNT: &str = "2,847+";
pub const DEFAULT_SITE_URL: &str = "https://wuksy.com";

fn link(data: &TemplateData, key: &str, path: &str) -> String {
    data.text(key, &format!("{}{}", DEFAULT_SITE_URL, path))
}

fn user_name(data: &TemplateData) -> String {
    data.text("user_name", DEFAULT_USER_NAME)
}

fn unsubscribe_link(data: &TemplateData) -> String {
    link(data, "unsubscribe_link", "/unsubscribe")
}

#[derive(Debug, Clone, Template)]
#[template(path = "email/waitlist.html")]
pub struct WaitlistEmail {
    pub user_name: String,
    pub member_count: String,
    pub signup_source: String,
    pub signup_date: String,
    pub early_access_link: String,
    pub unsubscribe_link: String,
}

impl WaitlistEmail {
    pub fn from_data(data: &TemplateData, today: &str) -> Self {
        Self {
            user_name: user_name(data),
            member_count: data.text("member_count", DEFAULT_MEMBER_COUNT),
            signup_source: data.text("signup_source", "main"),
            signup_date: data.text("signup_date", today),
            early_access_link: link(data, "early_access_link", "/early-access"),
            unsubscribe_link: unsubscribe_link(data),
        }
    }

    pub fn subject(&self) -> String {
        "🌱 Welcome to WUKSY - You're on the Waitlist!".to_owned()
    }
}

#[derive(Debug, Clone, Template)]
#[template(path = "email/blood_test.html")]
pub struct BloodTestEmail {
    pub user_name: String,
    pub health_score: String,
    pub key_findings: String,
    pub recommendations_count: String,
    pub files_processed: String,
    pub analysis_date: String,
    pub view_results_link: String,
    pub unsubscribe_link: String,
}

impl BloodTestEmail {
    pub fn from_data(data: &TemplateData, today: &str) -> Self {
        Self {
            user_name: user_name(data),
            health_score: data.text("health_score", "N/A"),
            key_findings: data.text("key_findings", "Analysis completed"),
            recommendations_count: data.text("recommendations_count", "0"),
            files_processed: data.text("files_processed", "1"),
            analysis_date: data.text("analysis_date", today),
            view_results_link: link(data, "view_results_link", "/results"),
            unsubscribe_link: unsubscribe_link(data),
        }
    }

    pub fn subject(&self) -> String {
        format!(
            "🧬 Your Blood Test Analysis is Ready - Score: {}",
            self.health_score
        )
    }
}

#[derive(Debug, Clone, Template)]
#[template(path = "email/health_score.html")]
pub struct HealthScoreEmail {
    pub user_name: String,
    pub health_score: String,
    pub score_category: String,
    pub top_strength: String,
    pub improvement_area: String,
    pub personalized_tips: String,
    pub assessment_date: String,
    pub view_results_link: String,
    pub unsubscribe_link: String,
}

impl HealthScoreEmail {
    pub fn from_data(data: &TemplateData, today: &str) -> Self {
        Self {
            user_name: user_name(data),
            health_score: data.text("health_score", "N/A"),
            score_category: data.text("score_category", "Good"),
            top_strength: data.text("top_strength", "Overall wellness awareness"),
            improvement_area: data.text("improvement_area", "Lifestyle optimization"),
            personalized_tips: data.text("personalized_tips", "Continue your wellness journey"),
            assessment_date: data.text("assessment_date", today),
            view_results_link: link(data, "view_results_link", "/health-score"),
            unsubscribe_link: unsubscribe_link(data),
        }
    }

    pub fn subject(&self) -> String {
        format!("📊 Your Health Score Results - {}", self.health_score)
    }
}

#[derive(Debug, Clone, Template)]
#[template(path = "email/health_audit.html")]
pub struct HealthAuditEmail {
    pub user_name: String,
    pub audit_score: String,
    pub critical_gaps: String,
    pub action_items: String,
    pub priority_focus: String,
    pub audit_date: String,
    pub download_report_link: String,
    pub unsubscribe_link: String,
}

impl HealthAuditEmail {
    pub fn from_data(data: &TemplateData, today: &str) -> Self {
        Self {
            user_name: user_name(data),
            audit_score: data.text("audit_score", "Completed"),
            critical_gaps: data.text("critical_gaps", "3"),
            action_items: data.text("action_items", "5"),
            priority_focus: data.text("priority_focus", "Data tracking consistency"),
            audit_date: data.text("audit_date", today),
            download_report_link: link(data, "download_report_link", "/audit-report"),
            unsubscribe_link: unsubscribe_link(data),
        }
    }

    pub fn subject(&self) -> String {
        "🔍 Your Health Data Audit Results".to_owned()
    }
}

#[derive(Debug, Clone, Template)]
#[template(path = "email/supplements.html")]
pub struct SupplementsEmail {
    pub user_name: String,
    pub safety_score: String,
    pub supplements_checked: String,
    pub interactions_found: String,
    pub timing_recommendations: String,
    pub check_date: String,
    pub view_results_link: String,
    pub unsubscribe_link: String,
}

impl SupplementsEmail {
    pub fn from_data(data: &TemplateData, today: &str) -> Self {
        Self {
            user_name: user_name(data),
            safety_score: data.text("safety_score", "Good"),
            supplements_checked: data.text("supplements_checked", "0"),
            interactions_found: data.text("interactions_found", "0"),
            timing_recommendations: data
                .text("timing_recommendations", "Optimized schedule available"),
            check_date: data.text("check_date", today),
            view_results_link: link(data, "view_results_link", "/supplement-results"),
            unsubscribe_link: unsubscribe_link(data),
        }
    }

    pub fn subject(&self) -> String {
        "⚗️ Your Supplement Analysis Results".to_owned()
    }

    /// Whether the check found anything worth calling out.
    pub fn has_interactions(&self) -> bool {
        self.interactions_found
            .trim()
            .parse::<f64>()
            .is_ok_and(|count| count > 0.0)
    }
}
