use chrono::NaiveDate;
use serde::Serialize;

use crate::models::project::{Project, ProjectWithFunding};

pub const RECENT_PROJECTS_LIMIT: usize = 5;

#[derive(Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_projects: usize,
    pub active_projects: usize,
    pub funded_projects: usize,
    pub total_funding: f64,
}

impl DashboardMetrics {
    pub fn from_projects(projects: &[ProjectWithFunding], today: NaiveDate) -> Self {
        projects.iter().fold(Self::default(), |mut m, p| {
            m.total_projects += 1;
            if p.project.is_active_on(today) {
                m.active_projects += 1;
            }
            if p.is_funded() {
                m.funded_projects += 1;
            }
            m.total_funding += p.current_funding;
            m
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub success: bool,
    pub metrics: DashboardMetrics,
    pub recent_projects: Vec<Project>,
}

/// Newest `RECENT_PROJECTS_LIMIT` projects by creation time.
pub fn recent_projects(projects: &[ProjectWithFunding]) -> Vec<Project> {
    let mut recent: Vec<Project> = projects.iter().map(|p| p.project.clone()).collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(RECENT_PROJECTS_LIMIT);
    recent
}
