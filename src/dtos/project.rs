use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{lenient_f64, parse_date, positive_amount, present};
use crate::error::AppError;
use crate::models::project::{Project, ProjectWithFunding};

/// Keeps goals, and totals raised against them, inside the money column range.
pub const MAX_FUNDING_GOAL: f64 = 100_000_000_000.0;

/// Body shared by create and update.
#[derive(Deserialize)]
pub struct ProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub funding_goal: Option<f64>,
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug)]
pub struct ProjectFields {
    pub title: String,
    pub description: String,
    pub funding_goal: f64,
    pub category: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ProjectRequest {
    pub fn validate(self) -> Result<ProjectFields, AppError> {
        let (Some(title), Some(description), Some(funding_goal), Some(category), Some(start), Some(end)) = (
            present(self.title),
            present(self.description),
            self.funding_goal,
            present(self.category),
            present(self.start_date),
            present(self.end_date),
        ) else {
            return Err(AppError::validation("All fields are required"));
        };

        let funding_goal = positive_amount(Some(funding_goal))
            .ok_or_else(|| AppError::validation("Funding goal must be greater than 0"))?;
        if funding_goal > MAX_FUNDING_GOAL {
            return Err(AppError::validation("Funding goal exceeds the maximum allowed amount"));
        }
        let start_date = parse_date(&start)
            .ok_or_else(|| AppError::validation("Invalid start_date, expected YYYY-MM-DD"))?;
        let end_date = parse_date(&end)
            .ok_or_else(|| AppError::validation("Invalid end_date, expected YYYY-MM-DD"))?;
        if end_date < start_date {
            return Err(AppError::validation("End date cannot be before start date"));
        }

        Ok(ProjectFields { title, description, funding_goal, category, start_date, end_date })
    }
}

#[derive(Serialize)]
pub struct ProjectEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub project: Project,
}

#[derive(Serialize)]
pub struct ProjectDetailEnvelope {
    pub success: bool,
    pub project: ProjectWithFunding,
}

#[derive(Serialize)]
pub struct ProjectListResponse {
    pub success: bool,
    pub projects: Vec<Project>,
}
