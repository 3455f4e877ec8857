//! Job tracker — CRUD over the tracked applications stored in the state snapshot.
//!
//! Functions take a snapshot and return a new one, like the paragraph operations.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{JobEntry, JobStatus};
use crate::state::AppState;

/// Fields a caller may supply when creating or editing a job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub company: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl JobDraft {
    fn validate(&self) -> Result<(), AppError> {
        if self.company.trim().is_empty() {
            return Err(AppError::Validation("company is required".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".to_string()));
        }
        Ok(())
    }
}

pub fn add_job(state: &AppState, draft: JobDraft) -> Result<(AppState, Uuid), AppError> {
    draft.validate()?;
    let now = Utc::now();
    let job = JobEntry {
        id: Uuid::new_v4(),
        company: draft.company.trim().to_string(),
        title: draft.title.trim().to_string(),
        url: draft.url.filter(|u| !u.trim().is_empty()),
        status: JobStatus::Saved,
        notes: draft.notes,
        created_at: now,
        updated_at: now,
    };
    let id = job.id;
    let mut next = state.clone();
    next.jobs.push(job);
    tracing::info!(job_id = %id, "job added");
    Ok((next, id))
}

pub fn update_job(state: &AppState, id: Uuid, draft: JobDraft) -> Result<AppState, AppError> {
    draft.validate()?;
    let mut next = state.clone();
    let job = find_job_mut(&mut next, id)?;
    job.company = draft.company.trim().to_string();
    job.title = draft.title.trim().to_string();
    job.url = draft.url.filter(|u| !u.trim().is_empty());
    job.notes = draft.notes;
    job.updated_at = Utc::now();
    Ok(next)
}

pub fn set_job_status(state: &AppState, id: Uuid, status: JobStatus) -> Result<AppState, AppError> {
    let mut next = state.clone();
    let job = find_job_mut(&mut next, id)?;
    if job.status != status {
        job.status = status;
        job.updated_at = Utc::now();
    }
    Ok(next)
}

pub fn remove_job(state: &AppState, id: Uuid) -> Result<AppState, AppError> {
    let mut next = state.clone();
    let before = next.jobs.len();
    next.jobs.retain(|j| j.id != id);
    if next.jobs.len() == before {
        return Err(AppError::NotFound(format!("job {id}")));
    }
    tracing::info!(job_id = %id, "job removed");
    Ok(next)
}

/// Jobs with `status`, most recently updated first.
pub fn jobs_by_status(state: &AppState, status: JobStatus) -> Vec<&JobEntry> {
    let mut jobs: Vec<&JobEntry> = state.jobs.iter().filter(|j| j.status == status).collect();
    jobs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    jobs
}

fn find_job_mut(state: &mut AppState, id: Uuid) -> Result<&mut JobEntry, AppError> {
    state
        .jobs
        .iter_mut()
        .find(|j| j.id == id)
        .ok_or_else(|| AppError::NotFound(format!("job {id}")))
}
