//! Report queue: pending moderation reports and their disposal.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::{CreateReportRequest, Report, ReportStatus};
use crate::storage::{slots, SlotStore};
use crate::stores::MillisSequencer;

const SLOT: &str = slots::REPORTS;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ReportsState {
    reports: Vec<Report>,
}

/// Report service. Filing appends; disposal marks reviewed and removes
/// in one step so no half-handled report is ever observable.
pub struct ReportStore {
    state: RwLock<ReportsState>,
    slots: SlotStore,
    seq: Arc<MillisSequencer>,
}

impl ReportStore {
    pub async fn open(store: SlotStore, seq: Arc<MillisSequencer>) -> Result<Self, AppError> {
        let state: ReportsState = store.read_slot_or_default(SLOT).await?;
        Ok(Self {
            state: RwLock::new(state),
            slots: store,
            seq,
        })
    }

    /// File a report. It enters the queue pending.
    pub async fn file(
        &self,
        request: &CreateReportRequest,
        reporter: &str,
    ) -> Result<Report, AppError> {
        let report = Report {
            id: format!("report-{}", self.seq.next()),
            target: request.target,
            target_id: request.target_id.clone(),
            reporter_email: reporter.to_string(),
            reported_user_email: request.reported_user_email.clone(),
            reason: request.reason.clone(),
            content: request.content.clone(),
            status: ReportStatus::Pending,
            created_at: Utc::now().to_rfc3339(),
        };
        let mut state = self.state.write().await;
        state.reports.push(report.clone());
        self.persist(&state).await?;
        Ok(report)
    }

    pub async fn get(&self, id: &str) -> Option<Report> {
        self.state
            .read()
            .await
            .reports
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// Reports still waiting for an admin, oldest first.
    pub async fn pending(&self) -> Vec<Report> {
        self.state
            .read()
            .await
            .reports
            .iter()
            .filter(|r| r.status == ReportStatus::Pending)
            .cloned()
            .collect()
    }

    /// Flip a report to reviewed without removing it. Missing ids are
    /// silent no-ops.
    pub async fn mark_reviewed(&self, id: &str) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let Some(report) = state.reports.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        report.status = ReportStatus::Reviewed;
        self.persist(&state).await?;
        Ok(true)
    }

    /// Close out a report: mark it reviewed and take it off the queue in
    /// one locked step. Returns the closed report.
    pub async fn resolve(&self, id: &str) -> Result<Option<Report>, AppError> {
        let mut state = self.state.write().await;
        let Some(pos) = state.reports.iter().position(|r| r.id == id) else {
            return Ok(None);
        };
        let mut report = state.reports.remove(pos);
        report.status = ReportStatus::Reviewed;
        self.persist(&state).await?;
        Ok(Some(report))
    }

    async fn persist(&self, state: &ReportsState) -> Result<(), AppError> {
        self.slots.write_slot(SLOT, state).await
    }
}
