//! Sequential role assignment.
//!
//! The upstream grants one role per call. Roles are sent in the order the
//! operator chose them and the first failure stops the run. Roles granted
//! before the failure stay granted: there is no compensating call.

use serde::Serialize;
use tracing::{info, warn};

use crate::api_client::ApiError;
use crate::errors::AppError;
use crate::models::AccessRole;
use crate::state::AppState;
use crate::store::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AssignmentStatus {
    Complete,
    Partial,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedRole {
    pub role: AccessRole,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignmentOutcome {
    pub user_id: String,
    pub status: AssignmentStatus,
    pub applied: Vec<AccessRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<FailedRole>,
    /// Roles never attempted because an earlier one failed.
    pub skipped: Vec<AccessRole>,
}

impl RoleAssignmentOutcome {
    pub fn summary(&self) -> String {
        let total = self.applied.len() + self.skipped.len() + usize::from(self.failed.is_some());
        match &self.failed {
            None => format!("Assigned {} role(s)", self.applied.len()),
            Some(failed) => format!(
                "Assigned {} of {} role(s); {} failed: {}",
                self.applied.len(),
                total,
                failed.role.label(),
                failed.message
            ),
        }
    }
}

pub async fn assign_roles(
    state: &AppState,
    user_id: &str,
    roles: &[AccessRole],
) -> Result<RoleAssignmentOutcome, AppError> {
    let users = state.api.users();
    let mut applied = Vec::new();
    let mut failed = None;
    let mut skipped = Vec::new();
    let mut unauthorized = false;

    for (i, role) in roles.iter().enumerate() {
        match users.assign_role(user_id, *role).await {
            Ok(_) => applied.push(*role),
            Err(ApiError::Unauthorized) => {
                unauthorized = true;
                break;
            }
            Err(e) => {
                warn!("assigning {} to user {user_id} failed: {e}", role.code());
                failed = Some(FailedRole {
                    role: *role,
                    message: AppError::from(e).to_string(),
                });
                skipped = roles[i + 1..].to_vec();
                break;
            }
        }
    }

    if !applied.is_empty() {
        state.store.write().await.apply(Action::GrantRoles {
            user_id: user_id.to_string(),
            roles: applied.clone(),
        });
    }
    if unauthorized {
        return Err(AppError::Unauthorized);
    }

    let status = match (&failed, applied.is_empty()) {
        (None, _) => AssignmentStatus::Complete,
        (Some(_), true) => AssignmentStatus::Failed,
        (Some(_), false) => AssignmentStatus::Partial,
    };
    info!(
        "role assignment for user {user_id}: {:?}, {} applied",
        status,
        applied.len()
    );

    Ok(RoleAssignmentOutcome {
        user_id: user_id.to_string(),
        status,
        applied,
        failed,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_mentions_failed_role() {
        let outcome = RoleAssignmentOutcome {
            user_id: "42".into(),
            status: AssignmentStatus::Partial,
            applied: vec![AccessRole::Admin],
            failed: Some(FailedRole {
                role: AccessRole::Recruiter,
                message: "boom".into(),
            }),
            skipped: vec![AccessRole::PracticeLead],
        };
        assert_eq!(
            outcome.summary(),
            "Assigned 1 of 3 role(s); Recruiter failed: boom"
        );
    }
}
