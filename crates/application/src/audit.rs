//! Audit population for incoming commands.
//!
//! Commands that create records carry an [`AuditStamp`]. The service fills it
//! from the [`RequestContext`] before the command is turned into entities,
//! and the stamp is then copied onto each entity's audit envelope.

use accredigo_domain::AuditInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::context::RequestContext;

/// Placeholder recorded when a piece of request information is missing.
pub const UNKNOWN: &str = "Unknown";

/// Who created a record, when, and from where.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStamp {
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub created_from_ip: String,
    pub user_agent: String,
    pub audit_context: String,
}

impl AuditStamp {
    /// Copy creation details onto an entity's audit envelope.
    pub fn apply_to(&self, audit: &mut AuditInfo) {
        audit.created_at = self.created_at;
        audit.updated_at = self.created_at;
        audit.created_by = (self.created_by != UNKNOWN).then(|| self.created_by.clone());
    }
}

impl Default for AuditStamp {
    fn default() -> Self {
        Self {
            created_by: String::new(),
            created_at: Utc::now(),
            created_from_ip: String::new(),
            user_agent: String::new(),
            audit_context: String::new(),
        }
    }
}

/// A command that carries audit details.
pub trait Auditable {
    fn audit_stamp(&self) -> &AuditStamp;
    fn audit_stamp_mut(&mut self) -> &mut AuditStamp;
}

/// Fills [`AuditStamp`]s from the current request.
#[derive(Debug, Clone, Default)]
pub struct AuditService;

impl AuditService {
    pub fn new() -> Self {
        Self
    }

    /// Populate the command's audit details. Never fails; missing request
    /// information is recorded as [`UNKNOWN`].
    pub fn populate(&self, ctx: &RequestContext, command: &mut dyn Auditable) {
        let created_by = ctx.actor().unwrap_or(UNKNOWN).to_string();
        if created_by == UNKNOWN {
            warn!(correlation_id = %ctx.correlation_id, "No authenticated user on request, auditing as unknown");
        }
        let created_from_ip = ctx.client_ip.clone().unwrap_or_else(|| UNKNOWN.to_string());
        let user_agent = ctx.user_agent.clone().unwrap_or_else(|| UNKNOWN.to_string());

        let stamp = command.audit_stamp_mut();
        stamp.audit_context = format!("User {created_by} created from IP {created_from_ip}");
        stamp.created_by = created_by;
        stamp.created_at = Utc::now();
        stamp.created_from_ip = created_from_ip;
        stamp.user_agent = user_agent;

        debug!(
            created_by = %stamp.created_by,
            created_at = %stamp.created_at,
            created_from_ip = %stamp.created_from_ip,
            "Populated audit info"
        );
    }
}
