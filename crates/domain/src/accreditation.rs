//! Accreditation programmes and gap-analysis sessions.

use crate::entity::AuditInfo;
use crate::errors::{DomainError, DomainResult};
use crate::validation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Accreditation programme a facility works towards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accreditation {
    pub id: String,
    pub name: String,
    pub arabic_name: Option<String>,
    pub description: Option<String>,
    pub arabic_description: Option<String>,
    pub audit: AuditInfo,
}

impl Accreditation {
    /// Create an accreditation; the key must be assigned by the caller.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arabic_name: None,
            description: None,
            arabic_description: None,
            audit: AuditInfo::new(),
        }
    }
}

pub(crate) fn validate_accreditation(accreditation: &Accreditation) -> DomainResult<()> {
    validation::require_text("name", &accreditation.name)?;
    validation::max_length("name", &accreditation.name, 200)?;
    validation::max_length_opt("arabic_name", accreditation.arabic_name.as_deref(), 200)
}

/// A facility's self-assessment against an accreditation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysisSession {
    pub id: String,
    pub facility_id: String,
    pub accreditation_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub audit: AuditInfo,
}

impl GapAnalysisSession {
    /// Open a session starting now.
    pub fn open(
        id: impl Into<String>,
        facility_id: impl Into<String>,
        accreditation_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            facility_id: facility_id.into(),
            accreditation_id: accreditation_id.into(),
            started_at: Utc::now(),
            ended_at: None,
            audit: AuditInfo::new(),
        }
    }

    /// Close the session.
    pub fn close(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        if at < self.started_at {
            return Err(DomainError::InvalidRange {
                start: "started_at",
                end: "ended_at",
            });
        }
        self.ended_at = Some(at);
        Ok(())
    }

    /// Whether the session is still running.
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

pub(crate) fn validate_session(session: &GapAnalysisSession) -> DomainResult<()> {
    match session.ended_at {
        Some(end) if end < session.started_at => Err(DomainError::InvalidRange {
            start: "started_at",
            end: "ended_at",
        }),
        _ => Ok(()),
    }
}

crate::impl_entity!(Accreditation, String, id, validate = validate_accreditation);
crate::impl_entity!(GapAnalysisSession, String, id, validate = validate_session);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use chrono::Duration;

    #[test]
    fn test_session_close() {
        let mut session = GapAnalysisSession::open("s1", "f1", "a1");
        assert!(session.is_open());

        let before = session.started_at - Duration::minutes(1);
        assert!(session.close(before).is_err());
        assert!(session.is_open());

        session.close(session.started_at + Duration::hours(2)).unwrap();
        assert!(!session.is_open());
        assert!(session.validate().is_ok());
    }

    #[test]
    fn test_accreditation_requires_name() {
        let accreditation = Accreditation::new("a1", " ");
        assert!(accreditation.validate().is_err());
    }
}
