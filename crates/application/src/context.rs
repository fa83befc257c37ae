//! The current request as seen by a service call.

use accredigo_domain::identifiers::system_roles;
use accredigo_domain::new_id;
use chrono::{DateTime, Utc};

use crate::ApplicationError;

/// Language used when the caller sends no `Accept-Language`.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Identity and transport details of the request being served.
///
/// Built by whatever transport sits in front of the services; the services
/// only read it.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Authenticated user id, empty for anonymous requests
    pub user_id: String,
    /// Display name claim
    pub user_name: String,
    /// E-mail claim
    pub user_email: String,
    /// System role claim, 0 when absent or unparsable
    pub role_id: i32,
    /// Facility the caller acts for, if any
    pub company_id: Option<String>,
    /// Request correlation id for tracing
    pub correlation_id: String,
    /// Preferred language tag
    pub lang: String,
    /// When the request arrived
    pub request_time: DateTime<Utc>,
    /// Caller address (first `X-Forwarded-For` hop, else the peer address)
    pub client_ip: Option<String>,
    /// `User-Agent` header
    pub user_agent: Option<String>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self {
            user_id: String::new(),
            user_name: String::new(),
            user_email: String::new(),
            role_id: 0,
            company_id: None,
            correlation_id: new_id(),
            lang: DEFAULT_LANGUAGE.to_string(),
            request_time: Utc::now(),
            client_ip: None,
            user_agent: None,
        }
    }

    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::anonymous()
        }
    }

    /// Build a context from raw header pairs. Header names match case-insensitively.
    pub fn from_headers<'a>(headers: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut ctx = Self::anonymous();
        for (name, value) in headers {
            match name.to_ascii_lowercase().as_str() {
                "x-forwarded-for" => ctx = ctx.with_forwarded_for(value),
                "user-agent" => ctx.user_agent = non_empty(value),
                "accept-language" => ctx = ctx.with_accept_language(value),
                "x-correlation-id" => {
                    if let Some(id) = non_empty(value) {
                        ctx.correlation_id = id;
                    }
                }
                _ => {}
            }
        }
        ctx
    }

    pub fn with_user_name(mut self, name: impl Into<String>) -> Self {
        self.user_name = name.into();
        self
    }

    pub fn with_user_email(mut self, email: impl Into<String>) -> Self {
        self.user_email = email.into();
        self
    }

    /// Set the role from its claim text; anything unparsable becomes 0.
    pub fn with_role_claim(mut self, claim: &str) -> Self {
        self.role_id = claim.trim().parse().unwrap_or(0);
        self
    }

    pub fn with_role(mut self, role_id: i32) -> Self {
        self.role_id = role_id;
        self
    }

    pub fn with_company(mut self, company_id: impl Into<String>) -> Self {
        self.company_id = Some(company_id.into());
        self
    }

    /// Take the client address from the first `X-Forwarded-For` entry.
    pub fn with_forwarded_for(mut self, header: &str) -> Self {
        if let Some(first) = header.split(',').next().and_then(non_empty) {
            self.client_ip = Some(first);
        }
        self
    }

    /// Peer address, used only when no forwarded address was seen.
    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        if self.client_ip.is_none() {
            self.client_ip = non_empty(&addr.into());
        }
        self
    }

    pub fn with_accept_language(mut self, header: &str) -> Self {
        self.lang = header
            .split(',')
            .next()
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = non_empty(&agent.into());
        self
    }

    pub fn is_authenticated(&self) -> bool {
        !self.user_id.trim().is_empty()
    }

    /// Actor recorded on the unit of work, `None` for anonymous callers.
    pub fn actor(&self) -> Option<&str> {
        self.is_authenticated().then_some(self.user_id.as_str())
    }

    pub fn is_admin(&self) -> bool {
        self.role_id == system_roles::ADMIN
    }

    pub fn require_authenticated(&self) -> Result<&str, ApplicationError> {
        self.actor()
            .ok_or_else(|| ApplicationError::Unauthorized("Authentication required".to_string()))
    }

    pub fn require_admin(&self) -> Result<(), ApplicationError> {
        self.require_authenticated()?;
        if !self.is_admin() {
            return Err(ApplicationError::Forbidden(
                "Admin privileges required".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_defaults() {
        let ctx = RequestContext::anonymous();
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.actor(), None);
        assert_eq!(ctx.lang, "en");
        assert_eq!(ctx.role_id, 0);
        assert!(!ctx.correlation_id.is_empty());
        assert!(ctx.require_authenticated().is_err());
    }

    #[test]
    fn test_forwarded_for_takes_first_hop() {
        let ctx = RequestContext::anonymous()
            .with_forwarded_for(" 203.0.113.7 , 10.0.0.1")
            .with_remote_addr("10.0.0.99");
        assert_eq!(ctx.client_ip.as_deref(), Some("203.0.113.7"));

        let ctx = RequestContext::anonymous().with_remote_addr("10.0.0.99");
        assert_eq!(ctx.client_ip.as_deref(), Some("10.0.0.99"));
    }

    #[test]
    fn test_role_claim_parsing() {
        assert_eq!(RequestContext::anonymous().with_role_claim("4").role_id, 4);
        assert_eq!(RequestContext::anonymous().with_role_claim("admin").role_id, 0);
        assert_eq!(RequestContext::anonymous().with_role_claim("").role_id, 0);
    }

    #[test]
    fn test_from_headers() {
        let ctx = RequestContext::from_headers([
            ("X-Forwarded-For", "198.51.100.2, 10.0.0.1"),
            ("User-Agent", "curl/8.0"),
            ("Accept-Language", "ar-SA,ar;q=0.9,en;q=0.8"),
            ("X-Correlation-Id", "corr-1"),
        ]);
        assert_eq!(ctx.client_ip.as_deref(), Some("198.51.100.2"));
        assert_eq!(ctx.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(ctx.lang, "ar-SA");
        assert_eq!(ctx.correlation_id, "corr-1");
    }

    #[test]
    fn test_empty_language_falls_back() {
        assert_eq!(RequestContext::anonymous().with_accept_language("").lang, "en");
    }

    #[test]
    fn test_admin_check() {
        let staff = RequestContext::authenticated("u-1").with_role(system_roles::STAFF);
        assert!(staff.require_admin().is_err());

        let admin = RequestContext::authenticated("u-2").with_role(system_roles::ADMIN);
        assert!(admin.require_admin().is_ok());
        assert_eq!(admin.actor(), Some("u-2"));
    }
}
