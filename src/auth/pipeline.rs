//! Two-gate access pipeline.
//!
//! Authentication compares the submitted token with the principal's stored
//! session token. Authorization asks the policy engine about the
//! `(principal, resource, action)` triple. Both must pass, in that order.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use super::policy::PolicyEngine;
use super::store::CredentialStore;

/// Access check failures.
///
/// `CredentialNotFound` and `CredentialMismatch` are kept apart for logs
/// only. Callers see the same rejection for both.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    /// The principal has no stored session token.
    #[error("no credential stored for principal")]
    CredentialNotFound,

    /// The submitted token does not equal the stored one.
    #[error("credential mismatch")]
    CredentialMismatch,

    /// No allow rule matched.
    #[error("denied by policy")]
    PolicyDenied,
}

/// Coarse request action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
}

impl Action {
    /// `POST` creates, every other method reads.
    pub fn from_method(method: &str) -> Self {
        if method.eq_ignore_ascii_case("POST") {
            Action::Create
        } else {
            Action::Read
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of evaluating one gate, or the whole pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Authenticated,
    NotAuthenticated,
    Authorized,
    NotAuthorized,
}

/// Everything the pipeline needs from an inbound request.
#[derive(Debug, Clone)]
pub struct AccessRequest {
    /// Principal the request claims to act as.
    pub name: String,
    /// Resource label.
    pub resource: String,
    pub action: Action,
    /// Value of the `Token` header, if any.
    pub token: Option<String>,
}

/// Transient decision for one request.
#[derive(Debug, Clone)]
pub struct AuthDecision {
    pub outcome: Outcome,
    pub principal: String,
    pub resource: String,
    pub action: Action,
    pub correlation_id: String,
}

impl AuthDecision {
    /// True only when both gates passed.
    pub fn is_granted(&self) -> bool {
        self.outcome == Outcome::Authorized
    }
}

/// Short correlation id for log records.
pub fn correlation_id() -> String {
    let mut id = Uuid::new_v4().to_string();
    id.truncate(8);
    id
}

/// Authentication gate followed by authorization gate.
pub struct AuthPipeline {
    store: Arc<CredentialStore>,
    policy: Arc<PolicyEngine>,
}

impl AuthPipeline {
    pub fn new(store: Arc<CredentialStore>, policy: Arc<PolicyEngine>) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    pub fn policy(&self) -> &Arc<PolicyEngine> {
        &self.policy
    }

    /// Check the submitted token against the stored one for `name`.
    pub fn authenticate(
        &self,
        correlation_id: &str,
        name: &str,
        submitted: Option<&str>,
    ) -> Result<(), AccessError> {
        let Some(stored) = self.store.token(name) else {
            info!(
                uuid = correlation_id,
                name,
                access = "denied",
                "No token found"
            );
            return Err(AccessError::CredentialNotFound);
        };

        if submitted != Some(stored.as_str()) {
            info!(
                uuid = correlation_id,
                name,
                access = "denied",
                "Invalid token"
            );
            return Err(AccessError::CredentialMismatch);
        }

        info!(
            uuid = correlation_id,
            name,
            access = "granted",
            "Token accepted"
        );
        Ok(())
    }

    /// Ask the policy engine whether `name` may perform `action` on `resource`.
    pub async fn authorize(
        &self,
        correlation_id: &str,
        name: &str,
        resource: &str,
        action: Action,
    ) -> Result<(), AccessError> {
        if !self.policy.authorize(name, resource, action.as_str()).await {
            info!(
                uuid = correlation_id,
                name,
                resource,
                act = %action,
                access = "denied",
                "Unauthorized"
            );
            return Err(AccessError::PolicyDenied);
        }

        info!(
            uuid = correlation_id,
            name,
            resource,
            act = %action,
            access = "granted",
            "Access granted"
        );
        Ok(())
    }

    /// Run both gates in order. Authorization is skipped when
    /// authentication fails.
    pub async fn evaluate(&self, request: &AccessRequest) -> AuthDecision {
        self.evaluate_with_id(correlation_id(), request).await
    }

    /// [`evaluate`](Self::evaluate) with a caller-supplied correlation id.
    pub async fn evaluate_with_id(
        &self,
        correlation_id: String,
        request: &AccessRequest,
    ) -> AuthDecision {
        let span = info_span!(
            "access",
            uuid = %correlation_id,
            name = %request.name,
            resource = %request.resource,
            act = %request.action,
        );

        let outcome = async {
            if self
                .authenticate(&correlation_id, &request.name, request.token.as_deref())
                .is_err()
            {
                return Outcome::NotAuthenticated;
            }
            match self
                .authorize(
                    &correlation_id,
                    &request.name,
                    &request.resource,
                    request.action,
                )
                .await
            {
                Ok(()) => Outcome::Authorized,
                Err(_) => Outcome::NotAuthorized,
            }
        }
        .instrument(span)
        .await;

        AuthDecision {
            outcome,
            principal: request.name.clone(),
            resource: request.resource.clone(),
            action: request.action,
            correlation_id,
        }
    }
}
