//! Casbin-backed policy engine.
//!
//! The engine is built from two documents:
//! - a model file (`model.conf`) defining the request shape and matcher;
//! - a policy file (`policy.csv`) listing the allowed triples.
//!
//! ```text
//! [request_definition]
//! r = sub, obj, act
//!
//! [policy_definition]
//! p = sub, obj, act
//!
//! [policy_effect]
//! e = some(where (p.eft == allow))
//!
//! [matchers]
//! m = r.sub == p.sub && r.obj == p.obj && r.act == p.act
//! ```
//!
//! ```text
//! p, demo, data, read
//! ```
//!
//! The parsed enforcer is cached. It only changes when [`PolicyEngine::reload`]
//! runs, or before every check in [`ReloadMode::PerRequest`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use casbin::{CoreApi, DefaultModel, Enforcer, FileAdapter, MgmtApi};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Errors from policy loading.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// A policy document does not exist.
    #[error("policy document not found: {0}")]
    NotFound(PathBuf),

    /// The model document could not be parsed.
    #[error("failed to load policy model: {0}")]
    ModelLoad(String),

    /// The policy rows could not be loaded into the enforcer.
    #[error("failed to load policy rules: {0}")]
    PolicyLoad(String),
}

/// When the engine re-parses its documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReloadMode {
    /// Parse once, then only on an explicit [`PolicyEngine::reload`].
    #[default]
    Manual,
    /// Re-parse both documents before every authorization check.
    PerRequest,
}

/// Policy engine wrapping a Casbin enforcer.
pub struct PolicyEngine {
    enforcer: RwLock<Enforcer>,
    model_path: PathBuf,
    policy_path: PathBuf,
    mode: ReloadMode,
}

async fn build_enforcer(model_path: &Path, policy_path: &Path) -> Result<Enforcer, PolicyError> {
    for path in [model_path, policy_path] {
        if tokio::fs::metadata(path).await.is_err() {
            return Err(PolicyError::NotFound(path.to_path_buf()));
        }
    }

    let model = DefaultModel::from_file(model_path)
        .await
        .map_err(|e| PolicyError::ModelLoad(e.to_string()))?;

    let adapter = FileAdapter::new(policy_path.to_string_lossy().to_string());
    Enforcer::new(model, adapter)
        .await
        .map_err(|e| PolicyError::PolicyLoad(e.to_string()))
}

impl PolicyEngine {
    /// Load the engine from a model file and a policy file.
    pub async fn load(
        model_path: impl AsRef<Path>,
        policy_path: impl AsRef<Path>,
        mode: ReloadMode,
    ) -> Result<Self, PolicyError> {
        let model_path = model_path.as_ref().to_path_buf();
        let policy_path = policy_path.as_ref().to_path_buf();

        let enforcer = build_enforcer(&model_path, &policy_path).await?;
        info!(
            model = %model_path.display(),
            policy = %policy_path.display(),
            rules = enforcer.get_policy().len(),
            ?mode,
            "Policy engine loaded"
        );

        Ok(Self {
            enforcer: RwLock::new(enforcer),
            model_path,
            policy_path,
            mode,
        })
    }

    /// Re-parse both documents and swap the new enforcer in.
    ///
    /// The new enforcer is built before the write lock is taken. On failure
    /// the previous enforcer stays active.
    pub async fn reload(&self) -> Result<(), PolicyError> {
        let fresh = build_enforcer(&self.model_path, &self.policy_path).await?;
        let rules = fresh.get_policy().len();
        *self.enforcer.write().await = fresh;
        debug!(rules, "Policy engine reloaded");
        Ok(())
    }

    /// [`reload`](Self::reload) with the outcome logged. Returns the new
    /// rule count, or `None` when the previous rules stay active.
    pub async fn reload_logged(&self) -> Option<usize> {
        match self.reload().await {
            Ok(()) => {
                let rules = self.policy_count().await;
                info!(rules, "Policy reloaded");
                Some(rules)
            }
            Err(e) => {
                error!(error = %e, "Policy reload failed, keeping previous rules");
                None
            }
        }
    }

    /// Spawn a task that reloads the policy on every SIGHUP.
    #[cfg(unix)]
    pub fn watch_hangup(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        use tokio::signal::unix::{signal, SignalKind};

        tokio::spawn(async move {
            let mut hangup = match signal(SignalKind::hangup()) {
                Ok(hangup) => hangup,
                Err(e) => {
                    warn!(error = %e, "Failed to install SIGHUP handler");
                    return;
                }
            };

            while hangup.recv().await.is_some() {
                self.reload_logged().await;
            }
        })
    }

    /// Whether `subject` may perform `action` on `object`.
    ///
    /// Denies when no rule matches, when enforcement errors, and in
    /// per-request mode when the documents fail to reload.
    pub async fn authorize(&self, subject: &str, object: &str, action: &str) -> bool {
        if self.mode == ReloadMode::PerRequest {
            if let Err(e) = self.reload().await {
                warn!(error = %e, "Policy reload failed, denying");
                return false;
            }
        }

        let enforcer = self.enforcer.read().await;
        match enforcer.enforce((subject, object, action)) {
            Ok(allowed) => {
                debug!(
                    "Policy check: sub={}, obj={}, act={} -> {}",
                    subject,
                    object,
                    action,
                    if allowed { "ALLOW" } else { "DENY" }
                );
                allowed
            }
            Err(e) => {
                warn!("Policy enforcement error: {}", e);
                false
            }
        }
    }

    /// Number of loaded policy rules.
    pub async fn policy_count(&self) -> usize {
        self.enforcer.read().await.get_policy().len()
    }

    /// The configured reload mode.
    pub fn mode(&self) -> ReloadMode {
        self.mode
    }

    /// Path of the model document.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Path of the policy document.
    pub fn policy_path(&self) -> &Path {
        &self.policy_path
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    pub(crate) const MODEL_CONF: &str = r#"[request_definition]
r = sub, obj, act

[policy_definition]
p = sub, obj, act

[policy_effect]
e = some(where (p.eft == allow))

[matchers]
m = r.sub == p.sub && r.obj == p.obj && r.act == p.act
"#;

    pub(crate) fn write_policy(dir: &TempDir, rows: &str) -> (PathBuf, PathBuf) {
        let model = dir.path().join("model.conf");
        let policy = dir.path().join("policy.csv");
        std::fs::write(&model, MODEL_CONF).unwrap();
        std::fs::write(&policy, rows).unwrap();
        (model, policy)
    }

    #[tokio::test]
    async fn test_allow_rule_matches() {
        let dir = TempDir::new().unwrap();
        let (model, policy) = write_policy(&dir, "p, demo, data, read\n");
        let engine = PolicyEngine::load(&model, &policy, ReloadMode::Manual)
            .await
            .unwrap();

        assert!(engine.authorize("demo", "data", "read").await);
        assert_eq!(engine.policy_count().await, 1);
    }

    #[tokio::test]
    async fn test_default_deny() {
        let dir = TempDir::new().unwrap();
        let (model, policy) = write_policy(&dir, "p, demo, data, read\n");
        let engine = PolicyEngine::load(&model, &policy, ReloadMode::Manual)
            .await
            .unwrap();

        assert!(!engine.authorize("demo", "baddata", "read").await);
        assert!(!engine.authorize("demo", "data", "create").await);
        assert!(!engine.authorize("other", "data", "read").await);
        assert!(!engine.authorize("", "", "").await);
    }

    #[tokio::test]
    async fn test_empty_policy_denies_everything() {
        let dir = TempDir::new().unwrap();
        let (model, policy) = write_policy(&dir, "");
        let engine = PolicyEngine::load(&model, &policy, ReloadMode::Manual)
            .await
            .unwrap();

        assert!(!engine.authorize("demo", "data", "read").await);
        assert_eq!(engine.policy_count().await, 0);
    }

    #[tokio::test]
    async fn test_manual_mode_caches_until_reload() {
        let dir = TempDir::new().unwrap();
        let (model, policy) = write_policy(&dir, "p, demo, data, read\n");
        let engine = PolicyEngine::load(&model, &policy, ReloadMode::Manual)
            .await
            .unwrap();

        std::fs::write(&policy, "p, demo, data, read\np, demo, other, read\n").unwrap();
        assert!(!engine.authorize("demo", "other", "read").await);

        engine.reload().await.unwrap();
        assert!(engine.authorize("demo", "other", "read").await);
        assert_eq!(engine.policy_count().await, 2);
    }

    #[tokio::test]
    async fn test_per_request_mode_sees_edits() {
        let dir = TempDir::new().unwrap();
        let (model, policy) = write_policy(&dir, "p, demo, data, read\n");
        let engine = PolicyEngine::load(&model, &policy, ReloadMode::PerRequest)
            .await
            .unwrap();

        assert!(engine.authorize("demo", "data", "read").await);
        std::fs::write(&policy, "p, demo, other, read\n").unwrap();
        assert!(!engine.authorize("demo", "data", "read").await);
        assert!(engine.authorize("demo", "other", "read").await);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_rules() {
        let dir = TempDir::new().unwrap();
        let (model, policy) = write_policy(&dir, "p, demo, data, read\n");
        let engine = PolicyEngine::load(&model, &policy, ReloadMode::Manual)
            .await
            .unwrap();

        std::fs::remove_file(&model).unwrap();
        assert!(matches!(
            engine.reload().await,
            Err(PolicyError::NotFound(_))
        ));
        assert!(engine.authorize("demo", "data", "read").await);
    }

    #[tokio::test]
    async fn test_reload_logged_from_spawned_task() {
        let dir = TempDir::new().unwrap();
        let (model, policy) = write_policy(&dir, "p, demo, data, read\n");
        let engine = Arc::new(
            PolicyEngine::load(&model, &policy, ReloadMode::Manual)
                .await
                .unwrap(),
        );

        std::fs::write(&policy, "p, demo, data, read\np, demo, data, create\n").unwrap();
        let task_engine = Arc::clone(&engine);
        let rules = tokio::spawn(async move { task_engine.reload_logged().await })
            .await
            .unwrap();
        assert_eq!(rules, Some(2));
        assert!(engine.authorize("demo", "data", "create").await);

        std::fs::remove_file(&model).unwrap();
        assert_eq!(engine.reload_logged().await, None);
        assert!(engine.authorize("demo", "data", "create").await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_watch_hangup_runs_until_aborted() {
        let dir = TempDir::new().unwrap();
        let (model, policy) = write_policy(&dir, "p, demo, data, read\n");
        let engine = Arc::new(
            PolicyEngine::load(&model, &policy, ReloadMode::Manual)
                .await
                .unwrap(),
        );

        let handle = Arc::clone(&engine).watch_hangup();
        tokio::task::yield_now().await;
        assert!(!handle.is_finished());

        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());
        assert!(engine.authorize("demo", "data", "read").await);
    }

    #[tokio::test]
    async fn test_per_request_reload_failure_denies() {
        let dir = TempDir::new().unwrap();
        let (model, policy) = write_policy(&dir, "p, demo, data, read\n");
        let engine = PolicyEngine::load(&model, &policy, ReloadMode::PerRequest)
            .await
            .unwrap();

        std::fs::remove_file(&policy).unwrap();
        assert!(!engine.authorize("demo", "data", "read").await);
    }

    #[tokio::test]
    async fn test_missing_documents() {
        let dir = TempDir::new().unwrap();
        let result = PolicyEngine::load(
            dir.path().join("model.conf"),
            dir.path().join("policy.csv"),
            ReloadMode::Manual,
        )
        .await;
        assert!(matches!(result, Err(PolicyError::NotFound(_))));
    }

    #[test]
    fn test_reload_mode_parse() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: ReloadMode,
        }
        let w: Wrapper = toml::from_str("mode = \"per_request\"").unwrap();
        assert_eq!(w.mode, ReloadMode::PerRequest);
        let w: Wrapper = toml::from_str("mode = \"manual\"").unwrap();
        assert_eq!(w.mode, ReloadMode::Manual);
        assert_eq!(ReloadMode::default(), ReloadMode::Manual);
    }
}
