// [apps/windi-gateway/src/state.rs]
//! Composition root: wires every crate in the workspace into the two
//! `axum` routers and the Guard's five background loops. One `GatewayState`
//! is cloned into both the Bridge and Governance routers — `Clone` is cheap,
//! every field is an `Arc`.

use std::sync::Arc;

use windi_bridge::Bridge;
use windi_guard::{Guard, GuardDb, GuardRepository};
use windi_hold::HoldManager;
use windi_provenance::ProvenanceStore;
use windi_virtue_token::TokenIssuer;

use crate::config::GatewayConfig;
use crate::isp_profiles::IspProfileLoader;
use crate::submissions::SubmissionLedger;

#[derive(Clone)]
pub struct GatewayState {
    pub bridge: Arc<Bridge>,
    pub issuer: Arc<TokenIssuer>,
    pub hold_manager: Arc<HoldManager>,
    pub provenance_store: Arc<ProvenanceStore>,
    pub submissions: Arc<SubmissionLedger>,
    pub guard_repository: Arc<GuardRepository>,
    pub policy_ref: Arc<String>,
}

impl axum::extract::FromRef<GatewayState> for Arc<TokenIssuer> {
    fn from_ref(state: &GatewayState) -> Self {
        state.issuer.clone()
    }
}

impl GatewayState {
    /// Builds every in-process component and connects the shared guard
    /// database. Does not start the Guard's background loops — that is
    /// `ignite`'s job, once a `GatewayState` already exists behind an `Arc`.
    pub async fn assemble(config: &GatewayConfig) -> anyhow::Result<Self> {
        let bridge = Arc::new(Bridge::new());
        let issuer = Arc::new(TokenIssuer::new(config.issuer_secret.clone()));
        let hold_manager = Arc::new(HoldManager::new(config.issuer_secret.clone()));
        let provenance_store = Arc::new(ProvenanceStore::new(&config.provenance_dir));
        let submissions = Arc::new(SubmissionLedger::new());

        let guard_db = GuardDb::connect(&config.event_log_db, config.event_log_db_token.clone()).await?;
        let guard_repository = Arc::new(GuardRepository::new(guard_db));

        Ok(GatewayState {
            bridge,
            issuer,
            hold_manager,
            provenance_store,
            submissions,
            guard_repository,
            policy_ref: Arc::new(config.policy_ref.clone()),
        })
    }

    /// Builds the `Guard` against this state's repository and submission
    /// ledger and hands back its five spawned background tasks.
    pub fn ignite_guard(&self, config: &GatewayConfig) -> Arc<Guard> {
        let isp_source = Arc::new(IspProfileLoader::new(config.isp_profiles_dir.clone()));
        Arc::new(Guard::new(
            self.guard_repository.clone(),
            config.service_targets.clone(),
            config.isp_required_fields.clone(),
            config.isp_recommended_fields.clone(),
            config.war_room_url.clone(),
            self.submissions.clone(),
            isp_source,
        ))
    }
}
