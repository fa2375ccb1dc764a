//! Pipeline driver
//!
//! Sequences the whole provisioning flow per team and per pending account:
//! acquire email → register/login (external) → authorize (orchestrator) →
//! record the outcome in the tracker. One sequential worker; a cooperative
//! cancellation flag is checked between steps, so cancellation latency is
//! bounded by the current step's own timeout.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pool_provisioner_backend::{CrsBackend, OwnerImport, PoolBackend};

use crate::config::Settings;
use crate::error::{CoreError, CoreResult};
use crate::services::csv_export::{CsvExporter, ExportRecord};
use crate::services::orchestrator::{AuthOutcome, AuthorizationOrchestrator, AuthStage};
use crate::services::tracker::AccountTracker;
use crate::services::{DomainBlacklist, TeamStore};
use crate::traits::{AuthorizationHandoff, BrowserDriver, EmailProvisioner};
use crate::types::{AccountRole, AccountStatus, Team, TeamFormat, TrackedAccount};

/// Cooperative cancellation flag, checked between pipeline steps.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> CoreResult<()> {
        if self.is_cancelled() {
            Err(CoreError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Totals for one pipeline run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// The top-level driver wiring tracker, orchestrator and the external
/// collaborators together.
pub struct PipelineDriver {
    settings: Settings,
    orchestrator: AuthorizationOrchestrator,
    tracker: AccountTracker,
    team_store: TeamStore,
    blacklist: DomainBlacklist,
    csv: CsvExporter,
    browser: Arc<dyn BrowserDriver>,
    email: Arc<dyn EmailProvisioner>,
    handoff: Arc<dyn AuthorizationHandoff>,
    cancel: CancelFlag,
}

impl PipelineDriver {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        settings: Settings,
        backend: Arc<dyn PoolBackend>,
        tracker: AccountTracker,
        team_store: TeamStore,
        blacklist: DomainBlacklist,
        browser: Arc<dyn BrowserDriver>,
        email: Arc<dyn EmailProvisioner>,
        handoff: Arc<dyn AuthorizationHandoff>,
        cancel: CancelFlag,
    ) -> Self {
        let csv = CsvExporter::new(&settings.files.csv_file);
        Self {
            settings,
            orchestrator: AuthorizationOrchestrator::new(backend),
            tracker,
            team_store,
            blacklist,
            csv,
            browser,
            email,
            handoff,
            cancel,
        }
    }

    #[must_use]
    pub fn tracker(&self) -> &AccountTracker {
        &self.tracker
    }

    /// Run the full pipeline over every team.
    ///
    /// Verifies the backend connection first so a bad credential or missing
    /// base URL fails here with a distinct diagnosis, not deep inside the
    /// account loop.
    pub async fn run(&mut self) -> CoreResult<RunSummary> {
        let summary_msg = self.orchestrator.backend().verify_connection().await?;
        log::info!(
            "[{}] Connection verified: {summary_msg}",
            self.orchestrator.backend().id()
        );

        if self.settings.backend.include_team_owners {
            let teams: Vec<Team> = self.team_store.teams().to_vec();
            self.tracker
                .add_team_owners(&teams, &self.settings.account.default_password);
            self.tracker.save_if_dirty()?;
        }

        let mut summary = RunSummary::default();
        let team_names: Vec<String> = self
            .team_store
            .teams()
            .iter()
            .map(|t| t.name.clone())
            .collect();

        for team_name in team_names {
            self.cancel.check()?;
            self.process_team(&team_name, &mut summary).await?;
        }

        if self.team_store.save()? {
            log::info!("Team store updated with discovered data");
        }

        log::info!(
            "Run complete: {} processed, {} succeeded, {} failed",
            summary.processed,
            summary.succeeded,
            summary.failed
        );
        Ok(summary)
    }

    /// Process one team: top up the seat count, then drain the resumption
    /// queue. The tracker is persisted once per team batch.
    async fn process_team(&mut self, team_name: &str, summary: &mut RunSummary) -> CoreResult<()> {
        self.provision_missing_seats(team_name).await?;

        // Completed accounts never re-enter this queue
        let pending = self.tracker.list_incomplete(team_name);
        if pending.is_empty() {
            log::debug!("[{team_name}] Nothing to process");
            return Ok(());
        }
        log::info!("[{team_name}] {} account(s) pending", pending.len());

        for account in pending {
            self.cancel.check()?;
            let succeeded = self.process_account(team_name, &account).await?;
            summary.processed += 1;
            if succeeded {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
        }

        self.tracker.save_if_dirty()?;
        Ok(())
    }

    /// Invite fresh seats up to the configured per-team count.
    async fn provision_missing_seats(&mut self, team_name: &str) -> CoreResult<()> {
        let target = self.settings.account.accounts_per_team;
        let mut have = self.tracker.count(team_name);

        while have < target {
            self.cancel.check()?;
            let mailbox = self.email.create_email().await?;

            if self.blacklist.is_email_blacklisted(&mailbox.address) {
                log::warn!(
                    "[{team_name}] Provisioned address on blacklisted domain, discarding: {}",
                    mailbox.address
                );
                continue;
            }

            self.tracker.upsert(
                team_name,
                &mailbox.address,
                AccountStatus::Invited,
                Some(&self.settings.account.default_password),
                Some(AccountRole::Member),
            );
            log::info!("[{team_name}] Seat invited: {}", mailbox.address);
            have += 1;
        }

        self.tracker.save_if_dirty()?;
        Ok(())
    }

    /// Drive one tracked account as far as it can go this run. Returns
    /// whether it reached `completed`.
    async fn process_account(
        &mut self,
        team_name: &str,
        account: &TrackedAccount,
    ) -> CoreResult<bool> {
        log::info!(
            "[{team_name}] Processing {} (status: {})",
            account.email,
            account.status
        );

        // Registration / login steps by current status
        match account.status {
            AccountStatus::Invited => {
                let ok = self
                    .browser
                    .register(&account.email, &account.password)
                    .await?;
                if !ok {
                    log::warn!("[{team_name}] Registration failed: {}", account.email);
                    self.record_failure(team_name, account, AccountStatus::Failed);
                    return Ok(false);
                }
                self.tracker.upsert(
                    team_name,
                    &account.email,
                    AccountStatus::Registered,
                    None,
                    None,
                );
            }
            AccountStatus::TeamOwner => {
                // Legacy-format owners authenticate via the OTP login path
                let ok = self.browser.login(&account.email, &account.password).await?;
                if !ok {
                    log::warn!("[{team_name}] Owner login failed: {}", account.email);
                    // Status stays team_owner so the next run retries the login
                    return Ok(false);
                }
            }
            _ => {
                if !self.browser.is_logged_in().await.unwrap_or(false) {
                    let ok = self.browser.login(&account.email, &account.password).await?;
                    if !ok {
                        log::warn!("[{team_name}] Login failed: {}", account.email);
                        return Ok(false);
                    }
                }
            }
        }

        self.cancel.check()?;

        // Authorization + pool insertion
        let result = self
            .orchestrator
            .authorize(&account.email, self.handoff.as_ref())
            .await;
        match result {
            Ok(outcome) => {
                let pool_id = match &outcome {
                    AuthOutcome::Provisioned(backend_account) => {
                        backend_account.id.clone().unwrap_or_default()
                    }
                    AuthOutcome::AlreadyPresent => String::new(),
                };
                self.tracker.upsert(
                    team_name,
                    &account.email,
                    AccountStatus::Completed,
                    None,
                    None,
                );
                if account.role == AccountRole::Owner {
                    self.mark_owner_authorized(team_name);
                }
                self.export_row(team_name, account, "success", &pool_id);
                Ok(true)
            }
            Err(CoreError::AuthorizationFailed { stage, source }) => {
                let err = CoreError::AuthorizationFailed { stage, source };
                if err.is_expected() {
                    log::warn!("[{team_name}] {err}");
                } else {
                    log::error!("[{team_name}] {err}");
                }
                let resume = resume_status(account.status, stage);
                self.record_failure(team_name, account, resume);
                Ok(false)
            }
            Err(other) => Err(other),
        }
    }

    fn record_failure(&mut self, team_name: &str, account: &TrackedAccount, status: AccountStatus) {
        self.tracker
            .upsert(team_name, &account.email, status, None, None);
        self.export_row(team_name, account, "failed", "");
    }

    fn export_row(&self, team_name: &str, account: &TrackedAccount, status: &str, pool_id: &str) {
        let record = ExportRecord {
            email: account.email.clone(),
            password: account.password.clone(),
            team: team_name.to_string(),
            status: status.to_string(),
            pool_id: pool_id.to_string(),
        };
        if let Err(e) = self.csv.append(&record) {
            log::warn!("CSV export failed: {e}");
        }
    }

    fn mark_owner_authorized(&mut self, team_name: &str) {
        if self
            .team_store
            .get(team_name)
            .is_some_and(|t| t.format == TeamFormat::Current)
        {
            self.team_store.set_authorized(team_name);
        }
    }
}

/// Map a failed attempt back to the tracker status the next run should
/// resume from. Owners on the OTP path stay `team_owner`; everyone else
/// falls back to `registered`: registration held, authorization is what
/// gets retried.
fn resume_status(previous: AccountStatus, _failed_at: AuthStage) -> AccountStatus {
    if previous == AccountStatus::TeamOwner {
        AccountStatus::TeamOwner
    } else {
        AccountStatus::Registered
    }
}

/// Mirror already-known team-owner credentials into the CRS pool.
///
/// A bulk idempotent import, not interactive authorization: token-less
/// teams are skipped, accounts already present are skipped, the rest are
/// inserted directly. Returns the number of owners imported.
pub async fn crs_sync_team_owners(settings: &Settings, team_store: &TeamStore) -> usize {
    if !settings.backend.include_team_owners {
        return 0;
    }
    let teams = team_store.teams();
    if teams.is_empty() {
        log::warn!("Team store is empty, no owners to sync");
        return 0;
    }

    let pool = settings.proxy_pool();
    let backend = CrsBackend::new(
        settings.crs.api_base.clone(),
        settings.crs.admin_token.clone(),
        &settings.transport_options(&pool),
    );

    log::info!("Syncing {} team owner(s) to CRS...", teams.len());
    let mut synced = 0;

    for team in teams {
        if team.owner_email.is_empty() || team.auth_token.is_empty() {
            log::warn!("Team record incomplete, skipping: {}", team.owner_email);
            continue;
        }

        match backend.account_exists(&team.owner_email).await {
            Ok(true) => {
                log::info!("Account already in CRS: {}", team.owner_email);
                continue;
            }
            Ok(false) => {}
            Err(e) => {
                log::warn!("Existence check failed for {}: {e}", team.owner_email);
                continue;
            }
        }

        let import = OwnerImport {
            email: team.owner_email.clone(),
            access_token: team.auth_token.clone(),
            user_id: team.owner_user_id.clone(),
            plan_type: team.plan_type.clone(),
            organization_id: team.org_id.clone(),
        };
        match backend.add_owner_account(&import).await {
            Ok(_) => {
                log::info!("Team owner added to CRS: {}", team.owner_email);
                synced += 1;
            }
            Err(e) => log::error!("Failed to add team owner {}: {e}", team.owner_email),
        }
    }

    log::info!("Team owner sync complete: {synced}/{}", teams.len());
    synced
}
