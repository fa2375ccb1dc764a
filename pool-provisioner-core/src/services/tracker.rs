//! Account tracker
//!
//! The durable per-account lifecycle ledger that makes the pipeline
//! idempotent and restartable. The whole file is loaded into memory at
//! start and written back as one atomic overwrite per batch of mutations,
//! trading a small window of loss on crash for reduced I/O. Cross-process
//! use of one tracker file is unsupported (last-writer-wins, no locking).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{AccountRole, AccountStatus, Team, TeamFormat, TrackedAccount};
use crate::utils::datetime::format_timestamp;

/// On-disk shape: `{"teams": {<name>: [accounts]}, "last_updated": ts}`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct TrackerFile {
    #[serde(default)]
    teams: BTreeMap<String, Vec<TrackedAccount>>,
    #[serde(default)]
    last_updated: Option<String>,
}

/// Durable state store mapping (team, email) to a lifecycle status.
#[derive(Debug)]
pub struct AccountTracker {
    path: PathBuf,
    data: TrackerFile,
    dirty: bool,
}

impl AccountTracker {
    /// Load the tracker, starting empty when the file does not exist.
    ///
    /// An unreadable file is a warning, not a hard error: losing the resume
    /// state degrades to reprocessing, which upsert-by-email keeps safe.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let data = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(data) => data,
                Err(e) => {
                    log::warn!("Failed to parse tracker file {}: {e}", path.display());
                    TrackerFile::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => TrackerFile::default(),
            Err(e) => {
                log::warn!("Failed to read tracker file {}: {e}", path.display());
                TrackerFile::default()
            }
        };
        Self {
            path,
            data,
            dirty: false,
        }
    }

    /// Insert or update the (team, email) entry: the single mutation
    /// primitive every status transition funnels through, which is what
    /// guarantees at most one row per (team, email).
    ///
    /// Existing entries get the new status (and password/role when given)
    /// and a refreshed `updated_at`; new entries are appended with
    /// `created_at = updated_at = now`.
    pub fn upsert(
        &mut self,
        team: &str,
        email: &str,
        status: AccountStatus,
        password: Option<&str>,
        role: Option<AccountRole>,
    ) {
        let now = Utc::now();
        let accounts = self.data.teams.entry(team.to_string()).or_default();

        if let Some(existing) = accounts.iter_mut().find(|a| a.email == email) {
            existing.status = status;
            if let Some(password) = password {
                existing.password = password.to_string();
            }
            if let Some(role) = role {
                existing.role = role;
            }
            existing.updated_at = now;
        } else {
            accounts.push(TrackedAccount {
                email: email.to_string(),
                password: password.unwrap_or_default().to_string(),
                status,
                role: role.unwrap_or_default(),
                created_at: now,
                updated_at: now,
            });
        }
        self.dirty = true;
    }

    /// Accounts of a team that still need processing: everything whose
    /// status is not `completed`. This is the resumption queue consulted on
    /// every restart.
    #[must_use]
    pub fn list_incomplete(&self, team: &str) -> Vec<TrackedAccount> {
        self.data
            .teams
            .get(team)
            .map(|accounts| {
                accounts
                    .iter()
                    .filter(|a| !a.status.is_complete())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Incomplete accounts across all teams, keyed by team name.
    #[must_use]
    pub fn all_incomplete(&self) -> BTreeMap<String, Vec<TrackedAccount>> {
        self.data
            .teams
            .keys()
            .filter_map(|team| {
                let incomplete = self.list_incomplete(team);
                if incomplete.is_empty() {
                    None
                } else {
                    Some((team.clone(), incomplete))
                }
            })
            .collect()
    }

    /// Explicitly evict an entry, forcing it to be reprocessed from scratch.
    pub fn remove(&mut self, team: &str, email: &str) -> bool {
        let Some(accounts) = self.data.teams.get_mut(team) else {
            return false;
        };
        let before = accounts.len();
        accounts.retain(|a| a.email != email);
        let removed = accounts.len() < before;
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// Number of tracked accounts for a team.
    #[must_use]
    pub fn count(&self, team: &str) -> usize {
        self.data.teams.get(team).map_or(0, Vec::len)
    }

    /// Look up a single entry.
    #[must_use]
    pub fn get(&self, team: &str, email: &str) -> Option<&TrackedAccount> {
        self.data
            .teams
            .get(team)?
            .iter()
            .find(|a| a.email == email)
    }

    /// Seed the tracker with team owners that should go through the
    /// authorization flow. Token-less teams are skipped (they are handled
    /// separately at login time), as are owners already tracked.
    ///
    /// Entry status depends on the record shape: current-format owners enter
    /// as `completed` when already authorized and `registered` otherwise;
    /// legacy-format owners enter as `team_owner` (the OTP login path).
    pub fn add_team_owners(&mut self, teams: &[Team], default_password: &str) -> usize {
        let mut added = 0;

        for team in teams {
            if team.auth_token.is_empty() {
                continue;
            }
            if team.name.is_empty() || team.owner_email.is_empty() {
                continue;
            }
            if self.get(&team.name, &team.owner_email).is_some() {
                continue;
            }

            let status = match team.format {
                TeamFormat::Current => {
                    if team.authorized {
                        AccountStatus::Completed
                    } else {
                        AccountStatus::Registered
                    }
                }
                TeamFormat::Legacy => AccountStatus::TeamOwner,
            };

            let password = if team.owner_password.is_empty() {
                default_password
            } else {
                &team.owner_password
            };

            self.upsert(
                &team.name,
                &team.owner_email,
                status,
                Some(password),
                Some(AccountRole::Owner),
            );
            log::info!(
                "Team owner tracked: {} -> {} (format: {:?}, status: {status})",
                team.owner_email,
                team.name,
                team.format
            );
            added += 1;
        }

        if added > 0 {
            log::info!("Added {added} team owner(s) to the tracker");
        }
        added
    }

    /// Whether any mutation since the last save is unpersisted.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Persist the whole tracker as one atomic overwrite (temp file +
    /// rename), refreshing `last_updated`.
    pub fn save(&mut self) -> CoreResult<()> {
        self.data.last_updated = Some(format_timestamp(&Utc::now()));

        let json = serde_json::to_string_pretty(&self.data)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)
            .map_err(|e| CoreError::Storage(format!("{}: {e}", tmp_path.display())))?;
        std::fs::rename(&tmp_path, &self.path)
            .map_err(|e| CoreError::Storage(format!("{}: {e}", self.path.display())))?;

        self.dirty = false;
        Ok(())
    }

    /// Save only when there are unpersisted mutations.
    pub fn save_if_dirty(&mut self) -> CoreResult<()> {
        if self.dirty {
            self.save()?;
        }
        Ok(())
    }

    /// The `last_updated` timestamp recorded at the most recent save.
    #[must_use]
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        let raw = self.data.last_updated.as_deref()?;
        chrono::NaiveDateTime::parse_from_str(raw, crate::utils::datetime::FORMAT)
            .map(|naive| naive.and_utc())
            .ok()
    }
}
