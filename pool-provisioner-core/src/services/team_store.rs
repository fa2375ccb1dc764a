//! Team store
//!
//! Loads the ordered team credential records, auto-detecting the legacy and
//! current on-disk shapes and normalizing both into [`Team`]. Raw records
//! are retained so that dynamically discovered data (account IDs, tokens,
//! the authorized flag) can be written back; current-format records only,
//! since legacy records are never mutated at runtime.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::types::{Team, TeamFormat, TeamRecord};

pub struct TeamStore {
    path: PathBuf,
    /// Raw records, index-aligned with `teams`.
    raw: Vec<Value>,
    teams: Vec<Team>,
}

impl TeamStore {
    /// Load and normalize the team file. A missing file yields an empty
    /// store with a warning; an unparsable one is a hard error.
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let raw_records: Vec<Value> = match std::fs::read_to_string(&path) {
            Ok(raw) => {
                let parsed: Value = serde_json::from_str(&raw)
                    .map_err(|e| CoreError::TeamStore(format!("{}: {e}", path.display())))?;
                // A single bare record is tolerated
                match parsed {
                    Value::Array(items) => items,
                    other => vec![other],
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("Team file not found: {}", path.display());
                vec![]
            }
            Err(e) => {
                return Err(CoreError::TeamStore(format!("{}: {e}", path.display())));
            }
        };

        let mut teams = Vec::with_capacity(raw_records.len());
        for (index, value) in raw_records.iter().enumerate() {
            let record: TeamRecord = serde_json::from_value(value.clone()).map_err(|e| {
                CoreError::TeamStore(format!("record {index} has an unrecognized shape: {e}"))
            })?;
            teams.push(Team::from_record(record, index));
        }

        if !teams.is_empty() {
            log::info!("Loaded {} team record(s)", teams.len());
        }
        Ok(Self {
            path,
            raw: raw_records,
            teams,
        })
    }

    /// The normalized teams, in file order.
    #[must_use]
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }

    /// Record a discovered account ID for a team.
    pub fn set_account_id(&mut self, name: &str, account_id: &str) {
        if let Some(team) = self.teams.iter_mut().find(|t| t.name == name) {
            team.account_id = account_id.to_string();
        }
    }

    /// Record a discovered auth token for a team.
    pub fn set_auth_token(&mut self, name: &str, token: &str) {
        if let Some(team) = self.teams.iter_mut().find(|t| t.name == name) {
            team.auth_token = token.to_string();
            team.needs_login = token.is_empty();
        }
    }

    /// Mark a team's owner as authorized.
    pub fn set_authorized(&mut self, name: &str) {
        if let Some(team) = self.teams.iter_mut().find(|t| t.name == name) {
            team.authorized = true;
        }
    }

    /// Write discovered data back into the raw records and persist.
    ///
    /// Only current-format teams are written back, and only when something
    /// actually changed; returns whether a write happened.
    pub fn save(&mut self) -> CoreResult<bool> {
        let mut updated = false;

        for (team, raw) in self.teams.iter().zip(self.raw.iter_mut()) {
            if team.format != TeamFormat::Current {
                continue;
            }
            let Some(obj) = raw.as_object_mut() else {
                continue;
            };

            if !team.account_id.is_empty()
                && obj.get("account_id").and_then(Value::as_str) != Some(team.account_id.as_str())
            {
                obj.insert("account_id".to_string(), Value::from(team.account_id.clone()));
                updated = true;
            }
            if !team.auth_token.is_empty()
                && obj.get("token").and_then(Value::as_str) != Some(team.auth_token.as_str())
            {
                obj.insert("token".to_string(), Value::from(team.auth_token.clone()));
                updated = true;
            }
            if team.authorized && obj.get("authorized").and_then(Value::as_bool) != Some(true) {
                obj.insert("authorized".to_string(), Value::from(true));
                updated = true;
            }
        }

        if !updated {
            return Ok(false);
        }

        let json = serde_json::to_string_pretty(&self.raw)?;
        std::fs::write(&self.path, json)
            .map_err(|e| CoreError::Storage(format!("{}: {e}", self.path.display())))?;
        Ok(true)
    }
}
