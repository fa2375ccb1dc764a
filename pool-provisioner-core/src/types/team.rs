//! Team types: normalization of the two on-disk credential shapes.
//!
//! The team store carries records in two shapes: a legacy one where
//! `account` is an object and a current one where it is the owner's email
//! string. Both normalize into [`Team`] at load time; neither raw shape
//! leaks past the loader.

use serde::{Deserialize, Serialize};

/// Which on-disk shape a team record came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TeamFormat {
    /// `{ user: { email }, account: { id, organizationId }, accessToken }`
    Legacy,
    /// `{ account: <email>, password?, token?, account_id?, authorized? }`
    Current,
}

/// A team record as it appears on disk. The `account` field's type is the
/// format discriminator: a string means current, an object means legacy.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TeamRecord {
    Current {
        /// Owner email.
        account: String,
        #[serde(default)]
        password: String,
        #[serde(default)]
        token: String,
        #[serde(default)]
        account_id: String,
        #[serde(default)]
        authorized: bool,
    },
    Legacy {
        #[serde(default)]
        user: LegacyUser,
        #[serde(default)]
        account: LegacyAccount,
        #[serde(rename = "accessToken", default)]
        access_token: String,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyUser {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyAccount {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "organizationId", default)]
    pub organization_id: String,
    #[serde(rename = "planType", default)]
    pub plan_type: String,
}

/// The normalized internal team representation.
#[derive(Debug, Clone)]
pub struct Team {
    /// Unique key: the owner email's local part, or `Team{n}` when absent.
    pub name: String,
    pub account_id: String,
    pub org_id: String,
    pub auth_token: String,
    pub owner_email: String,
    pub owner_password: String,
    /// Upstream user ID (legacy records only).
    pub owner_user_id: String,
    /// Plan type (legacy records only).
    pub plan_type: String,
    /// Current-format team without a token: the owner must log in first.
    pub needs_login: bool,
    /// Whether this team's owner already completed authorization.
    pub authorized: bool,
    pub format: TeamFormat,
}

impl Team {
    /// Normalize a raw record. `index` feeds the `Team{n}` fallback name.
    #[must_use]
    pub fn from_record(record: TeamRecord, index: usize) -> Self {
        match record {
            TeamRecord::Current {
                account,
                password,
                token,
                account_id,
                authorized,
            } => Self {
                name: name_from_email(&account, index),
                account_id,
                org_id: String::new(),
                auth_token: token.clone(),
                owner_email: account,
                owner_password: password,
                owner_user_id: String::new(),
                plan_type: String::new(),
                needs_login: token.is_empty(),
                authorized,
                format: TeamFormat::Current,
            },
            TeamRecord::Legacy {
                user,
                account,
                access_token,
            } => Self {
                name: name_from_email(&user.email, index),
                account_id: account.id,
                org_id: account.organization_id,
                auth_token: access_token,
                owner_email: user.email,
                owner_password: String::new(),
                owner_user_id: user.id,
                plan_type: account.plan_type,
                needs_login: false,
                authorized: false,
                format: TeamFormat::Legacy,
            },
        }
    }
}

fn name_from_email(email: &str, index: usize) -> String {
    match email.split_once('@') {
        Some((local, _)) if !local.is_empty() => local.to_string(),
        _ => format!("Team{}", index + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_record_normalizes() {
        let record: TeamRecord = serde_json::from_str(
            r#"{"user":{"email":"a@b.com"},"account":{"id":"1","organizationId":"o1"},"accessToken":"tok"}"#,
        )
        .unwrap();
        let team = Team::from_record(record, 0);
        assert_eq!(team.auth_token, "tok");
        assert_eq!(team.org_id, "o1");
        assert_eq!(team.account_id, "1");
        assert_eq!(team.name, "a");
        assert_eq!(team.owner_email, "a@b.com");
        assert_eq!(team.format, TeamFormat::Legacy);
        assert!(!team.authorized);
    }

    #[test]
    fn current_record_normalizes() {
        let record: TeamRecord =
            serde_json::from_str(r#"{"account":"x@y.com","token":"t1","authorized":true}"#)
                .unwrap();
        let team = Team::from_record(record, 0);
        assert!(!team.needs_login);
        assert!(team.authorized);
        assert_eq!(team.name, "x");
        assert_eq!(team.auth_token, "t1");
        assert_eq!(team.format, TeamFormat::Current);
    }

    #[test]
    fn current_record_without_token_needs_login() {
        let record: TeamRecord =
            serde_json::from_str(r#"{"account":"x@y.com","password":"pw"}"#).unwrap();
        let team = Team::from_record(record, 0);
        assert!(team.needs_login);
        assert_eq!(team.owner_password, "pw");
        assert!(!team.authorized);
    }

    #[test]
    fn missing_email_falls_back_to_indexed_name() {
        let record: TeamRecord = serde_json::from_str(r#"{"accessToken":"tok"}"#).unwrap();
        let team = Team::from_record(record, 2);
        assert_eq!(team.name, "Team3");
        assert_eq!(team.format, TeamFormat::Legacy);
    }

    #[test]
    fn account_field_type_is_the_discriminator() {
        let current: TeamRecord = serde_json::from_str(r#"{"account":"x@y.com"}"#).unwrap();
        assert!(matches!(current, TeamRecord::Current { .. }));

        let legacy: TeamRecord = serde_json::from_str(r#"{"account":{"id":"1"}}"#).unwrap();
        assert!(matches!(legacy, TeamRecord::Legacy { .. }));
    }
}
