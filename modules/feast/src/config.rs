use serde::{Deserialize, Serialize};

use crate::contract::model::Language;
use crate::domain::lifecycle::TransitionPolicy;

/// Configuration for the feast module, read from `modules.feast`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeastConfig {
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
    #[serde(default = "default_max_login_attempts")]
    pub max_login_attempts: u32,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub transition_policy: TransitionPolicy,
    #[serde(default = "default_watch_interval_sec")]
    pub watch_interval_sec: u64,
}

impl Default for FeastConfig {
    fn default() -> Self {
        Self {
            admin_password: default_admin_password(),
            max_login_attempts: default_max_login_attempts(),
            language: Language::default(),
            transition_policy: TransitionPolicy::default(),
            watch_interval_sec: default_watch_interval_sec(),
        }
    }
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

fn default_max_login_attempts() -> u32 {
    5
}

fn default_watch_interval_sec() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: FeastConfig = serde_json::from_value(serde_json::json!({
            "language": "fr",
            "transition_policy": "lifecycle"
        }))
        .unwrap();

        assert_eq!(cfg.language, Language::Fr);
        assert_eq!(cfg.transition_policy, TransitionPolicy::Lifecycle);
        assert_eq!(cfg.admin_password, "admin123");
        assert_eq!(cfg.max_login_attempts, 5);
        assert_eq!(cfg.watch_interval_sec, 5);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res: Result<FeastConfig, _> =
            serde_json::from_value(serde_json::json!({"admin_pasword": "x"}));
        assert!(res.is_err());
    }
}
