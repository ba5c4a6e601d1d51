//! `[admin]` section configuration.
//!
//! Keystroke gate parameters and the single admin account checked by
//! [`ConfigIdentity`](crate::admin::ConfigIdentity).

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[admin]` section in cricket-hub.toml.
///
/// # Example
/// ```toml
/// [admin]
/// email = "editor@crickethub.co.in"
/// password_hash = "$argon2id$v=19$..."  # from `cricket-hub hash-password`
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
    /// Keystroke sequence revealing the sign-in form.
    #[serde(default = "defaults::admin::sequence")]
    #[educe(Default = defaults::admin::sequence())]
    pub sequence: String,

    /// Number of trailing keystrokes remembered.
    #[serde(default = "defaults::admin::window")]
    #[educe(Default = defaults::admin::window())]
    pub window: usize,

    /// Idle time after which the remembered keystrokes are dropped.
    #[serde(default = "defaults::admin::idle_reset_ms")]
    #[educe(Default = defaults::admin::idle_reset_ms())]
    pub idle_reset_ms: u64,

    /// Admin account email. Empty disables sign-in.
    #[serde(default)]
    pub email: String,

    /// argon2id PHC string of the admin password.
    #[serde(default)]
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_admin_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.admin.sequence, "cricadmin");
        assert_eq!(config.admin.window, 10);
        assert_eq!(config.admin.idle_reset_ms, 2000);
        assert!(config.admin.email.is_empty());
    }

    #[test]
    fn test_admin_config_credentials() {
        let config = r#"
            [admin]
            email = "editor@crickethub.co.in"
            password_hash = "abc123"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.admin.email, "editor@crickethub.co.in");
        assert_eq!(config.admin.password_hash, "abc123");
    }
}
