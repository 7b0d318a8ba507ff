use std::env;

/// Bootstrap settings for the primary power admin account.
///
/// The account whose email matches `POWER_ADMIN_EMAIL` is granted the
/// `power` role automatically at registration and re-asserted at every
/// login, so the site always has at least one power admin.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub power_admin_email: Option<String>,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            power_admin_email: env::var("POWER_ADMIN_EMAIL")
                .ok()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        }
    }

    /// Whether `email` is the configured primary power admin.
    pub fn is_power_admin_email(&self, email: &str) -> bool {
        self.power_admin_email
            .as_deref()
            .is_some_and(|configured| configured.eq_ignore_ascii_case(email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_power_admin_email_case_insensitive() {
        let config = AuthConfig {
            power_admin_email: Some("root@school.edu".to_string()),
        };
        assert!(config.is_power_admin_email("Root@School.edu"));
        assert!(!config.is_power_admin_email("other@school.edu"));
    }

    #[test]
    fn test_unset_power_admin_email_matches_nothing() {
        let config = AuthConfig {
            power_admin_email: None,
        };
        assert!(!config.is_power_admin_email("root@school.edu"));
    }
}
