//! Caller session derived from the `account` config section.

use webapps_common::HstsMode;

use crate::application::ports::SessionContext;
use crate::domain::config::AccountConfig;

pub struct ConfigSession {
    username: String,
    domain: String,
    hsts: HstsMode,
}

impl ConfigSession {
    #[must_use]
    pub fn new(account: &AccountConfig) -> Self {
        let username = account
            .username
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .unwrap_or_default();
        Self {
            username,
            domain: account.domain.clone(),
            hsts: account.hsts,
        }
    }
}

impl SessionContext for ConfigSession {
    fn username(&self) -> String {
        self.username.clone()
    }

    fn domain(&self) -> String {
        self.domain.clone()
    }

    fn hsts_preference(&self) -> HstsMode {
        self.hsts
    }
}
