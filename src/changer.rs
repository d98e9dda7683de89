//! Rotation of harvester login passwords.
//!
//! For hosts enabled for password changes, Saturn's SFTP configs are kept in
//! step with the repository: once the repository reports a password as
//! active for today, the config's login password is replaced with it.

use tracing::info;

use crate::config::Config;
use crate::error::SyncResult;
use crate::repository::SaturnClient;
use crate::traits::HttpClient;

/// Counts gathered during one rotation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeReport {
    pub configs_checked: usize,
    pub configs_changed: usize,
}

/// Pushes newly active repository passwords into SFTP configs.
pub struct PasswordChanger<'a, C> {
    saturn: &'a SaturnClient<C>,
    config: &'a Config,
}

impl<'a, C: HttpClient> PasswordChanger<'a, C> {
    pub fn new(saturn: &'a SaturnClient<C>, config: &'a Config) -> Self {
        Self { saturn, config }
    }

    /// Apply the passwords the repository expects to be in use on `today`
    /// (an internal date) to every allow-listed SFTP config.
    pub async fn change_passwords(&self, today: &str) -> SyncResult<ChangeReport> {
        let mut report = ChangeReport::default();
        let configs = self.saturn.list_sftp_configs().await?;

        for host in &self.config.password_change_enabled_sftp_hosts {
            info!("Checking password changes for host {}", host);
            for sftp_config in configs.iter().filter(|c| c.is_for_host(host)) {
                report.configs_checked += 1;

                let candidate = self
                    .saturn
                    .password_for_date(&sftp_config.host, &sftp_config.username, today)
                    .await?;

                match candidate.replacement_for(&sftp_config.password) {
                    Some(active) => {
                        info!(
                            "Changing password of '{}' ({}@{}), active from {}",
                            sftp_config.name, sftp_config.username, sftp_config.host, active.active_from
                        );
                        let mut updated = sftp_config.clone();
                        updated.password = active.password.clone();
                        self.saturn.save_sftp_config(&updated).await?;
                        report.configs_changed += 1;
                    }
                    None => info!(
                        "Unchanged: '{}' ({}@{})",
                        sftp_config.name, sftp_config.username, sftp_config.host
                    ),
                }
            }
        }

        info!(
            "Password change done: {} configs checked, {} changed",
            report.configs_checked, report.configs_changed
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use serde_json::json;

    const BASE: &str = "http://saturn";
    const CONFIGS: &str = "http://saturn/configs/sftp/list";
    const SAVE: &str = "http://saturn/configs/sftp/add";
    const TODAY: &str = "2024-02-01T00:00:00";

    fn candidate_url(host: &str) -> String {
        format!("http://saturn/passwordrepository/{}/harvest/{}", host, TODAY)
    }

    fn setup(hosts: &[&str]) -> (SaturnClient<MockHttpClient>, Config) {
        let saturn = SaturnClient::new(BASE, MockHttpClient::new());
        saturn.http().set_response(
            CONFIGS,
            MockResponse::json(json!([
                {"id": 7, "name": "a", "host": "h1", "port": 22, "username": "harvest",
                 "password": "old", "schedule": "0 0 * * *"},
                {"id": 8, "name": "b", "host": "h2", "port": 22, "username": "harvest",
                 "password": "old"}
            ])),
        );
        saturn.http().set_response(SAVE, MockResponse::status(200));
        let config = Config::default().with_enabled_hosts(hosts.iter().copied());
        (saturn, config)
    }

    #[tokio::test]
    async fn test_differing_password_is_saved() {
        let (saturn, config) = setup(&["h1"]);
        saturn.http().set_response(
            &candidate_url("h1"),
            MockResponse::json(json!({
                "host": "h1", "username": "harvest",
                "password": "bmV3", "activeFrom": "2024-01-15T00:00:00"
            })),
        );

        let report = PasswordChanger::new(&saturn, &config)
            .change_passwords(TODAY)
            .await
            .unwrap();

        assert_eq!(report, ChangeReport { configs_checked: 1, configs_changed: 1 });
        let posts = saturn.http().requests_with_method("POST");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].url, SAVE);
        let body = posts[0].json_body().unwrap();
        assert_eq!(body["password"], "new");
        // untyped fields survive the round trip
        assert_eq!(body["id"], 7);
        assert_eq!(body["schedule"], "0 0 * * *");
    }

    #[tokio::test]
    async fn test_equal_password_is_unchanged() {
        let (saturn, config) = setup(&["h1"]);
        saturn.http().set_response(
            &candidate_url("h1"),
            MockResponse::json(json!({
                "host": "h1", "username": "harvest",
                "password": "b2xk", "activeFrom": "2024-01-15T00:00:00"
            })),
        );

        let report = PasswordChanger::new(&saturn, &config)
            .change_passwords(TODAY)
            .await
            .unwrap();

        assert_eq!(report.configs_changed, 0);
        assert!(saturn.http().requests_with_method("POST").is_empty());
    }

    #[tokio::test]
    async fn test_no_active_entry_is_unchanged() {
        let (saturn, config) = setup(&["h1"]);
        saturn.http().set_response(
            &candidate_url("h1"),
            MockResponse::json(json!({"host": "h1", "username": "harvest"})),
        );

        let report = PasswordChanger::new(&saturn, &config)
            .change_passwords(TODAY)
            .await
            .unwrap();

        assert_eq!(report.configs_checked, 1);
        assert!(saturn.http().requests_with_method("POST").is_empty());
    }

    #[tokio::test]
    async fn test_only_enabled_hosts_are_checked() {
        let (saturn, config) = setup(&[]);

        let report = PasswordChanger::new(&saturn, &config)
            .change_passwords(TODAY)
            .await
            .unwrap();

        assert_eq!(report.configs_checked, 0);
        assert_eq!(saturn.http().get_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_save_propagates() {
        let (saturn, config) = setup(&["h1", "h2"]);
        saturn.http().set_response(SAVE, MockResponse::status(503));
        saturn.http().set_response(
            &candidate_url("h1"),
            MockResponse::json(json!({"password": "bmV3", "activeFrom": "2024-01-15T00:00:00"})),
        );

        let err = PasswordChanger::new(&saturn, &config)
            .change_passwords(TODAY)
            .await
            .unwrap_err();

        assert_eq!(err.http_status(), Some(503));
        assert!(saturn
            .http()
            .get_requests()
            .iter()
            .all(|r| r.url != candidate_url("h2")));
    }
}
