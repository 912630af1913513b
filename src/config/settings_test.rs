#[cfg(test)]
mod tests {
    use crate::config::settings::Settings;

    #[test]
    fn test_defaults_load_without_config_file() {
        let settings = Settings::new().expect("defaults should deserialize");

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 3000);

        assert_eq!(settings.worker.concurrency, 1);
        assert_eq!(settings.schedule.daily_cron, "0 6 * * *");
        assert_eq!(settings.schedule.keep_completed, 500);
        assert_eq!(settings.schedule.keep_failed, 200);

        assert!(settings.site.homepage_url.starts_with("https://"));
        assert!(settings.site.status_url.contains("showCauselistUploadStatus"));
    }
}
