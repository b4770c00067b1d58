#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use tempfile::tempdir;

    use crate::config::{ RegistryOptions, DEFAULT_AUTO_TRANSFER_DAYS };
    use crate::implementations::config::{
        ConfigError,
        EstateConfig,
        ENV_AUTO_TRANSFER_DAYS,
        ENV_EVENT_LOG,
        ENV_STATE_PATH,
    };
    use crate::models::common::{ OutputFormat, PrincipalId, Timestamp, SECONDS_PER_DAY };

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EstateConfig::default();
        assert_eq!(config.state_path, PathBuf::from("estate.json"));
        assert_eq!(config.event_log_path, None);
        assert_eq!(config.auto_transfer_after_days, DEFAULT_AUTO_TRANSFER_DAYS);
        assert_eq!(config.registry_options(), RegistryOptions::default());
        assert_eq!(RegistryOptions::default().auto_transfer_after_secs, 365 * SECONDS_PER_DAY);
    }

    #[test]
    fn test_from_file_fills_missing_fields_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("estate.yaml");
        std::fs::write(&path, "event_log_path: /var/lib/estate/events.jsonl\nauto_transfer_after_days: 90\n").unwrap();

        let config = EstateConfig::from_file(&path).unwrap();

        assert_eq!(config.state_path, PathBuf::from("estate.json"));
        assert_eq!(config.event_log_path, Some(PathBuf::from("/var/lib/estate/events.jsonl")));
        assert_eq!(config.registry_options().auto_transfer_after_secs, 90 * SECONDS_PER_DAY);
    }

    #[test]
    fn test_from_file_rejects_zero_threshold() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("estate.yaml");
        std::fs::write(&path, "auto_transfer_after_days: 0\n").unwrap();

        let result = EstateConfig::from_file(&path);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_from_file_reports_parse_and_read_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("estate.yaml");
        std::fs::write(&path, "auto_transfer_after_days: [not, a, number]\n").unwrap();
        assert!(matches!(EstateConfig::from_file(&path), Err(ConfigError::ParseError(_))));

        let missing = dir.path().join("missing.yaml");
        assert!(matches!(EstateConfig::from_file(&missing), Err(ConfigError::FileReadError(_))));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = EstateConfig::default()
            .with_overrides(
                lookup(
                    &[
                        (ENV_STATE_PATH, "/tmp/registry.json"),
                        (ENV_EVENT_LOG, "/tmp/events.jsonl"),
                        (ENV_AUTO_TRANSFER_DAYS, " 30 "),
                    ]
                )
            )
            .unwrap();

        assert_eq!(config.state_path, PathBuf::from("/tmp/registry.json"));
        assert_eq!(config.event_log_path, Some(PathBuf::from("/tmp/events.jsonl")));
        assert_eq!(config.auto_transfer_after_days, 30);
    }

    #[test]
    fn test_empty_event_log_override_disables_journal() {
        let mut config = EstateConfig::default();
        config.event_log_path = Some(PathBuf::from("events.jsonl"));

        let config = config.with_overrides(lookup(&[(ENV_EVENT_LOG, "")])).unwrap();
        assert_eq!(config.event_log_path, None);
    }

    #[test]
    fn test_invalid_threshold_override_is_rejected() {
        let result = EstateConfig::default().with_overrides(lookup(&[(ENV_AUTO_TRANSFER_DAYS, "soon")]));
        match result {
            Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, ENV_AUTO_TRANSFER_DAYS),
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_timestamp_parsing_accepts_seconds_and_rfc3339() {
        assert_eq!(Timestamp::parse("1700000000").unwrap(), Timestamp(1_700_000_000));
        assert_eq!(Timestamp::parse("2023-11-14T22:13:20Z").unwrap(), Timestamp(1_700_000_000));
        assert_eq!(Timestamp::parse("2023-11-15T00:13:20+02:00").unwrap(), Timestamp(1_700_000_000));
        assert!(Timestamp::parse("1969-12-31T23:59:59Z").is_err());
        assert!(Timestamp::parse("next tuesday").is_err());
        assert_eq!(Timestamp(1_700_000_000).to_string(), "2023-11-14T22:13:20Z");
    }

    #[test]
    fn test_principal_and_format_parsing() {
        assert_eq!(" alice ".parse::<PrincipalId>().unwrap(), PrincipalId::new("alice"));
        assert!("   ".parse::<PrincipalId>().is_err());
        assert_eq!(PrincipalId::unset().to_string(), "<none>");

        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
