//! Tests for configuration

#[cfg(test)]
mod tests {
    use super::super::combiner::{CombineMode, DegeneratePolicy};
    use super::super::config::*;
    use std::collections::HashMap;
    use std::io::Write;

    /// Environment source with fixed variables instead of the process environment
    fn env_with(vars: &[(&str, &str)]) -> ::config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::environment().source(Some(map))
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.combiner.mode, CombineMode::Legacy);
        assert!(!config.combiner.validate_inputs);
        assert_eq!(config.combiner.degenerate, DegeneratePolicy::Propagate);
        assert!(!config.combiner.normalize_weights);
        assert_eq!(config.logging.filter, "ensemble_combiner=info");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_combiner_section() {
        let toml_str = r#"
[combiner]
mode = "corrected"
validate_inputs = true
degenerate = "uniform"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.combiner.mode, CombineMode::Corrected);
        assert!(config.combiner.validate_inputs);
        assert_eq!(config.combiner.degenerate, DegeneratePolicy::Uniform);
        assert!(!config.combiner.normalize_weights); // defaults to false
        assert_eq!(config.logging.filter, "ensemble_combiner=info");
    }

    #[test]
    fn test_degenerate_error_policy() {
        let toml_str = r#"
[combiner]
degenerate = "error"
normalize_weights = true
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.combiner.degenerate, DegeneratePolicy::Error);
        assert!(config.combiner.normalize_weights);
        assert_eq!(config.combiner.mode, CombineMode::Legacy);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let toml_str = r#"
[combiner]
mode = "fixed"
"#;
        let result: Result<Config, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn test_logging_section() {
        let toml_str = r#"
[logging]
filter = "ensemble_combiner=debug"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.logging.filter, "ensemble_combiner=debug");
        assert_eq!(config.combiner.mode, CombineMode::Legacy);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[combiner]
mode = "corrected"
validate_inputs = true
"#
        )
        .unwrap();

        let config = Config::load_from(file.path().to_str().unwrap(), env_with(&[])).unwrap();
        assert_eq!(config.combiner.mode, CombineMode::Corrected);
        assert!(config.combiner.validate_inputs);
        assert_eq!(config.combiner.degenerate, DegeneratePolicy::Propagate);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let config = Config::load_from(path.to_str().unwrap(), env_with(&[])).unwrap();
        assert_eq!(config.combiner, Config::default().combiner);
    }

    #[test]
    fn test_load_invalid_file_fails() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[combiner]\nmode = \"sideways\"").unwrap();

        assert!(Config::load_from(file.path().to_str().unwrap(), env_with(&[])).is_err());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[combiner]
mode = "legacy"
validate_inputs = false
degenerate = "error"
normalize_weights = true
"#
        )
        .unwrap();

        let env = env_with(&[
            ("ENSEMBLE__COMBINER__MODE", "corrected"),
            ("ENSEMBLE__COMBINER__VALIDATE_INPUTS", "true"),
            ("ENSEMBLE__COMBINER__DEGENERATE", "uniform"),
        ]);
        let config = Config::load_from(file.path().to_str().unwrap(), env).unwrap();

        assert_eq!(config.combiner.mode, CombineMode::Corrected);
        assert!(config.combiner.validate_inputs);
        assert_eq!(config.combiner.degenerate, DegeneratePolicy::Uniform);
        assert!(config.combiner.normalize_weights); // untouched by env
    }

    #[test]
    fn test_env_overrides_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let env = env_with(&[
            ("ENSEMBLE__COMBINER__MODE", "corrected"),
            ("ENSEMBLE__LOGGING__FILTER", "ensemble_combiner=trace"),
            ("OTHER__COMBINER__MODE", "legacy"),
        ]);
        let config = Config::load_from(path.to_str().unwrap(), env).unwrap();

        assert_eq!(config.combiner.mode, CombineMode::Corrected);
        assert!(!config.combiner.validate_inputs);
        assert_eq!(config.logging.filter, "ensemble_combiner=trace");
    }
}
