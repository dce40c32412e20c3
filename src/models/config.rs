//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{CalendarQuery, EnrollmentQuery, KeyMap, Query};
use crate::services::Method;
use crate::utils::check_host;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Timetable listing endpoint
    #[serde(default)]
    pub calendar: EndpointConfig<CalendarQuery>,

    /// Enrollment grid endpoint
    #[serde(default)]
    pub enrollment: EndpointConfig<EnrollmentQuery>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::config("http.user_agent is empty"));
        }
        if self.http.timeout_secs == Some(0) {
            return Err(AppError::config("http.timeout_secs must be > 0"));
        }
        self.calendar.validate()?;
        self.enrollment.validate()?;
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds; unset means no timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: None,
        }
    }
}

/// A query type with a known endpoint.
///
/// Supplies the built-in settings an [`EndpointConfig`] falls back to.
pub trait Endpoint: Query + Serialize + DeserializeOwned {
    /// Section name in the configuration file
    const NAME: &'static str;
    const HOST: &'static str;
    const METHOD: Method;

    fn key_map() -> KeyMap;

    /// Filters sent when the caller leaves them unset.
    fn defaults() -> Self;
}

impl Endpoint for CalendarQuery {
    const NAME: &'static str = "calendar";
    const HOST: &'static str = "http://112.137.129.115/tkb/listbylist.php";
    const METHOD: Method = Method::PostForm;

    fn key_map() -> KeyMap {
        KeyMap::calendar()
    }

    fn defaults() -> Self {
        CalendarQuery::new().semester("78")
    }
}

impl Endpoint for EnrollmentQuery {
    const NAME: &'static str = "enrollment";
    const HOST: &'static str = "http://112.137.129.87/qldt/";
    const METHOD: Method = Method::Get;

    fn key_map() -> KeyMap {
        KeyMap::enrollment()
    }

    fn defaults() -> Self {
        EnrollmentQuery {
            limit: Some(1000),
            semester_id: Some("037".to_string()),
            page: Some(1),
            ..EnrollmentQuery::default()
        }
    }
}

/// Settings of one endpoint.
///
/// Every section is optional. A configured `key_map` or `defaults` table
/// replaces the built-in one as a whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, bound = "Q: Endpoint")]
pub struct EndpointConfig<Q> {
    pub host: String,
    pub method: Method,
    pub key_map: KeyMap,
    pub defaults: Q,
}

impl<Q: Endpoint> Default for EndpointConfig<Q> {
    fn default() -> Self {
        Self {
            host: Q::HOST.to_string(),
            method: Q::METHOD,
            key_map: Q::key_map(),
            defaults: Q::defaults(),
        }
    }
}

impl<Q: Endpoint> EndpointConfig<Q> {
    /// Check the host, the key map and the configured defaults.
    pub fn validate(&self) -> Result<()> {
        check_host(&self.host)?;

        if let Some(wire) = self.key_map.collisions().first() {
            return Err(AppError::config(format!(
                "{}.key_map maps more than one field to '{wire}'",
                Q::NAME
            )));
        }

        let defaults = self.defaults.validated()?;
        self.key_map.translate(defaults.fields())?;
        Ok(())
    }
}

mod defaults {
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; timetable-crawler/0.1)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::ValidationError;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();

        assert_eq!(config.calendar.method, Method::PostForm);
        assert_eq!(config.enrollment.method, Method::Get);
        assert_eq!(config.calendar.defaults.semester_id.as_deref(), Some("78"));
        assert_eq!(config.enrollment.defaults.limit, Some(1000));
        assert_eq!(config.enrollment.defaults.semester_id.as_deref(), Some("037"));
        assert_eq!(config.enrollment.defaults.page, Some(1));
        assert_eq!(config.http.timeout_secs, None);
    }

    #[test]
    fn test_sample_config_is_valid() {
        let config: Config = toml::from_str(include_str!("../../config.toml")).unwrap();
        config.validate().unwrap();
        assert_eq!(config.calendar.key_map, KeyMap::calendar());
        assert_eq!(config.enrollment.defaults, EnrollmentQuery::defaults());
    }

    #[test]
    fn test_load_partial_file() {
        let file = write_config(
            r#"
[http]
timeout_secs = 30

[calendar]
host = "http://localhost:5000/calendar"
method = "get"

[calendar.defaults]
semesterID = "79"
day = "CN"
"#,
        );

        let config = Config::load(file.path()).unwrap();
        config.validate().unwrap();

        assert_eq!(config.http.timeout_secs, Some(30));
        assert_eq!(config.http.user_agent, defaults::user_agent());
        assert_eq!(config.calendar.host, "http://localhost:5000/calendar");
        assert_eq!(config.calendar.method, Method::Get);
        assert_eq!(config.calendar.defaults.day.as_deref(), Some("CN"));
        assert_eq!(config.calendar.key_map, KeyMap::calendar());
        assert_eq!(config.enrollment.host, EnrollmentQuery::HOST);
    }

    #[test]
    fn test_load_custom_key_map() {
        let file = write_config(
            r#"
[enrollment.key_map]
studentID = "sid"
page = "p"

[enrollment.defaults]
page = 2
"#,
        );

        let config = Config::load(file.path()).unwrap();
        config.validate().unwrap();
        assert_eq!(config.enrollment.key_map.len(), 2);
        assert_eq!(config.enrollment.key_map.get("studentID"), Some("sid"));
        assert_eq!(config.enrollment.defaults.limit, None);
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("missing.toml"));
        assert_eq!(config.calendar.host, CalendarQuery::HOST);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let file = write_config("[calendar\nhost = ");
        assert!(matches!(Config::load(file.path()), Err(AppError::Toml(_))));
    }

    #[test]
    fn test_validate_rejects_bad_http_settings() {
        let mut config = Config::default();
        config.http.user_agent = "  ".to_string();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));

        let mut config = Config::default();
        config.http.timeout_secs = Some(0);
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_host() {
        let mut config = Config::default();
        config.enrollment.host = "112.137.129.87/qldt/".to_string();
        assert!(matches!(config.validate(), Err(AppError::InvalidHost { .. })));
    }

    #[test]
    fn test_validate_rejects_key_map_collision() {
        let mut config = Config::default();
        config.calendar.key_map.insert("day", "slt_namhoc");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("'slt_namhoc'"));
    }

    #[test]
    fn test_validate_rejects_bad_defaults() {
        let mut config = Config::default();
        config.calendar.defaults.day = Some("8".to_string());
        assert!(matches!(
            config.validate(),
            Err(AppError::Validation(ValidationError::Choice { field: "day", .. }))
        ));
    }

    #[test]
    fn test_validate_rejects_unmapped_defaults() {
        let mut config = Config::default();
        config.enrollment.key_map = [("page", "p")].into_iter().collect();
        assert!(matches!(
            config.validate(),
            Err(AppError::UnmappedKey { ref key }) if key == "limit"
        ));
    }
}
