//! Configuration structures for the APIC utility tools.
//!
//! - [`FetchConfig`] - Local endpoint, pagination, and request timeout
//! - [`ScanConfig`] - Service table, shard range, and fan-out width
//! - [`LogConfig`] - Log file location
//! - [`ExportConfig`] - SFP inventory export settings
//! - [`Config`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`] with the values the
//! controller tooling has always used, so an empty JSON object is a valid
//! configuration file.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How an action-subject object is matched against the reference class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum JoinRule {
    /// A reference counts as found when the reference set holds any object
    /// whose `oCl` is the reference class and the action object's own `oDn`
    /// starts with the refcont prefix.
    #[default]
    Literal,
    /// A reference counts as found when some reference object's `dn` equals
    /// the action object's `oDn`.
    DnLookup,
}

/// Column layout for the SFP inventory CSV.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum CsvLayout {
    /// `dn,actualType,guiCiscoPID,guiCiscoPN,guiName,guiPN`
    #[default]
    Basic,
    /// Basic columns plus `pod,node,port` parsed from the dn.
    WithLocation,
}

/// One controller service and the action-subject class it owns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceSpec {
    /// Service name as used in `/api/<service>/class/...`.
    pub name: String,
    /// Action-subject class to scan on this service.
    pub action_class: String,
    /// Whether the service's data is spread over shards.
    ///
    /// Unsharded services are only queried on shard 1.
    #[serde(default = "default_true")]
    pub sharded: bool,
}

const fn default_true() -> bool {
    true
}

impl ServiceSpec {
    /// A service whose data is spread over all shards.
    #[must_use]
    pub fn sharded(name: impl Into<String>, action_class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action_class: action_class.into(),
            sharded: true,
        }
    }

    /// A service that only lives on shard 1.
    #[must_use]
    pub fn singleton(name: impl Into<String>, action_class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action_class: action_class.into(),
            sharded: false,
        }
    }
}

/// Settings for the paginated fetcher.
///
/// # Examples
///
/// ```
/// use apic_core::FetchConfig;
///
/// let config = FetchConfig::default();
/// assert_eq!(config.endpoint, "http://127.0.0.1:7777");
/// assert_eq!(config.page_size, 75_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Base URL of the local management endpoint.
    pub endpoint: String,
    /// Objects requested per page.
    pub page_size: u64,
    /// Upper bound on pages fetched for one query.
    ///
    /// Guards against an endpoint that never reports a short page or an
    /// accurate `totalCount`.
    pub max_pages: u64,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:7777".to_owned(),
            page_size: 75_000,
            max_pages: 10_000,
            request_timeout_secs: 90,
        }
    }
}

/// Settings for the action-subject / reference scan.
///
/// # Examples
///
/// ```
/// use apic_core::ScanConfig;
///
/// let config = ScanConfig::default();
/// assert_eq!(config.services.len(), 14);
/// assert_eq!(config.shard_count, 32);
/// assert_eq!(config.reference_class, "pconsRefDn");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Services to scan.
    pub services: Vec<ServiceSpec>,
    /// Number of shards each sharded service is spread over.
    pub shard_count: u16,
    /// Class holding policy-consumption references.
    pub reference_class: String,
    /// Prefix an action object's `oDn` must contain to be checked.
    pub refcont_prefix: String,
    /// Maximum number of scan units running at once.
    pub max_in_flight: usize,
    /// Matching rule between action objects and references.
    pub join_rule: JoinRule,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            services: default_services(),
            shard_count: 32,
            reference_class: "pconsRefDn".to_owned(),
            refcont_prefix: "pcons/refcont".to_owned(),
            max_in_flight: 32,
            join_rule: JoinRule::Literal,
        }
    }
}

fn default_services() -> Vec<ServiceSpec> {
    vec![
        ServiceSpec::sharded("bootmgr", "actionBootmgrSubj"),
        ServiceSpec::sharded("dbgr", "actionDbgrSubj"),
        ServiceSpec::sharded("domainmgr", "actionDomainmgrSubj"),
        ServiceSpec::sharded("edmgr", "actionEdmgrSubj"),
        ServiceSpec::sharded("eventmgr", "actionEventmgrSubj"),
        ServiceSpec::sharded("idmgr", "actionIdmgrSubj"),
        ServiceSpec::singleton("licensemgr", "actionLicensemgrSubj"),
        ServiceSpec::sharded("observer", "actionObserverSubj"),
        ServiceSpec::sharded("plgnhandler", "actionPlgnhandlerSubj"),
        ServiceSpec::singleton("policydist", "actionPolicydistSubj"),
        ServiceSpec::sharded("scripthandler", "actionScripthandlerSubj"),
        ServiceSpec::sharded("policymgr", "actionPolicymgrSubj"),
        ServiceSpec::sharded("topomgr", "actionTopomgrSubj"),
        ServiceSpec::sharded("vmmmgr", "actionVmmmgrSubj"),
    ]
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// File that receives every log line at debug level, appended.
    pub file: Utf8PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: Utf8PathBuf::from("/data/techsupport/util.log"),
        }
    }
}

/// SFP inventory export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Destination CSV file.
    pub output: Utf8PathBuf,
    /// Column layout.
    pub layout: CsvLayout,
    /// Per-request timeout in seconds for the remote controller.
    pub request_timeout_secs: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output: Utf8PathBuf::from("./xsfp.csv"),
            layout: CsvLayout::Basic,
            request_timeout_secs: 30,
        }
    }
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use apic_core::Config;
///
/// let config: Config = serde_json::from_str(r#"{"scan": {"max_in_flight": 8}}"#).unwrap();
/// assert_eq!(config.scan.max_in_flight, 8);
/// assert_eq!(config.fetch.page_size, 75_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fetcher configuration.
    pub fetch: FetchConfig,
    /// Scanner configuration.
    pub scan: ScanConfig,
    /// Logging configuration.
    pub log: LogConfig,
    /// Inventory export configuration.
    pub export: ExportConfig,
}

impl Config {
    /// Loads and validates a configuration from a JSON file.
    ///
    /// Missing sections and fields take their default values.
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_owned()));
        }
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that would make a scan or fetch meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fetch.endpoint.starts_with("http://")
            || self.fetch.endpoint.starts_with("https://"))
        {
            return Err(ConfigError::invalid_option(
                "fetch.endpoint",
                format!("expected an http(s) URL, got {:?}", self.fetch.endpoint),
            ));
        }
        if self.fetch.page_size == 0 {
            return Err(ConfigError::invalid_option("fetch.page_size", "must be at least 1"));
        }
        if self.fetch.max_pages == 0 {
            return Err(ConfigError::invalid_option("fetch.max_pages", "must be at least 1"));
        }
        if self.fetch.request_timeout_secs == 0 {
            return Err(ConfigError::invalid_option(
                "fetch.request_timeout_secs",
                "must be at least 1",
            ));
        }
        if self.scan.services.is_empty() {
            return Err(ConfigError::invalid_option("scan.services", "must not be empty"));
        }
        if let Some(svc) = self
            .scan
            .services
            .iter()
            .find(|s| s.name.is_empty() || s.action_class.is_empty())
        {
            return Err(ConfigError::invalid_option(
                "scan.services",
                format!("service entry {svc:?} needs a name and an action class"),
            ));
        }
        if self.scan.shard_count == 0 {
            return Err(ConfigError::invalid_option("scan.shard_count", "must be at least 1"));
        }
        if self.scan.max_in_flight == 0 {
            return Err(ConfigError::invalid_option("scan.max_in_flight", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.endpoint, "http://127.0.0.1:7777");
        assert_eq!(config.page_size, 75_000);
        assert_eq!(config.max_pages, 10_000);
        assert_eq!(config.request_timeout_secs, 90);
    }

    #[test]
    fn test_scan_config_default_service_table() {
        let config = ScanConfig::default();
        assert_eq!(config.services.len(), 14);
        let singletons: Vec<&str> = config
            .services
            .iter()
            .filter(|s| !s.sharded)
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(singletons, vec!["licensemgr", "policydist"]);
        assert!(
            config
                .services
                .iter()
                .all(|s| s.action_class.starts_with("action") && s.action_class.ends_with("Subj"))
        );
    }

    #[test]
    fn test_config_deserialize_with_missing_fields() {
        let json = r#"{"fetch": {"page_size": 500}, "scan": {"join_rule": "dn_lookup"}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.fetch.page_size, 500);
        assert_eq!(config.fetch.endpoint, "http://127.0.0.1:7777");
        assert_eq!(config.scan.join_rule, JoinRule::DnLookup);
        assert_eq!(config.scan.shard_count, 32);
        assert_eq!(config.log.file, "/data/techsupport/util.log");
    }

    #[test]
    fn test_service_spec_sharded_defaults_true() {
        let spec: ServiceSpec =
            serde_json::from_str(r#"{"name": "vmmmgr", "action_class": "actionVmmmgrSubj"}"#)
                .unwrap();
        assert!(spec.sharded);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = Config::default();
        config.fetch.page_size = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fetch.page_size"));
    }

    #[test]
    fn test_validate_rejects_empty_services() {
        let mut config = Config::default();
        config.scan.services.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let mut config = Config::default();
        config.fetch.endpoint = "127.0.0.1:7777".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fetch.endpoint"));
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = Config::from_json_file(Utf8Path::new("/nonexistent/apic.json")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile(_)));
    }

    #[test]
    fn test_from_json_file_reads_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("apic.json")).unwrap();
        std::fs::write(&path, r#"{"scan": {"max_in_flight": 0}}"#).unwrap();
        let err = Config::from_json_file(&path).unwrap_err();
        assert!(err.to_string().contains("scan.max_in_flight"));

        std::fs::write(&path, r#"{"scan": {"max_in_flight": 4}}"#).unwrap();
        let config = Config::from_json_file(&path).unwrap();
        assert_eq!(config.scan.max_in_flight, 4);
    }

    #[test]
    fn test_join_rule_serialization() {
        assert_eq!(serde_json::to_string(&JoinRule::Literal).unwrap(), r#""literal""#);
        assert_eq!(serde_json::to_string(&JoinRule::DnLookup).unwrap(), r#""dn_lookup""#);
        assert_eq!(
            serde_json::to_string(&CsvLayout::WithLocation).unwrap(),
            r#""with_location""#
        );
    }
}
