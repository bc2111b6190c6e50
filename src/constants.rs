//! Canonical field names and the upstream labels that feed them.
//!
//! Order matters: when several labels of the same field are present in one
//! table, the label listed later wins for every row where its cell is filled.

// Canonical field names
pub const DATE_FIELD: &str = "date";
pub const TOTAL_AIRCRAFT_FIELD: &str = "total_aircraft";
pub const ENTER_ADIZ_FIELD: &str = "enter_adiz";
pub const SHIPS_FIELD: &str = "ships";

// Upstream (MND crawler) labels
pub const DATE_LABEL_ZH: &str = "日期";
pub const TOTAL_AIRCRAFT_LABEL_ZH: &str = "共機架次";
pub const SHIPS_LABEL_ZH: &str = "共艦架次";
/// Misspelled ADIZ header still emitted by older crawler runs.
pub const ENTER_ADIZ_LABEL_TYPO_ZH: &str = "進入AIDZ共機架次";
pub const ENTER_ADIZ_LABEL_ZH: &str = "進入ADIZ共機架次";

/// Header of the exported table; `date_str` maps back to `date` on re-import.
pub const EXPORT_DATE_LABEL: &str = "date_str";
pub const EXPORT_HEADER: [&str; 4] = [
    EXPORT_DATE_LABEL,
    TOTAL_AIRCRAFT_FIELD,
    ENTER_ADIZ_FIELD,
    SHIPS_FIELD,
];
pub const EXPORT_FILE_NAME: &str = "mnd_filtered_data.csv";

pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// Dates outside this window are treated as corrupt placeholders
pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2050;

// Source defaults
pub const DEFAULT_REMOTE_URL: &str =
    "https://raw.githubusercontent.com/viviankoko/mnd_crawler/main/mnd_pla_wrangled.csv";
pub const DEFAULT_LOCAL_PATH: &str = "mnd_pla_wrangled.csv";
pub const DEFAULT_SYNTHETIC_DAYS: u32 = 30;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
