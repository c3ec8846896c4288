use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "https://fantasy.premierleague.com/api";
const DEFAULT_EXPORT_PATH: &str = "fdr_export.xlsx";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Live,
    Demo,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base: String,
    pub source: DataSource,
    pub http_timeout_secs: u64,
    pub entry_id: Option<u32>,
    pub narrow_width: u16,
    pub export_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            source: DataSource::Live,
            http_timeout_secs: 10,
            entry_id: None,
            narrow_width: 110,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let api_base = env::var("FDR_API_BASE")
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_base);
        let source = env::var("FDR_SOURCE")
            .ok()
            .map(|v| parse_source(&v))
            .unwrap_or(defaults.source);
        let http_timeout_secs = env::var("FDR_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(defaults.http_timeout_secs)
            .clamp(2, 60);
        let entry_id = env::var("FDR_ENTRY_ID")
            .ok()
            .and_then(|v| parse_entry_id(&v));
        let narrow_width = env::var("FDR_NARROW_WIDTH")
            .ok()
            .and_then(|v| v.trim().parse::<u16>().ok())
            .unwrap_or(defaults.narrow_width)
            .clamp(40, 400);
        let export_path = env::var("FDR_EXPORT_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.export_path);

        Self {
            api_base,
            source,
            http_timeout_secs,
            entry_id,
            narrow_width,
            export_path,
        }
    }

    pub fn apply_args<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            let arg = arg.as_ref();
            if arg == "--demo" {
                self.source = DataSource::Demo;
            } else if arg == "--entry" {
                if let Some(id) = iter.next().and_then(|v| parse_entry_id(v.as_ref())) {
                    self.entry_id = Some(id);
                }
            } else if let Some(raw) = arg.strip_prefix("--entry=") {
                if let Some(id) = parse_entry_id(raw) {
                    self.entry_id = Some(id);
                }
            }
        }
    }
}

pub fn parse_entry_id(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|id| *id > 0)
}

fn parse_source(raw: &str) -> DataSource {
    match raw.trim().to_ascii_lowercase().as_str() {
        "demo" | "offline" => DataSource::Demo,
        _ => DataSource::Live,
    }
}
