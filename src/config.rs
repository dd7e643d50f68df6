use std::env;
use std::str::FromStr;
use std::sync::OnceLock;

static CONFIG: OnceLock<Config> = OnceLock::new();

// --- CONFIG AGGREGATOR ---

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub engine: EngineConfig,
    pub snapshot: SnapshotConfig,
}

impl Config {
    pub fn global() -> &'static Config {
        CONFIG.get_or_init(Self::load)
    }

    fn load() -> Self {
        dotenv::dotenv().ok();
        Self {
            server: ServerConfig::load(),
            engine: EngineConfig::load(),
            snapshot: SnapshotConfig::load(),
        }
    }
}

// --- MODULES ---

// SERVER
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub dashboard_port: u16,
    pub producer_port: u16,
    pub max_line_len: usize,
    pub log_level: String,
}

impl ServerConfig {
    fn load() -> Self {
        Self {
            host:           get_env("GATEWAY_HOST", "127.0.0.1"),
            dashboard_port: get_env("DASHBOARD_PORT", "8080"),
            producer_port:  get_env("PRODUCER_PORT", "9001"),
            max_line_len:   get_env("MAX_LINE_LEN", "1048576"), // 1MB
            log_level:      get_env("GATEWAY_LOG", "info"),
        }
    }
}

// ENGINE
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub host: String,
    pub port: u16,
    pub timeout_ms: u64,
}

impl EngineConfig {
    fn load() -> Self {
        Self {
            host:       get_env("ENGINE_HOST", "127.0.0.1"),
            port:       get_env("ENGINE_PORT", "9000"),
            timeout_ms: get_env("ENGINE_TIMEOUT_MS", "4000"),
        }
    }
}

// SNAPSHOT
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    pub mode: GatewayMode,
    pub tick_ms: u64,
    pub default_group: String,
}

impl SnapshotConfig {
    fn load() -> Self {
        Self {
            mode:          get_env("GATEWAY_MODE", "direct"),
            tick_ms:       get_env("SNAPSHOT_TICK_MS", "1000"),
            default_group: get_env("DEFAULT_GROUP", "g1"),
        }
    }
}

/// Operating mode, selected once at startup and never combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayMode {
    /// Count events from the producer ingress locally.
    Direct,
    /// Query the upstream engine on every tick.
    Polling,
}

impl FromStr for GatewayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" => Ok(GatewayMode::Direct),
            "polling" => Ok(GatewayMode::Polling),
            other => Err(format!("unknown gateway mode '{}'", other)),
        }
    }
}

// --- PRIVATE HELPER ---

fn get_env<T: std::str::FromStr>(key: &str, default: &str) -> T {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| format!("Config error: {} must be valid", key))
        .unwrap()
}
