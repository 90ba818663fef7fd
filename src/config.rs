use clap::Parser;

/// PageSpeed gateway — proxies analysis requests to the PageSpeed Insights
/// v5 API and returns a trimmed summary of the Lighthouse report.
#[derive(Parser, Debug, Clone)]
#[command(name = "pagespeed-gateway")]
pub struct CliArgs {
    /// Gateway HTTP port
    #[arg(long = "port", default_value_t = DEFAULT_GATEWAY_PORT)]
    pub port: u16,

    /// PageSpeed Insights API key
    #[arg(long = "api-key", env = "PAGESPEED_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Allowed CORS origin (repeatable). No value means any origin.
    #[arg(long = "allow-origin")]
    pub allow_origins: Vec<String>,

    /// Base URL of the PageSpeed Insights endpoint
    #[arg(long = "upstream-base", default_value = PAGESPEED_API_BASE)]
    pub upstream_base: String,

    /// Per-call upstream timeout in seconds
    #[arg(long = "upstream-timeout-secs", default_value_t = UPSTREAM_TIMEOUT_SECS)]
    pub upstream_timeout_secs: u64,
}

pub struct GatewayConfig {
    pub port: u16,
    pub api_key: Option<String>,
    pub allow_origins: Vec<String>,
    pub upstream_base: String,
    pub upstream_timeout_secs: u64,
}

// Port constants
pub const DEFAULT_GATEWAY_PORT: u16 = 8080;

// Upstream constants
pub const PAGESPEED_API_BASE: &str = "https://www.googleapis.com/pagespeedonline/v5";
pub const UPSTREAM_TIMEOUT_SECS: u64 = 25;
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

// How much of a non-JSON upstream body to carry in an error response
pub const ERROR_BODY_SNIPPET_CHARS: usize = 256;

// Performance rating thresholds (score is 0-100)
pub const RATING_GOOD_MIN: u32 = 85;
pub const RATING_FAIR_MIN: u32 = 60;

impl GatewayConfig {
    pub fn from_args(args: CliArgs) -> Self {
        GatewayConfig {
            port: args.port,
            api_key: args.api_key.filter(|k| !k.trim().is_empty()),
            allow_origins: args.allow_origins,
            upstream_base: args.upstream_base,
            upstream_timeout_secs: args.upstream_timeout_secs,
        }
    }
}
