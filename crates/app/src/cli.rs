//! Command-line arguments.

use std::path::PathBuf;

use apihawk_application::DiscoverEndpointsInput;
use apihawk_domain::{
    BodyFormat, DomainError, Header, Headers, ProxyConfig, RequestBody, RestPathPolicy,
    ScanSettings,
};
use clap::{Args, Parser, Subcommand, ValueEnum};

/// APIHawk endpoint discovery
#[derive(Parser, Debug)]
#[command(name = "apihawk")]
#[command(author, version, about = "Discover and classify API endpoints behind a URL template")]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output (per-request failures and discarded statuses)
    #[arg(short, long, global = true, env = "APIHAWK_VERBOSE")]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fuzz a URL template with a wordlist and classify what answers
    Fuzz(FuzzArgs),
}

/// Report output format.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Text,
    /// Stable pretty-printed JSON
    Json,
}

/// Body format accepted by `--body-format`.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyFormatArg {
    /// application/json
    #[default]
    Json,
    /// application/xml
    Xml,
    /// text/html
    Html,
}

impl From<BodyFormatArg> for BodyFormat {
    fn from(format: BodyFormatArg) -> Self {
        match format {
            BodyFormatArg::Json => Self::Json,
            BodyFormatArg::Xml => Self::Xml,
            BodyFormatArg::Html => Self::Html,
        }
    }
}

/// Arguments of `apihawk fuzz`.
///
/// Options left unset fall back to the settings file, then to defaults.
#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct FuzzArgs {
    /// URL template; `FUZZ` marks where payloads go, otherwise they are appended
    #[arg(short = 'u', long, env = "APIHAWK_URL")]
    pub url: String,

    /// Wordlist file, one payload per line
    #[arg(short = 'w', long, env = "APIHAWK_WORDLIST")]
    pub wordlist: PathBuf,

    /// HTTP method
    #[arg(short = 'm', long, default_value = "GET", env = "APIHAWK_METHOD")]
    pub method: String,

    /// Cookie string sent with every request
    #[arg(short = 'c', long, env = "APIHAWK_COOKIE")]
    pub cookie: Option<String>,

    /// Extra header, `Name: value` (repeatable)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<Header>,

    /// Request body sent with every request
    #[arg(short = 'd', long, env = "APIHAWK_DATA")]
    pub data: Option<String>,

    /// Format of the request body
    #[arg(long, value_enum, default_value_t = BodyFormatArg::Json)]
    pub body_format: BodyFormatArg,

    /// Per-request timeout in seconds
    #[arg(short = 't', long = "timeout", env = "APIHAWK_TIMEOUT")]
    pub timeout_secs: Option<u64>,

    /// Proxy URL (http, https or socks5)
    #[arg(long, env = "APIHAWK_PROXY")]
    pub proxy: Option<String>,

    /// Proxy username
    #[arg(long, requires = "proxy", env = "APIHAWK_PROXY_USER")]
    pub proxy_user: Option<String>,

    /// Proxy password
    #[arg(long, requires = "proxy_user", env = "APIHAWK_PROXY_PASSWORD")]
    pub proxy_password: Option<String>,

    /// Maximum requests in flight
    #[arg(long, env = "APIHAWK_CONCURRENCY")]
    pub concurrency: Option<usize>,

    /// Pause after each request, in milliseconds
    #[arg(long, env = "APIHAWK_DELAY_MS")]
    pub delay_ms: Option<u64>,

    /// Random extra pause of up to this many milliseconds
    #[arg(long, env = "APIHAWK_JITTER_MS")]
    pub jitter_ms: Option<u64>,

    /// Stop the run after this many seconds and report what was found
    #[arg(long = "max-duration", env = "APIHAWK_MAX_DURATION")]
    pub max_duration_secs: Option<u64>,

    /// Redirects to follow (0 reports the redirect itself)
    #[arg(long, env = "APIHAWK_MAX_REDIRECTS")]
    pub max_redirects: Option<usize>,

    /// Only call a path REST if it starts with /api
    #[arg(long, env = "APIHAWK_REST_STRICT")]
    pub rest_strict: bool,

    /// Speak HTTP/2 without negotiation (needed for cleartext gRPC)
    #[arg(long, env = "APIHAWK_HTTP2_PRIOR_KNOWLEDGE")]
    pub http2_prior_knowledge: bool,

    /// Accept invalid TLS certificates
    #[arg(short = 'k', long, env = "APIHAWK_INSECURE")]
    pub insecure: bool,

    /// Settings file (JSON or YAML)
    #[arg(long, env = "APIHAWK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "APIHAWK_FORMAT")]
    pub format: OutputFormat,
}

fn parse_header(raw: &str) -> Result<Header, String> {
    raw.parse().map_err(|e: DomainError| e.to_string())
}

impl FuzzArgs {
    /// Overrides `settings` with every option given on the command line.
    pub fn apply(&self, settings: &mut ScanSettings) {
        if let Some(concurrency) = self.concurrency {
            settings.concurrency = concurrency;
        }
        if let Some(delay_ms) = self.delay_ms {
            settings.delay_ms = delay_ms;
        }
        if let Some(jitter_ms) = self.jitter_ms {
            settings.jitter_ms = jitter_ms;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            settings.timeout_secs = timeout_secs;
        }
        if let Some(max_duration) = self.max_duration_secs {
            settings.max_duration_secs = Some(max_duration);
        }
        if let Some(max_redirects) = self.max_redirects {
            settings.max_redirects = max_redirects;
        }
        if self.rest_strict {
            settings.rest_policy = RestPathPolicy::RequireApiPrefix;
        }
        if self.http2_prior_knowledge {
            settings.http2_prior_knowledge = true;
        }
        if self.insecure {
            settings.verify_tls = false;
        }
    }

    /// The proxy to route through, if any.
    #[must_use]
    pub fn proxy(&self) -> Option<ProxyConfig> {
        let mut proxy = ProxyConfig::with_url(self.proxy.as_deref()?);
        proxy.username.clone_from(&self.proxy_user);
        proxy.password.clone_from(&self.proxy_password);
        Some(proxy)
    }

    /// Builds the engine input.
    #[must_use]
    pub fn into_input(self, settings: ScanSettings) -> DiscoverEndpointsInput {
        let proxy = self.proxy();
        let body_format = self.body_format.into();
        DiscoverEndpointsInput {
            target: self.url,
            method: self.method,
            headers: self.headers.into_iter().collect::<Headers>(),
            cookie: self.cookie,
            body: self.data.map(|content| RequestBody::new(body_format, content)),
            proxy,
            settings,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fuzz(args: &[&str]) -> FuzzArgs {
        let argv = ["apihawk", "fuzz"].iter().chain(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Fuzz(args) => args,
        }
    }

    #[test]
    fn test_minimal_invocation() {
        let args = fuzz(&["-u", "http://x/FUZZ", "-w", "words.txt"]);
        assert_eq!(args.url, "http://x/FUZZ");
        assert_eq!(args.wordlist, PathBuf::from("words.txt"));
        assert_eq!(args.method, "GET");
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.proxy().is_none());
    }

    #[test]
    fn test_headers_are_repeatable() {
        let args = fuzz(&[
            "-u",
            "http://x",
            "-w",
            "w",
            "-H",
            "X-Api-Key: k",
            "-H",
            "Accept: application/json",
        ]);
        let input = args.into_input(ScanSettings::default());
        assert_eq!(input.headers.len(), 2);
        assert_eq!(input.headers.get("x-api-key"), Some("k"));
    }

    #[test]
    fn test_malformed_header_is_rejected() {
        let result = Cli::try_parse_from(["apihawk", "fuzz", "-u", "http://x", "-w", "w", "-H", "nocolon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags_override_settings() {
        let args = fuzz(&[
            "-u",
            "http://x",
            "-w",
            "w",
            "-t",
            "9",
            "--concurrency",
            "4",
            "--delay-ms",
            "0",
            "--jitter-ms",
            "25",
            "--max-duration",
            "60",
            "--rest-strict",
            "--insecure",
        ]);
        let mut settings = ScanSettings::default();
        args.apply(&mut settings);

        assert_eq!(settings.timeout_secs, 9);
        assert_eq!(settings.concurrency, 4);
        assert_eq!(settings.delay_ms, 0);
        assert_eq!(settings.jitter_ms, 25);
        assert_eq!(settings.max_duration_secs, Some(60));
        assert_eq!(settings.rest_policy, RestPathPolicy::RequireApiPrefix);
        assert!(!settings.verify_tls);
    }

    #[test]
    fn test_unset_flags_keep_file_values() {
        let args = fuzz(&["-u", "http://x", "-w", "w"]);
        let mut settings = ScanSettings {
            concurrency: 7,
            verify_tls: false,
            ..ScanSettings::default()
        };
        args.apply(&mut settings);

        assert_eq!(settings.concurrency, 7);
        assert!(!settings.verify_tls);
    }

    #[test]
    fn test_proxy_with_credentials() {
        let args = fuzz(&[
            "-u",
            "http://x",
            "-w",
            "w",
            "--proxy",
            "socks5://127.0.0.1:9050",
            "--proxy-user",
            "me",
            "--proxy-password",
            "pw",
        ]);
        let proxy = args.proxy().unwrap();
        assert_eq!(proxy.url_with_auth(), "socks5://me:pw@127.0.0.1:9050");
    }

    #[test]
    fn test_body_uses_format() {
        let args = fuzz(&[
            "-u",
            "http://x",
            "-w",
            "w",
            "-m",
            "POST",
            "-d",
            "<q/>",
            "--body-format",
            "xml",
        ]);
        let body = args.into_input(ScanSettings::default()).body.unwrap();
        assert_eq!(body.content_type, "application/xml");
        assert_eq!(body.content, "<q/>");
    }
}
