//! Report rendering.

use std::fmt::Write;

use apihawk_domain::{ApiType, DiscoveryReport};
use apihawk_infrastructure::{SerializationError, to_json_stable};

use crate::cli::OutputFormat;

/// Renders `report` in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(report: &DiscoveryReport, format: OutputFormat) -> Result<String, SerializationError> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Json => to_json_stable(report),
    }
}

/// One line per endpoint, then a summary.
#[must_use]
pub fn render_text(report: &DiscoveryReport) -> String {
    let mut out = String::new();
    for endpoint in &report.endpoints {
        let _ = writeln!(
            out,
            "[{}] {:<8} {} ({} bytes)",
            endpoint.status_code,
            endpoint.api_type.as_str(),
            endpoint.url,
            endpoint.content_length
        );
    }

    let stats = &report.stats;
    let _ = write!(
        out,
        "\n{} endpoint(s) found for {}; {} probed, {} failed, {} discarded, {} skipped",
        report.endpoints.len(),
        report.target_url,
        stats.probed,
        stats.failures,
        stats.discarded,
        stats.invalid_urls
    );
    if report.cancelled {
        out.push_str(" (stopped early)");
    }
    out.push('\n');

    let graphql: Vec<_> = report.graphql_endpoints().map(|e| e.url.as_str()).collect();
    if !graphql.is_empty() {
        let _ = writeln!(out, "\n{} candidate(s) for introspection:", ApiType::GraphQl);
        for url in graphql {
            let _ = writeln!(out, "  {url}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use apihawk_domain::{DiscoveredEndpoint, DiscoveryStats};
    use pretty_assertions::assert_eq;

    fn report() -> DiscoveryReport {
        let mut report = DiscoveryReport::new("http://x/FUZZ");
        report.endpoints = vec![
            DiscoveredEndpoint {
                url: "http://x/users".to_string(),
                api_type: ApiType::Rest,
                status_code: 200,
                content_length: 12,
            },
            DiscoveredEndpoint {
                url: "http://x/graphql".to_string(),
                api_type: ApiType::GraphQl,
                status_code: 400,
                content_length: 40,
            },
        ];
        report.stats = DiscoveryStats {
            probed: 5,
            invalid_urls: 0,
            failures: 1,
            discarded: 2,
        };
        report
    }

    #[test]
    fn test_text_output() {
        let expected = "\
[200] REST     http://x/users (12 bytes)
[400] GraphQL  http://x/graphql (40 bytes)

2 endpoint(s) found for http://x/FUZZ; 5 probed, 1 failed, 2 discarded, 0 skipped

GraphQL candidate(s) for introspection:
  http://x/graphql
";
        assert_eq!(render_text(&report()), expected);
    }

    #[test]
    fn test_cancelled_run_is_flagged() {
        let mut report = DiscoveryReport::new("http://x");
        report.cancelled = true;
        assert!(render_text(&report).contains("(stopped early)"));
    }

    #[test]
    fn test_json_output() {
        let json = render(&report(), OutputFormat::Json).unwrap_or_default();
        assert!(json.contains("\"api_type\": \"GraphQL\""));
        assert!(json.ends_with("}\n"));
    }
}
