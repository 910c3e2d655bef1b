//! Port and service lookup against the well-known port table.

use crate::models::{PortEntry, Protocol, WELL_KNOWN_PORTS};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Separator for multi-value queries such as `"80, 443 ssh"`.
static TOKEN_SEPARATOR: OnceLock<Regex> = OnceLock::new();

fn get_token_separator() -> &'static Regex {
    TOKEN_SEPARATOR.get_or_init(|| Regex::new(r"[,\s]+").expect("Invalid Regex"))
}

/// A single thing to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortQuery {
    Port(i64),
    /// Lowercased service name.
    Service(String),
}

/// Parse text as an integer the way a loose JSON/number coercion would:
/// trimmed, and integral floats (`"443.0"`) accepted.
pub fn coerce_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i64>().ok().or_else(|| {
        let f = s.parse::<f64>().ok()?;
        (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
    })
}

/// Split a free-form query into port and service lookups.
///
/// Tokens that are integers in `0..=65535` are ports, everything else is a
/// service name.
///
/// # Examples
/// ```
/// use netcalc_tools::processing::{parse_port_query, PortQuery};
/// assert_eq!(
///     parse_port_query("443, SSH"),
///     vec![PortQuery::Port(443), PortQuery::Service("ssh".to_string())]
/// );
/// ```
pub fn parse_port_query(input: &str) -> Vec<PortQuery> {
    get_token_separator()
        .split(input)
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .map(|token| match coerce_integer(&token) {
            Some(n) if (0..=65535).contains(&n) => PortQuery::Port(n),
            _ => PortQuery::Service(token),
        })
        .collect()
}

/// Answer every query against the table, in query order.
///
/// Misses are answered with a placeholder entry rather than dropped, so the
/// result always has at least one row per query.
pub fn search(queries: &[PortQuery], protocol: Protocol) -> Vec<PortEntry> {
    let mut out = Vec::new();
    for query in queries {
        match query {
            PortQuery::Port(port) => {
                let hits: Vec<PortEntry> = WELL_KNOWN_PORTS
                    .iter()
                    .filter(|w| i64::from(w.port) == *port && w.protocol.matches(protocol))
                    .map(PortEntry::from)
                    .collect();
                if hits.is_empty() {
                    out.push(PortEntry {
                        port: *port,
                        protocol,
                        service: "unknown".to_string(),
                        description: "No known assignment".to_string(),
                        common: None,
                    });
                } else {
                    out.extend(hits);
                }
            }
            PortQuery::Service(name) => {
                let hits: Vec<PortEntry> = WELL_KNOWN_PORTS
                    .iter()
                    .filter(|w| w.service.eq_ignore_ascii_case(name) && w.protocol.matches(protocol))
                    .map(PortEntry::from)
                    .collect();
                if hits.is_empty() {
                    out.push(PortEntry {
                        port: -1,
                        protocol,
                        service: name.clone(),
                        description: "No known port in local table".to_string(),
                        common: None,
                    });
                } else {
                    out.extend(hits);
                }
            }
        }
    }
    log::debug!(
        "search({} queries, {protocol}) => {} results",
        queries.len(),
        out.len()
    );
    out
}

/// Raw lookup inputs, as decoded from a query string and/or JSON body.
#[derive(Debug, Default, Clone)]
pub struct PortLookupRequest {
    pub q: Option<String>,
    /// Single port from the query string.
    pub port: Option<String>,
    pub protocol: Option<String>,
    /// Ports from a JSON body; each is coerced to an integer or skipped.
    pub ports: Vec<serde_json::Value>,
    pub services: Vec<serde_json::Value>,
}

impl PortLookupRequest {
    /// Collect every lookup the request asks for, in a stable order:
    /// `q` tokens, then `port`, then `ports`, then `services`.
    pub fn queries(&self) -> Vec<PortQuery> {
        let mut queries = Vec::new();

        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            queries.extend(parse_port_query(q));
        }
        if let Some(n) = self.port.as_deref().and_then(coerce_integer) {
            queries.push(PortQuery::Port(n));
        }
        for p in &self.ports {
            let n = match p {
                serde_json::Value::Number(n) => n
                    .as_i64()
                    .or_else(|| n.as_f64().and_then(|f| coerce_integer(&f.to_string()))),
                serde_json::Value::String(s) => coerce_integer(s),
                _ => None,
            };
            if let Some(n) = n {
                queries.push(PortQuery::Port(n));
            }
        }
        for s in &self.services {
            if let Some(name) = s.as_str().map(str::trim).filter(|s| !s.is_empty()) {
                queries.push(PortQuery::Service(name.to_lowercase()));
            }
        }

        queries
    }

    pub fn protocol(&self) -> Protocol {
        Protocol::from_filter(self.protocol.as_deref())
    }
}

/// Lookup answer as served by `/api/port-lookup`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PortLookupResponse {
    pub results: Vec<PortEntry>,
    pub count: usize,
    pub filtered_protocol: Protocol,
}

/// Run a full lookup; `None` when the request contains nothing to look up.
pub fn port_lookup(request: &PortLookupRequest) -> Option<PortLookupResponse> {
    let queries = request.queries();
    if queries.is_empty() {
        return None;
    }
    let protocol = request.protocol();
    let results = search(&queries, protocol);
    Some(PortLookupResponse {
        count: results.len(),
        results,
        filtered_protocol: protocol,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_port_query() {
        assert_eq!(
            parse_port_query("80,443 , https\tSSH"),
            vec![
                PortQuery::Port(80),
                PortQuery::Port(443),
                PortQuery::Service("https".into()),
                PortQuery::Service("ssh".into()),
            ]
        );
        assert_eq!(parse_port_query(" , ,"), Vec::<PortQuery>::new());
        assert_eq!(
            parse_port_query("70000"),
            vec![PortQuery::Service("70000".into())]
        );
        assert_eq!(
            parse_port_query("-1"),
            vec![PortQuery::Service("-1".into())]
        );
    }

    #[test]
    fn test_coerce_integer() {
        assert_eq!(coerce_integer(" 443 "), Some(443));
        assert_eq!(coerce_integer("443.0"), Some(443));
        assert_eq!(coerce_integer("-5"), Some(-5));
        assert_eq!(coerce_integer("4.5"), None);
        assert_eq!(coerce_integer("https"), None);
        assert_eq!(coerce_integer(""), None);
    }

    #[test]
    fn test_search_single_port() {
        let r = search(&[PortQuery::Port(443)], Protocol::Both);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].service, "https");
        assert_eq!(r[0].protocol, Protocol::Tcp);
        assert_eq!(r[0].common, Some(true));
    }

    #[test]
    fn test_search_port_with_two_protocols() {
        let r = search(&[PortQuery::Port(53)], Protocol::Both);
        assert_eq!(r.len(), 2);
        assert_eq!(r[0].protocol, Protocol::Udp);
        assert_eq!(r[1].protocol, Protocol::Tcp);

        let r = search(&[PortQuery::Port(53)], Protocol::Udp);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].description, "Domain Name System (queries)");
    }

    #[test]
    fn test_search_unknown_port_uses_filter_protocol() {
        let r = search(&[PortQuery::Port(12345)], Protocol::Udp);
        assert_eq!(
            r,
            vec![PortEntry {
                port: 12345,
                protocol: Protocol::Udp,
                service: "unknown".into(),
                description: "No known assignment".into(),
                common: None,
            }]
        );
        // protocol filter can turn a known port into a miss
        let r = search(&[PortQuery::Port(443)], Protocol::Udp);
        assert_eq!(r[0].service, "unknown");
    }

    #[test]
    fn test_search_services_in_order() {
        let queries = parse_port_query("http,https,ssh");
        let r = search(&queries, Protocol::Both);
        let ports: Vec<i64> = r.iter().map(|e| e.port).collect();
        assert_eq!(ports, vec![80, 443, 22]);
    }

    #[test]
    fn test_search_unknown_service() {
        let r = search(&[PortQuery::Service("gopher".into())], Protocol::Both);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].port, -1);
        assert_eq!(r[0].service, "gopher");
        assert_eq!(r[0].description, "No known port in local table");
    }

    #[test]
    fn test_search_service_by_protocol() {
        let r = search(&[PortQuery::Service("dhcp".into())], Protocol::Both);
        assert_eq!(r.len(), 2);
        let r = search(&[PortQuery::Service("dns".into())], Protocol::Tcp);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].port, 53);
        assert_eq!(r[0].protocol, Protocol::Tcp);
    }

    #[test]
    fn test_request_queries_order_and_coercion() {
        let request = PortLookupRequest {
            q: Some("22".into()),
            port: Some("3389".into()),
            protocol: None,
            ports: vec![json!(80), json!("8080"), json!(true), json!(443.0)],
            services: vec![json!(" HTTPS "), json!(""), json!(5)],
        };
        assert_eq!(
            request.queries(),
            vec![
                PortQuery::Port(22),
                PortQuery::Port(3389),
                PortQuery::Port(80),
                PortQuery::Port(8080),
                PortQuery::Port(443),
                PortQuery::Service("https".into()),
            ]
        );
    }

    #[test]
    fn test_port_lookup_empty_request() {
        assert!(port_lookup(&PortLookupRequest::default()).is_none());
    }

    #[test]
    fn test_port_lookup_response_json() {
        let request = PortLookupRequest {
            q: Some("853".into()),
            protocol: Some("tcp".into()),
            ..Default::default()
        };
        let response = port_lookup(&request).unwrap();
        assert_eq!(response.count, 1);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["filteredProtocol"], "tcp");
        assert_eq!(json["results"][0]["service"], "dot");
        assert_eq!(json["count"], 1);
    }
}
