// URL utilities used by page binding and the site rules
//
// This module handles:
// - Splitting a document URL into scheme and host so it can be bound to a rule
// - Percent-decoding of query values embedded in links (Google Images)

/// Represents a parsed URL with its components
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedUrl {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl ParsedUrl {
    /// Parse an absolute URL string into its components
    pub fn parse(url: &str) -> Option<Self> {
        let url = url.trim();

        let (scheme, rest) = match url.find("://") {
            Some(pos) if pos > 0 => (url[..pos].to_lowercase(), &url[pos + 3..]),
            _ => return None,
        };

        let (rest, fragment) = match rest.find('#') {
            Some(pos) => (&rest[..pos], Some(rest[pos + 1..].to_string())),
            None => (rest, None),
        };

        let (rest, query) = match rest.find('?') {
            Some(pos) => (&rest[..pos], Some(rest[pos + 1..].to_string())),
            None => (rest, None),
        };

        let (host_port, path) = match rest.find('/') {
            Some(pos) => (&rest[..pos], rest[pos..].to_string()),
            None => (rest, "/".to_string()),
        };

        // Drop userinfo, it is never part of location.host
        let host_port = host_port.rsplit('@').next().unwrap_or(host_port);

        let (host, port) = match host_port.rfind(':') {
            Some(pos) if host_port[pos + 1..].chars().all(|c| c.is_ascii_digit()) => {
                (host_port[..pos].to_lowercase(), host_port[pos + 1..].parse().ok())
            }
            _ => (host_port.to_lowercase(), None),
        };

        if host.is_empty() {
            return None;
        }

        Some(ParsedUrl {
            scheme,
            host,
            port,
            path,
            query,
            fragment,
        })
    }

    /// Host with the port appended when one was given, like `location.host`
    pub fn host_with_port(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }

    /// Only plain web documents take part in zooming
    pub fn is_http(&self) -> bool {
        self.scheme == "http" || self.scheme == "https"
    }
}

/// Decode a percent-encoded URI component.
///
/// Returns `None` for malformed escapes or escapes that do not form valid
/// UTF-8. `+` is left alone, as `decodeURIComponent` does.
pub fn decode_uri_component(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = hex_value(*bytes.get(i + 1)?)?;
            let lo = hex_value(*bytes.get(i + 2)?)?;
            out.push(hi << 4 | lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out).ok()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
