use http::Method;
use std::collections::HashMap;
use std::io::Read;
use tracing::{debug, warn};

/// Bound path parameters, written by the router on a successful match.
///
/// String keyed and string valued; values are the raw URL segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(HashMap<String, String>);

impl Params {
    /// Get a parameter as a string slice.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Get a parameter parsed as an integer. Missing or unparsable
    /// values return `None`.
    pub fn int(&self, name: &str) -> Option<i64> {
        self.0.get(name)?.parse().ok()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

/// Parsed HTTP request data seeded onto the [`Context`] for each request.
///
/// Wire parsing itself belongs to `may_minihttp`; this type only carries
/// the extracted pieces the pipeline and handlers care about. The struct
/// is recycled across requests, so `reset` must clear every field.
///
/// [`Context`]: crate::Context
#[derive(Debug)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// HTTP headers (lowercase names)
    pub headers: HashMap<String, String>,
    /// Client IP, taken from `X-Forwarded-For`/`X-Real-IP` when present.
    /// Empty when neither header is set (direct connections).
    pub remote_ip: String,
    /// Parsed query string parameters
    pub query: HashMap<String, String>,
    /// Parsed urlencoded form fields (empty unless the body carried
    /// `application/x-www-form-urlencoded`)
    pub form: HashMap<String, String>,
    /// Raw request body bytes
    pub body: Vec<u8>,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: String::new(),
            headers: HashMap::new(),
            remote_ip: String::new(),
            query: HashMap::new(),
            form: HashMap::new(),
            body: Vec::new(),
        }
    }
}

impl Request {
    /// Get a header value by lowercase name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub(crate) fn reset(&mut self) {
        self.method = Method::GET;
        self.path.clear();
        self.headers.clear();
        self.remote_ip.clear();
        self.query.clear();
        self.form.clear();
        self.body.clear();
    }
}

/// Parse query string parameters from a URL path.
pub fn parse_query_params(path: &str) -> HashMap<String, String> {
    if let Some(pos) = path.find('?') {
        let query_str = &path[pos + 1..];
        url::form_urlencoded::parse(query_str.as_bytes())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    } else {
        HashMap::new()
    }
}

/// Resolve the client IP from proxy headers.
///
/// Takes the first entry of `X-Forwarded-For`, falling back to
/// `X-Real-IP`. Returns an empty string when neither is set; a reverse
/// proxy in front of the service is expected to populate one of them.
fn read_ip(headers: &HashMap<String, String>) -> String {
    if let Some(v) = headers.get("x-forwarded-for") {
        let first = v.split(',').next().unwrap_or(v);
        return first.trim().to_string();
    }
    if let Some(v) = headers.get("x-real-ip") {
        return v.clone();
    }
    String::new()
}

/// Extract a [`Request`] from a raw `may_minihttp` request.
pub fn parse_request(req: may_minihttp::Request) -> Request {
    let method = match req.method().parse::<Method>() {
        Ok(m) => m,
        Err(_) => {
            warn!(method = %req.method(), "unparsable HTTP method, defaulting to GET");
            Method::GET
        }
    };
    let raw_path = req.path().to_string();
    let path = raw_path.split('?').next().unwrap_or("/").to_string();

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let remote_ip = read_ip(&headers);
    let query = parse_query_params(&raw_path);

    let mut body = Vec::new();
    if req.body().read_to_end(&mut body).is_err() {
        body.clear();
    }

    let form = if headers
        .get("content-type")
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
    {
        url::form_urlencoded::parse(&body)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    } else {
        HashMap::new()
    };

    debug!(
        method = %method,
        path = %path,
        header_count = headers.len(),
        query_count = query.len(),
        body_bytes = body.len(),
        "request parsed"
    );

    Request {
        method,
        path,
        headers,
        remote_ip,
        query,
        form,
        body,
    }
}
