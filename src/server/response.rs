use http::Method;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

/// Hook run after the response body has been handed to the wire layer.
/// Used by middleware that hold resources open for the duration of the
/// response (compressors, temp files).
pub type CloseHook = Box<dyn FnOnce() + Send>;

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        302 => "Found",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        _ => "OK",
    }
}

/// Buffered HTTP response, populated by middleware and handlers and
/// written to the wire once the pipeline finishes.
///
/// A `status` of 0 means "not set"; `end` fills in a method-appropriate
/// default. Setting `error` short-circuits finalization into an error
/// body regardless of what else was written. Recycled across requests;
/// `reset` keeps buffer capacity.
#[derive(Default)]
pub struct Response {
    /// HTTP status code; 0 until something sets it
    pub status: u16,
    /// Dispatch or handler error; takes precedence over `body` at `end`
    pub error: Option<String>,
    /// Response body buffer
    pub body: Vec<u8>,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Optional post-write hook
    pub close: Option<CloseHook>,
}

impl Response {
    /// Set a response header, replacing any previous value.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Respond with plain text.
    pub fn plain(&mut self, status: u16, text: &str) {
        self.set_header("Content-Type", "text/plain; charset=utf-8");
        self.body.clear();
        self.body.extend_from_slice(text.as_bytes());
        self.status = if status == 0 { 200 } else { status };
    }

    /// Respond with an HTML body.
    pub fn html(&mut self, status: u16, body: Vec<u8>) {
        self.set_header("Content-Type", "text/html; charset=utf-8");
        self.body = body;
        self.status = if status == 0 { 200 } else { status };
    }

    /// Respond with a JSON-serialized value.
    pub fn json<T: Serialize>(&mut self, status: u16, value: &T) -> serde_json::Result<()> {
        self.body = serde_json::to_vec_pretty(value)?;
        self.set_header("Content-Type", "application/json; charset=utf-8");
        self.status = if status == 0 { 200 } else { status };
        Ok(())
    }

    /// Respond with 204 No Content.
    pub fn empty(&mut self) {
        self.status = 204;
    }

    pub(crate) fn reset(&mut self) {
        self.status = 0;
        self.error = None;
        self.body.clear();
        self.headers.clear();
        self.close = None;
    }

    /// Apply finalization rules without touching the wire: error bodies,
    /// method-default status, empty-body 204 plus content-header strip,
    /// default content type. The server applies this before writing;
    /// offline dispatch via [`AppService::run`](crate::AppService::run)
    /// leaves it to the caller.
    pub fn finalize(&mut self, method: &Method) {
        if let Some(err) = self.error.take() {
            warn!(status = self.status, error = %err, "request finished with error");
            if self.status == 0 {
                self.status = 500;
            }
            self.headers
                .retain(|name, _| !name.eq_ignore_ascii_case("content-encoding"));
            self.set_header("Content-Type", "text/plain; charset=utf-8");
            self.body.clear();
            self.body.extend_from_slice(err.as_bytes());
            return;
        }

        if self.status == 0 {
            self.status = match *method {
                Method::GET => 200,
                Method::POST | Method::PUT => 201,
                Method::DELETE => 204,
                _ => 200,
            };
        }

        if self.body.is_empty() {
            self.status = 204;
            self.headers.retain(|name, _| {
                let n = name.to_ascii_lowercase();
                n != "content-type" && n != "content-length" && n != "content-encoding"
            });
        } else if !self
            .headers
            .keys()
            .any(|k| k.eq_ignore_ascii_case("content-type"))
        {
            self.set_header("Content-Type", "application/octet-stream");
        }
    }

    /// Finalize and write status, headers and body to the wire response,
    /// then run the close hook.
    pub(crate) fn end(&mut self, method: &Method, res: &mut may_minihttp::Response) {
        self.finalize(method);

        res.status_code(self.status as usize, status_reason(self.status));
        for (name, value) in &self.headers {
            let header = format!("{name}: {value}").into_boxed_str();
            res.header(Box::leak(header));
        }
        res.body_vec(std::mem::take(&mut self.body));

        if let Some(hook) = self.close.take() {
            hook();
        }
    }
}
