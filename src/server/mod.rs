mod http_server;
mod request;
mod response;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_query_params, parse_request, Params, Request};
pub use response::{CloseHook, Response};
