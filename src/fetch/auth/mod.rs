//! [`HttpClient`](crate::fetch::HttpClient) decorators that attach credentials
//! to outgoing requests.

mod api_key;
mod url_param;

pub use api_key::ApiKey;
pub use url_param::UrlParam;
