//! HTTP plumbing shared by the adapters.

mod transport;

#[cfg(test)]
pub(crate) mod test_server;

pub use transport::HttpTransport;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("pexgrid/", env!("CARGO_PKG_VERSION"));

/// Condenses a reqwest failure into a short message.
pub(crate) fn describe_request_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        format!("failed to connect: {e}")
    } else {
        e.to_string()
    }
}
