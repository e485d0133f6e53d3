mod search_provider_port;
mod transport_port;

pub use search_provider_port::SearchProvider;
pub use transport_port::{FetchResponse, Transport};
