pub mod http_client_factory;
pub mod random;

pub use http_client_factory::HttpClientFactory;
pub use random::{EntropyRandomSource, SeededRandomSource};
