/// Network adapters for external API calls
mod bearer_token;
mod container_api_client;

pub use bearer_token::{BearerToken, TokenChain};
pub use container_api_client::{ClientSettings, ContainerApiClient};
