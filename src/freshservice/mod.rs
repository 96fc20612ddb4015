pub(crate) mod client;
pub(crate) mod models;

pub use client::FreshserviceClient;
pub use models::TicketRequest;

pub fn init(host: String, api_key: String) -> FreshserviceClient {
    FreshserviceClient::new(host, api_key, 10, 5)
}
