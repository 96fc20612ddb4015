pub(crate) mod client;
pub(crate) mod models;
mod signing;

pub use client::{customer_dashboard_url, NinjaClient};
pub use models::Alert;

pub fn init(host: String, access_key_id: String, secret: String) -> NinjaClient {
    NinjaClient::new(host, access_key_id, secret, 10, 5)
}
