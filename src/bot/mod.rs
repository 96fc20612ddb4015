mod models;

pub(crate) mod handlers;
pub(crate) mod keyboards;
pub(crate) mod utils;
pub(crate) mod view;

use teloxide::{
    dispatching::UpdateHandler,
    prelude::*,
};

pub use models::CallbackAction;

pub fn init(token: String) -> Bot {
    Bot::new(token)
}

pub fn schema() -> UpdateHandler<anyhow::Error> {
    use teloxide::types::Update;

    dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .endpoint(|update: Update| async move {
            warn!("Unhandled update: {:?}", update.id);
            Ok::<(), anyhow::Error>(())
        })
}
