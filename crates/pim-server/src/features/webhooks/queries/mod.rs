pub mod get;
pub mod list;

pub use get::{GetWebhookError, GetWebhookQuery};
pub use list::{ListWebhooksError, ListWebhooksQuery};
