pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateWebhookCommand, CreateWebhookError};
pub use delete::{DeleteWebhookCommand, DeleteWebhookError};
pub use update::{UpdateWebhookCommand, UpdateWebhookError};
