//! Sea-ORM entities for chirp-store

pub mod follows;
pub mod messages;
pub mod mutes;
pub mod notifications;
pub mod users;

pub use follows::Entity as Follow;
pub use messages::Entity as Message;
pub use mutes::Entity as Mute;
pub use notifications::Entity as Notification;
pub use users::Entity as User;
