//! Business logic services.

pub mod contentstack;
pub mod entries;
pub mod registration;
pub mod users;

pub use contentstack::{CmsError, ContentRepository, ContentstackClient};
pub use registration::{Notice, NoticeKind, RegistrationError, RegistrationOutcome};
