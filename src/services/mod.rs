pub mod auth;
pub mod media;
pub mod notification;

pub use auth::{AuthService, Claims};
pub use media::MediaService;
