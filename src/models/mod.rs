pub mod common;
pub mod contact;
pub mod education;
pub mod experience;
pub mod project;
pub mod skill;
pub mod user;

pub use common::*;
pub use contact::*;
pub use education::*;
pub use experience::*;
pub use project::*;
pub use skill::*;
pub use user::*;
