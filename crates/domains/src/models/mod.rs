//! # Domain Models
//!
//! These structs represent the core entities of Rusty-Press.
//! We use UUID v7 for time-ordered, globally unique identification.

mod analytics;
mod category;
mod comment;
mod identity;
mod media;
mod post;
mod region;
mod settings;
mod user;

pub use analytics::*;
pub use category::*;
pub use comment::*;
pub use identity::*;
pub use media::*;
pub use post::*;
pub use region::*;
pub use settings::*;
pub use user::*;
