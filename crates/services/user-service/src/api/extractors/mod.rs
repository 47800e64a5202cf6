//! Custom request extractors.

mod username;
mod validated_json;

pub use username::UsernamePath;
pub use validated_json::{NewUserJson, UserUpdateJson};
