// Internal types - not exposed through the API surface
pub mod auth;
pub mod current_user;
pub mod permission;

pub use current_user::CurrentUser;
pub use permission::Permission;
