pub mod directory;
pub mod error;
pub mod guard;
pub mod module;
pub mod response;
pub mod types;

pub use directory::{Author, AuthorDirectory};
pub use error::{set_dev_mode, ServiceError};
pub use guard::{Authenticator, Identity};
pub use module::Module;
pub use response::{created, from_body, message_only, ok};
pub use types::{is_valid_id, new_id, now_rfc3339, Page, PageParams, Paginated};
