pub mod content_id;

pub use content_id::{ContentId, ContentIdError};
