pub mod edit;
pub mod error;
pub mod session;
pub mod status;

pub use edit::{Edit, EditOutcome, EditScript};
pub use error::EngineError;
pub use session::{Session, SessionOptions};
pub use status::RecordStatus;
