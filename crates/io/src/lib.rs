// File I/O operations

pub mod document;
pub mod error;
pub mod naming;
pub mod text;
pub mod vocabulary;

pub use document::{parse_document, read_document, to_json_string, write_document, ExportOptions};
pub use error::{DocumentError, LoadError};
pub use naming::export_file_name;
pub use vocabulary::{load_vocabulary, parse_vocabulary};
