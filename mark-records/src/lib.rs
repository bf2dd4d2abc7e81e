pub mod extract;
pub mod file_selector;
pub mod mark_files;
pub mod record;
pub mod source;
pub mod types;
