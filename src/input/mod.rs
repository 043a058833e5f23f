pub mod file_loader;

pub use file_loader::{InputError, LogLoader, RawLog};
