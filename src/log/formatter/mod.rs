mod console_formatter;
mod core;
mod file_formatter;

pub use self::core::LogFormatter;
pub use console_formatter::{shorten_file_name, ConsoleFormatter, ConsoleFormatterConfig};
pub use file_formatter::{FileFormatter, FileLine};
