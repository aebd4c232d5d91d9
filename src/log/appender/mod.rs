mod console_appender;
mod level_file_appender;
mod trait_;

pub use console_appender::{ConsoleAppender, ConsoleAppenderConfig, Target};
pub use level_file_appender::LevelFileAppender;
pub use trait_::LogAppender;
