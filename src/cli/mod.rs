pub mod args;
pub mod ask;
pub mod logs;
pub mod meetings;

pub use args::{AskCliArgs, Cli, CliCommand, LogsCliArgs, MeetingsCliArgs};
pub use ask::handle_ask_command;
pub use logs::handle_logs_command;
pub use meetings::handle_meetings_command;
