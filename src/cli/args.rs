use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "orlem")]
#[command(about = "Live meeting assistant", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Print version information
    Version,
    /// List meetings or print one transcript
    Meetings(MeetingsCliArgs),
    /// List, read or rename conversation logs
    Logs(LogsCliArgs),
    /// Send one utterance through the assistant and print the reply
    Ask(AskCliArgs),
}

#[derive(ClapArgs, Debug)]
pub struct MeetingsCliArgs {
    /// Print the transcript and closing summary of this meeting
    #[arg(long)]
    pub id: Option<i64>,
    /// Workspace owner (defaults to the configured owner)
    #[arg(long)]
    pub owner: Option<String>,
    /// List meetings of every owner
    #[arg(long, conflicts_with = "owner")]
    pub all: bool,
    /// Maximum number of meetings to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

#[derive(ClapArgs, Debug)]
pub struct LogsCliArgs {
    /// Log file to print as a transcript
    #[arg(short, long)]
    pub name: Option<String>,
    /// New name for the log given with --name
    #[arg(long, requires = "name")]
    pub rename: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct AskCliArgs {
    /// The utterance, as it would be said in the meeting
    #[arg(required = true)]
    pub text: Vec<String>,
    /// Tone mode: auto, internal, client or neutral
    #[arg(long, default_value = "auto")]
    pub tone: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_runs_service() {
        let cli = Cli::try_parse_from(["orlem"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_ask_joins_words() {
        let cli = Cli::try_parse_from(["orlem", "ask", "orlem,", "bom", "dia", "--tone", "client"])
            .unwrap();
        match cli.command {
            Some(CliCommand::Ask(args)) => {
                assert_eq!(args.text.join(" "), "orlem, bom dia");
                assert_eq!(args.tone, "client");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_logs_rename_requires_name() {
        assert!(Cli::try_parse_from(["orlem", "logs", "--rename", "novo"]).is_err());
        assert!(Cli::try_parse_from(["orlem", "logs", "--name", "a.jsonl", "--rename", "b"]).is_ok());
    }

    #[test]
    fn test_meetings_all_conflicts_with_owner() {
        assert!(Cli::try_parse_from(["orlem", "meetings", "--all", "--owner", "Ana"]).is_err());
        let cli = Cli::try_parse_from(["orlem", "-v", "meetings", "--id", "3"]).unwrap();
        assert!(cli.verbose);
    }
}
