use crate::demo::{run_board_show, run_demo, BoardShowArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ovenbird::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Ovenbird",
    about = "Demonstrate and run the Ovenbird bakery content service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect the admin order board from the command line
    Board {
        #[command(subcommand)]
        command: BoardCommand,
    },
    /// Run an end-to-end CLI demo covering the board and form workflows
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum BoardCommand {
    /// Print the orders board with its columns and cards
    Show(BoardShowArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Board {
            command: BoardCommand::Show(args),
        } => run_board_show(args),
        Command::Demo(args) => run_demo(args),
    }
}
