use arena_core::TournamentMode;
use arena_impls::ReqwestTransport;
use arena_views::{ActionOutcome, Arena, ModeFilter, StatusFilter};
use clap::Subcommand;
use colored::Colorize;

mod account;
mod clans;
mod leaderboard;
mod tournaments;

pub type App = Arena<ReqwestTransport>;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in to an existing account
    Login {
        username: String,
        /// Asked for interactively if omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account and log into it
    Register { username: String, email: String },
    /// Forget the stored session
    Logout,
    /// Show the logged in user
    Whoami,
    /// List tournaments
    Tournaments {
        /// all, future, active or past
        #[arg(long, default_value = "future", value_parser = parse_status)]
        status: StatusFilter,
        /// all, 1v1 or 2v2
        #[arg(long, default_value = "all", value_parser = parse_mode_filter)]
        mode: ModeFilter,
    },
    /// Show a tournament and its participants
    Show { id: u32 },
    /// Join a tournament
    Join { id: u32 },
    /// Leave a tournament
    Leave {
        id: u32,
        /// Don't ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
    /// Create a tournament
    Create {
        name: String,
        /// Local time, as "YYYY-MM-DD HH:MM"
        #[arg(long)]
        date: String,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        prize: i64,
        /// 1v1 or 2v2
        #[arg(long, default_value = "1v1", value_parser = parse_mode)]
        mode: TournamentMode,
        #[arg(long, default_value_t = 8, allow_negative_numbers = true)]
        max_players: i64,
    },
    /// List clans
    Clans {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        tag: Option<String>,
    },
    /// Show a clan
    Clan { id: u32 },
    /// Create a clan
    ClanCreate {
        name: String,
        tag: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Join a clan
    ClanJoin { id: u32 },
    /// Show the best players
    Leaderboard {
        #[arg(long)]
        limit: Option<u32>,
    },
}

pub async fn exec(command: Command, app: &App) -> anyhow::Result<()> {
    match command {
        Command::Login { username, password } => account::login(app, username, password).await,
        Command::Register { username, email } => account::register(app, username, email).await,
        Command::Logout => account::logout(app),
        Command::Whoami => account::whoami(app).await,
        Command::Tournaments { status, mode } => tournaments::list(app, status, mode).await,
        Command::Show { id } => tournaments::show(app, id).await,
        Command::Join { id } => tournaments::join(app, id).await,
        Command::Leave { id, yes } => tournaments::leave(app, id, yes).await,
        Command::Create {
            name,
            date,
            prize,
            mode,
            max_players,
        } => tournaments::create(app, name, &date, prize, mode, max_players).await,
        Command::Clans { search, tag } => clans::list(app, search, tag).await,
        Command::Clan { id } => clans::show(app, id).await,
        Command::ClanCreate {
            name,
            tag,
            description,
        } => clans::create(app, name, tag, description).await,
        Command::ClanJoin { id } => clans::join(app, id).await,
        Command::Leaderboard { limit } => leaderboard::show(app, limit).await,
    }
}

/// Prints the outcome of a membership action
fn report(outcome: ActionOutcome, success: &str) -> anyhow::Result<()> {
    match outcome {
        ActionOutcome::Completed => {
            println!("{}", success.green());
            Ok(())
        }
        ActionOutcome::Declined => {
            println!("{}", "Cancelled".bright_black());
            Ok(())
        }
        ActionOutcome::Blocked => anyhow::bail!("That action is not available right now"),
        ActionOutcome::Failed(message) => anyhow::bail!(message),
    }
}

fn parse_status(value: &str) -> Result<StatusFilter, String> {
    StatusFilter::parse(value).ok_or_else(|| format!("unknown status \"{}\"", value))
}

fn parse_mode_filter(value: &str) -> Result<ModeFilter, String> {
    ModeFilter::parse(value).ok_or_else(|| format!("unknown mode \"{}\"", value))
}

fn parse_mode(value: &str) -> Result<TournamentMode, String> {
    TournamentMode::parse(value).ok_or_else(|| format!("unknown mode \"{}\"", value))
}
