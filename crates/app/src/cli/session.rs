use clap::{Args, Subcommand};
use truekicks::identity::User;
use truekicks_app::{config::AppConfig, storefront::Session};

use super::open_store;

#[derive(Debug, Args)]
pub(crate) struct SessionCommand {
    #[command(subcommand)]
    command: SessionSubcommand,
}

#[derive(Debug, Subcommand)]
enum SessionSubcommand {
    /// Print the current shopper
    Show,

    /// Remember a user as logged in
    Login(LoginArgs),

    /// Forget the logged-in user
    Logout,

    /// Change the logged-in user's display name
    Rename(RenameArgs),
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// User id
    #[arg(long)]
    id: i64,

    /// Display name
    #[arg(long)]
    full_name: String,

    /// Login email
    #[arg(long)]
    email: String,
}

#[derive(Debug, Args)]
struct RenameArgs {
    /// New display name
    #[arg(long)]
    full_name: String,
}

pub(crate) fn run(command: SessionCommand, config: &AppConfig) -> Result<(), String> {
    let mut session = Session::open(open_store(&config.storefront)?);

    match command.command {
        SessionSubcommand::Show => Ok(()),
        SessionSubcommand::Login(args) => session.login(User {
            id: args.id,
            full_name: args.full_name,
            email: args.email,
        }),
        SessionSubcommand::Logout => session.logout(),
        SessionSubcommand::Rename(args) => session.rename(&args.full_name),
    }
    .map_err(|error| format!("failed to update session: {error}"))?;

    match session.identity().user() {
        Some(user) => println!("user {}: {} <{}>", user.id, user.full_name, user.email),
        None => println!("guest"),
    }

    Ok(())
}
