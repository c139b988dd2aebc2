//! Command dispatch: bridges CLI args -> core controllers -> output formatting.

pub mod collection;
pub mod config_cmd;
pub mod events;
pub mod locations;
pub mod promotions;
pub mod reservations;
pub mod reviews;
pub mod session;
pub mod util;

use mesa_core::{Client, ClientConfig, Scope};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// What a backend-bound command needs besides its own arguments.
#[derive(Debug)]
pub struct Context {
    pub client: Client,
    pub config: ClientConfig,
    pub scope: Scope,
    pub profile: String,
}

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => session::login(ctx, args, global).await,
        Command::Register(args) => session::register(ctx, args, global).await,
        Command::Logout => session::logout(ctx, global),
        Command::Status => session::status(ctx, global),
        Command::Reservations(args) => reservations::handle(ctx, args, global).await,
        Command::Events(args) => events::handle(ctx, args, global).await,
        Command::Promotions(args) => promotions::handle(ctx, args, global).await,
        Command::Reviews(args) => reviews::handle(ctx, args, global).await,
        Command::Locations(args) => locations::handle(ctx, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
