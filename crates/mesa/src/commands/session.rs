//! Session command handlers: login, register, logout, status.

use serde::Serialize;

use mesa_core::{CredentialBackend, RegisterOutcome, Registration, SecretString};

use crate::cli::{GlobalOpts, LoginArgs, RegisterArgs};
use crate::error::CliError;
use crate::output;

use super::{Context, collection, util};

pub async fn login(ctx: &Context, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let password = SecretString::from(util::password_or_prompt(args.password)?);
    ctx.client.session().login(&args.email, &password).await?;
    collection::announce(global, &format!("Signed in as {}", args.email));
    Ok(())
}

pub async fn register(
    ctx: &Context,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let password = SecretString::from(util::password_or_prompt(args.password)?);

    let mut profile = Registration::new(args.name, args.email.clone(), password);
    if let Some(username) = args.username {
        profile = profile.with_username(username);
    }
    for (key, value) in args.fields {
        profile = profile.with_field(key, value);
    }

    match ctx.client.session().register(&profile).await? {
        RegisterOutcome::Authenticated => {
            collection::announce(global, &format!("Registered and signed in as {}", args.email));
        }
        RegisterOutcome::LoginRequired => {
            collection::announce(global, "Registered");
            if !global.quiet {
                eprintln!("  Sign in with: mesa login {}", args.email);
            }
        }
    }
    Ok(())
}

pub fn logout(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let session = ctx.client.session();
    session.logout();
    // Store failures are recorded on the session, never returned.
    if let Some(err) = session.snapshot().error {
        tracing::warn!(%err, "token could not be removed");
    }
    collection::announce(global, "Signed out");
    Ok(())
}

// ── Status ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct StatusView {
    profile: String,
    server: String,
    credential_store: String,
    authenticated: bool,
}

pub fn status(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let view = StatusView {
        profile: ctx.profile.clone(),
        server: ctx.client.gateway().base_url().to_string(),
        credential_store: describe_store(&ctx.config.credentials),
        authenticated: ctx.client.session().is_authenticated(),
    };
    let color = output::should_color(&global.color);

    let out = output::render_single(
        &global.output,
        &view,
        |v| {
            format!(
                "Profile:      {}\nServer:       {}\nCredentials:  {}\nSession:      {}",
                v.profile,
                v.server,
                v.credential_store,
                output::session_label(v.authenticated, color)
            )
        },
        |v| if v.authenticated { "authenticated" } else { "anonymous" }.into(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

fn describe_store(backend: &CredentialBackend) -> String {
    match backend {
        CredentialBackend::Keyring { slot } => format!("keyring ({slot})"),
        CredentialBackend::File { path } => format!("file ({})", path.display()),
        CredentialBackend::Memory => "memory".into(),
    }
}
