//! Reservation command handlers.

use tabled::Tabled;

use mesa_core::{Reservation, ReservationDraft};

use crate::cli::{GlobalOpts, ReservationsArgs, ReservationsCommand};
use crate::error::CliError;

use super::{Context, collection, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReservationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "When")]
    date_time: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "User")]
    user: String,
}

impl From<&Reservation> for ReservationRow {
    fn from(r: &Reservation) -> Self {
        Self {
            id: r.id.to_string(),
            date_time: r.date_time.clone(),
            status: r.status.clone(),
            user: collection::reference_id(r.user.as_ref()),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &Context,
    args: ReservationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let reservations = ctx.client.reservations(ctx.scope.clone());

    match args.command {
        ReservationsCommand::List => {
            collection::list(&reservations, |r| ReservationRow::from(r), global).await
        }

        ReservationsCommand::Create { date_time, status } => {
            let draft = ReservationDraft {
                date_time: util::or_empty(date_time),
                status: util::or_empty(status),
            };
            collection::create(&reservations, &draft, global).await
        }

        ReservationsCommand::Delete { id } => collection::delete(&reservations, &id, global).await,
    }
}
