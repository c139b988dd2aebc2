//! Event command handlers.

use tabled::Tabled;

use mesa_core::{Event, EventDraft};

use crate::cli::{EventsArgs, EventsCommand, GlobalOpts};
use crate::error::CliError;

use super::{Context, collection, util};

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Capacity")]
    capacity: String,
}

impl From<&Event> for EventRow {
    fn from(e: &Event) -> Self {
        Self {
            id: e.id.to_string(),
            name: e.name.clone(),
            date: e.date.clone(),
            capacity: e.capacity.map(|c| c.to_string()).unwrap_or_default(),
        }
    }
}

pub async fn handle(ctx: &Context, args: EventsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let events = ctx.client.events(ctx.scope.clone());

    match args.command {
        EventsCommand::List => {
            collection::list(&events, |e| EventRow::from(e), global).await
        }

        EventsCommand::Create {
            name,
            date,
            capacity,
        } => {
            let draft = EventDraft {
                name: util::or_empty(name),
                date: util::or_empty(date),
                capacity,
            };
            collection::create(&events, &draft, global).await
        }

        EventsCommand::Delete { id } => collection::delete(&events, &id, global).await,
    }
}
