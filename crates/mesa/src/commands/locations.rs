//! Location command handlers.

use tabled::Tabled;

use mesa_core::{Location, LocationDraft};

use crate::cli::{GlobalOpts, LocationsArgs, LocationsCommand};
use crate::error::CliError;

use super::{Context, collection, util};

#[derive(Tabled)]
struct LocationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Country")]
    country: String,
}

impl From<&Location> for LocationRow {
    fn from(l: &Location) -> Self {
        Self {
            id: l.id.to_string(),
            address: l.address.clone(),
            city: l.city.clone(),
            country: l.country.clone(),
        }
    }
}

pub async fn handle(
    ctx: &Context,
    args: LocationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let locations = ctx.client.locations(ctx.scope.clone());

    match args.command {
        LocationsCommand::List => {
            collection::list(&locations, |l| LocationRow::from(l), global).await
        }

        LocationsCommand::Create {
            address,
            city,
            country,
        } => {
            let draft = LocationDraft {
                address: util::or_empty(address),
                city: util::or_empty(city),
                country: util::or_empty(country),
            };
            collection::create(&locations, &draft, global).await
        }

        LocationsCommand::Delete { id } => collection::delete(&locations, &id, global).await,
    }
}
