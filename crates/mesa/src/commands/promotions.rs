//! Promotion command handlers.

use tabled::Tabled;

use mesa_core::{Promotion, PromotionDraft};

use crate::cli::{GlobalOpts, PromotionsArgs, PromotionsCommand};
use crate::error::CliError;

use super::{Context, collection, util};

#[derive(Tabled)]
struct PromotionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "From")]
    starts_on: String,
    #[tabled(rename = "Until")]
    ends_on: String,
    #[tabled(rename = "Restaurants")]
    restaurants: String,
}

impl From<&Promotion> for PromotionRow {
    fn from(p: &Promotion) -> Self {
        Self {
            id: p.id.to_string(),
            description: p.description.clone(),
            starts_on: p.starts_on.clone(),
            ends_on: p.ends_on.clone(),
            restaurants: p
                .restaurants
                .iter()
                .map(|r| r.id.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

pub async fn handle(
    ctx: &Context,
    args: PromotionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let promotions = ctx.client.promotions(ctx.scope.clone());

    match args.command {
        PromotionsCommand::List => {
            collection::list(&promotions, |p| PromotionRow::from(p), global).await
        }

        PromotionsCommand::Create {
            description,
            starts,
            ends,
        } => {
            let draft = PromotionDraft {
                description: util::or_empty(description),
                starts_on: util::or_empty(starts),
                ends_on: util::or_empty(ends),
            };
            collection::create(&promotions, &draft, global).await
        }

        PromotionsCommand::Delete { id } => collection::delete(&promotions, &id, global).await,
    }
}
