//! Review command handlers. Reviews can be listed and written, not deleted.

use tabled::Tabled;

use mesa_core::{RATING_RANGE, Review, ReviewDraft};

use crate::cli::{GlobalOpts, ReviewsArgs, ReviewsCommand};
use crate::error::CliError;

use super::{Context, collection, util};

#[derive(Tabled)]
struct ReviewRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Comment")]
    comment: String,
    #[tabled(rename = "User")]
    user: String,
}

impl From<&Review> for ReviewRow {
    fn from(r: &Review) -> Self {
        Self {
            id: r.id.to_string(),
            rating: r.rating.map(stars).unwrap_or_default(),
            comment: r.comment.clone(),
            user: collection::reference_id(r.user.as_ref()),
        }
    }
}

fn stars(rating: u8) -> String {
    let max = usize::from(*RATING_RANGE.end());
    let filled = usize::from(rating).min(max);
    format!("{}{}", "★".repeat(filled), "☆".repeat(max - filled))
}

pub async fn handle(ctx: &Context, args: ReviewsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let reviews = ctx.client.reviews(ctx.scope.clone());

    match args.command {
        ReviewsCommand::List => {
            collection::list(&reviews, |r| ReviewRow::from(r), global).await
        }

        ReviewsCommand::Create { rating, comment } => {
            let draft = ReviewDraft {
                rating,
                comment: util::or_empty(comment),
            };
            collection::create(&reviews, &draft, global).await
        }
    }
}
