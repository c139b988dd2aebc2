//! Generic list / create / delete handlers shared by the resource commands.

use mesa_core::{CollectionController, Removable, Resource, ResourceId};
use tabled::Tabled;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

/// Refresh the collection and render it.
pub async fn list<R, Row>(
    controller: &CollectionController<R>,
    to_row: impl Fn(&R) -> Row,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    R: Resource,
    Row: Tabled,
{
    controller.refresh().await?;
    let state = controller.snapshot();
    let out = output::render_list(&global.output, state.items.as_slice(), to_row, |r| {
        r.id().to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Create one item; the controller re-fetches the list afterwards.
pub async fn create<R: Resource>(
    controller: &CollectionController<R>,
    draft: &R::Draft,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    controller.create(draft).await?;
    let count = controller.snapshot().items.len();
    announce(global, &format!("{} created ({count} total)", title(R::KIND.to_string())));
    Ok(())
}

/// Confirm, then delete one item by id.
pub async fn delete<R: Removable>(
    controller: &CollectionController<R>,
    id: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !util::confirm(&format!("Delete {} '{id}'?", R::KIND), global.yes)? {
        return Ok(());
    }
    controller.delete(&ResourceId::from(id)).await?;
    announce(global, &format!("{} {id} deleted", title(R::KIND.to_string())));
    Ok(())
}

pub fn announce(global: &GlobalOpts, message: &str) {
    if !global.quiet {
        eprintln!("{}", output::success(message, output::should_color(&global.color)));
    }
}

fn title(mut word: String) -> String {
    if let Some(first) = word.get_mut(..1) {
        first.make_ascii_uppercase();
    }
    word
}

/// Display helper for optional nested references.
pub fn reference_id(reference: Option<&mesa_core::Reference>) -> String {
    reference.map(|r| r.id.to_string()).unwrap_or_default()
}
