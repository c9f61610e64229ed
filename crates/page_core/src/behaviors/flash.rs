use std::sync::Arc;

use tracing::debug;

use super::FLASH_MESSAGE;
use crate::{
    settings::InteractionSettings,
    tasks::TaskSet,
    view::{Selector, ViewTree},
};

const SCHEDULED_ATTR: &str = "data-autohide";

/// Fades out and then removes every flash message on the page.
pub(crate) fn install(
    view: &Arc<dyn ViewTree>,
    tasks: &TaskSet,
    settings: &InteractionSettings,
) -> usize {
    let mut scheduled = 0;
    for message in view.query_all(&Selector::class(FLASH_MESSAGE)) {
        // one fade-out timer per message
        if view.attribute(message, SCHEDULED_ATTR).is_some() {
            continue;
        }
        view.set_attribute(message, SCHEDULED_ATTR, "scheduled");
        scheduled += 1;

        let view = view.clone();
        let visible_for = settings.flash_visible_for;
        let fade_for = settings.flash_fade_for;
        tasks.spawn(async move {
            tokio::time::sleep(visible_for).await;
            if !view.contains(message) {
                return;
            }
            view.set_style(message, "opacity", "0");
            tokio::time::sleep(fade_for).await;
            view.remove(message);
            debug!(%message, "flash message dismissed");
        });
    }
    scheduled
}
