use std::sync::Arc;

use super::PROJECT_CARD;
use crate::view::{EventContext, EventKind, EventResponse, Selector, ViewTree};

pub(crate) fn install(view: &Arc<dyn ViewTree>, hover_offset_px: i32) -> usize {
    let lifted: Arc<str> = format!("translateY({hover_offset_px}px)").into();
    let cards = view.query_all(&Selector::class(PROJECT_CARD));
    for card in &cards {
        let lifted = lifted.clone();
        view.add_listener(
            *card,
            EventKind::PointerEnter,
            Arc::new(move |ctx: &EventContext| {
                ctx.view.set_style(ctx.current, "transform", &lifted);
                EventResponse::Proceed
            }),
        );
        view.add_listener(
            *card,
            EventKind::PointerLeave,
            Arc::new(|ctx: &EventContext| {
                ctx.view.set_style(ctx.current, "transform", "translateY(0)");
                EventResponse::Proceed
            }),
        );
    }
    cards.len()
}
