use std::sync::Arc;

use tracing::warn;

use crate::view::{EventContext, EventKind, EventResponse, ScrollBehavior, Selector, ViewTree};

/// Same-page anchors scroll smoothly to their target instead of navigating.
pub(crate) fn install(view: &Arc<dyn ViewTree>) -> usize {
    let anchors = view.query_all(&Selector::FragmentAnchor);
    for anchor in &anchors {
        view.add_listener(
            *anchor,
            EventKind::Click,
            Arc::new(|ctx: &EventContext| {
                let href = ctx.view.attribute(ctx.current, "href").unwrap_or_default();
                let target = Selector::fragment_target(&href).and_then(|s| ctx.view.query(&s));
                match target {
                    Some(target) => ctx.view.scroll_into_view(target, ScrollBehavior::Smooth),
                    None => warn!(%href, "anchor target not found; nothing to scroll to"),
                }
                EventResponse::PreventDefault
            }),
        );
    }
    anchors.len()
}
