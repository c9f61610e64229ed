use std::sync::Arc;

use shared::validation::{is_valid_email, INVALID_EMAIL_MESSAGE};
use tracing::info;

use super::{CONTACT_FORM, EMAIL_FIELD};
use crate::view::{EventContext, EventKind, EventResponse, Selector, ViewTree};

/// Blocks contact-form submission when the email field is malformed.
pub(crate) fn install(view: &Arc<dyn ViewTree>) -> bool {
    let Some(form) = view.query(&Selector::class(CONTACT_FORM)) else {
        return false;
    };
    view.add_listener(
        form,
        EventKind::Submit,
        Arc::new(|ctx: &EventContext| {
            let email = ctx
                .view
                .query(&Selector::id(EMAIL_FIELD))
                .and_then(|field| ctx.view.value(field))
                .unwrap_or_default();
            if is_valid_email(&email) {
                return EventResponse::Proceed;
            }
            info!("contact form blocked: invalid email");
            ctx.view.alert(INVALID_EMAIL_MESSAGE);
            EventResponse::PreventDefault
        }),
    );
    true
}
