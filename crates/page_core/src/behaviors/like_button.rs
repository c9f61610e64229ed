use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use shared::domain::{LikeStatus, ProjectId};
use tracing::{debug, error, warn};

use super::{LIKE_BUTTON, LIKE_COUNT, PROJECT_ID_ATTR};
use crate::{
    like_client::LikeClient,
    tasks::TaskSet,
    view::{EventContext, EventKind, EventResponse, NodeId, Selector, ViewTree},
};

pub const LIKED_GLYPH: &str = "❤️";
pub const UNLIKED_GLYPH: &str = "🤍";
const LIKED_CLASS: &str = "liked";
const DISABLED_ATTR: &str = "disabled";

/// Like buttons share one client; each button allows a single request in
/// flight and is disabled until it resolves.
pub(crate) struct LikeButtons {
    client: Arc<dyn LikeClient>,
    tasks: Arc<TaskSet>,
    in_flight: Mutex<HashSet<NodeId>>,
}

impl LikeButtons {
    pub(crate) fn new(client: Arc<dyn LikeClient>, tasks: Arc<TaskSet>) -> Self {
        Self {
            client,
            tasks,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    fn in_flight(&self) -> MutexGuard<'_, HashSet<NodeId>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn requests_in_flight(&self) -> usize {
        self.in_flight().len()
    }

    pub(crate) fn install(self: &Arc<Self>, view: &Arc<dyn ViewTree>) -> usize {
        let buttons = view.query_all(&Selector::class(LIKE_BUTTON));
        for button in &buttons {
            let this = self.clone();
            view.add_listener(
                *button,
                EventKind::Click,
                Arc::new(move |ctx: &EventContext| {
                    this.on_click(&ctx.view, ctx.current);
                    EventResponse::Proceed
                }),
            );
        }
        buttons.len()
    }

    /// Returns whether a request was issued.
    fn on_click(self: &Arc<Self>, view: &Arc<dyn ViewTree>, button: NodeId) -> bool {
        let raw_id = view.attribute(button, PROJECT_ID_ATTR).unwrap_or_default();
        let project_id = match raw_id.parse::<ProjectId>() {
            Ok(project_id) => project_id,
            Err(parse_error) => {
                error!(%button, raw_id = %raw_id, %parse_error, "like button has no usable project id");
                view.console_error(&format!("Error: invalid project id '{raw_id}'"));
                return false;
            }
        };

        if !self.in_flight().insert(button) {
            debug!(%button, project_id = project_id.0, "like already in flight; click ignored");
            return false;
        }
        view.set_attribute(button, DISABLED_ATTR, "");

        let release = InFlight {
            buttons: self.clone(),
            view: view.clone(),
            button,
        };
        self.tasks.spawn(async move {
            let view = &release.view;
            match release.buttons.client.toggle_like(project_id).await {
                Ok(status) => render(view, button, status),
                Err(err) => {
                    error!(project_id = project_id.0, error = %err, "like request failed");
                    view.console_error(&format!("Error: {err}"));
                }
            }
        });
        true
    }
}

/// Re-enables the button when its request task ends, however it ends.
struct InFlight {
    buttons: Arc<LikeButtons>,
    view: Arc<dyn ViewTree>,
    button: NodeId,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.view.remove_attribute(self.button, DISABLED_ATTR);
        self.buttons.in_flight().remove(&self.button);
    }
}

/// Patches the button to reflect the server's answer.
fn render(view: &Arc<dyn ViewTree>, button: NodeId, status: LikeStatus) {
    match view.query_within(button, &Selector::class(LIKE_COUNT)) {
        Some(count_node) => {
            let current = view
                .text(count_node)
                .as_deref()
                .and_then(parse_leading_int)
                .unwrap_or(0);
            let next = current.saturating_add(status.count_delta());
            view.set_text(count_node, &next.to_string());
        }
        None => warn!(%button, "like button has no count element"),
    }

    let glyph = match status {
        LikeStatus::Liked => LIKED_GLYPH,
        LikeStatus::Unliked => UNLIKED_GLYPH,
    };
    view.set_text(button, glyph);
    view.toggle_class(button, LIKED_CLASS, status == LikeStatus::Liked);
}

/// Integer prefix of `text` after leading whitespace, e.g. `" 12 likes"` → 12.
fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

#[cfg(test)]
mod tests {
    use super::parse_leading_int;

    #[test]
    fn parses_count_prefix() {
        assert_eq!(parse_leading_int("12"), Some(12));
        assert_eq!(parse_leading_int("  7 likes"), Some(7));
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(
            parse_leading_int("9223372036854775807"),
            Some(i64::MAX)
        );
        assert_eq!(parse_leading_int("99999999999999999999"), None);
        assert_eq!(parse_leading_int("likes"), None);
        assert_eq!(parse_leading_int(""), None);
    }
}
