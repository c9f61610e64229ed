use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tracing::debug;

use super::{SKILLS_SECTION, SKILL_LEVEL};
use crate::{
    tasks::TaskSet,
    view::{Selector, ViewTree, VisibilityContext},
};

/// Replays the skill-bar fill the first time the skills section scrolls
/// into view. Later visibility changes are ignored.
pub(crate) fn install(
    view: &Arc<dyn ViewTree>,
    tasks: &Arc<TaskSet>,
    fill_delay: std::time::Duration,
) -> bool {
    let Some(section) = view.query(&Selector::class(SKILLS_SECTION)) else {
        return false;
    };

    let fired = Arc::new(AtomicBool::new(false));
    let tasks = tasks.clone();
    view.observe_visibility(
        section,
        Arc::new(move |ctx: &VisibilityContext| {
            for entry in &ctx.entries {
                if !entry.is_intersecting {
                    continue;
                }
                ctx.view.unobserve(ctx.observer, entry.target);
                if fired.swap(true, Ordering::SeqCst) {
                    continue;
                }
                animate(&ctx.view, &tasks, fill_delay);
            }
        }),
    );
    true
}

fn animate(view: &Arc<dyn ViewTree>, tasks: &TaskSet, fill_delay: std::time::Duration) {
    let levels = view.query_all(&Selector::class(SKILL_LEVEL));
    debug!(bars = levels.len(), "animating skill bars");
    for level in levels {
        let width = view.style(level, "width").unwrap_or_default();
        view.set_style(level, "width", "0");
        let view = view.clone();
        tasks.spawn(async move {
            tokio::time::sleep(fill_delay).await;
            view.set_style(level, "width", &width);
        });
    }
}
