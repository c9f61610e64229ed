//! Interaction layer for the server-rendered portfolio page.
//!
//! [`init`] is called once the page is ready. It wires smooth scrolling,
//! flash-message dismissal, the contact-form email check, project-card
//! hover, the skill-bar reveal and the like buttons against a [`ViewTree`].

use std::sync::Arc;

use thiserror::Error;
use tokio::runtime::Handle;
use tracing::info;

mod behaviors;
pub mod document;
pub mod like_client;
pub mod settings;
mod tasks;
pub mod view;

pub use behaviors::like_button::{LIKED_GLYPH, UNLIKED_GLYPH};
pub use document::{DispatchOutcome, Document, ElementSpec};
pub use like_client::{HttpLikeClient, LikeClient, LikeError};
pub use settings::{load_settings, InteractionSettings};
pub use view::{EventKind, EventResponse, NodeId, ScrollBehavior, Selector, ViewTree};

use behaviors::{contact_form, flash, like_button::LikeButtons, project_cards, skill_bars, smooth_scroll};
use tasks::TaskSet;

#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("page interactions need a running tokio runtime")]
    NoRuntime,
}

/// What [`init`] found on the page and wired up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitSummary {
    pub anchors: usize,
    pub flash_messages: usize,
    pub contact_form: bool,
    pub project_cards: usize,
    pub skills_section: bool,
    pub like_buttons: usize,
}

/// Live interactions of one page.
pub struct PageInteractions {
    tasks: Arc<TaskSet>,
    likes: Arc<LikeButtons>,
    summary: InitSummary,
}

impl PageInteractions {
    pub fn summary(&self) -> InitSummary {
        self.summary
    }

    /// Like requests that have not resolved yet.
    pub fn likes_in_flight(&self) -> usize {
        self.likes.requests_in_flight()
    }

    /// Timers and requests still running.
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Waits until every timer and like request started so far has finished.
    pub async fn settle(&self) {
        self.tasks.settle().await;
    }
}

/// Registers every page behavior against `view`. Call once per page load,
/// from within a tokio runtime.
pub fn init(
    view: Arc<dyn ViewTree>,
    like_client: Arc<dyn LikeClient>,
    settings: &InteractionSettings,
) -> Result<PageInteractions, InteractionError> {
    let runtime = Handle::try_current().map_err(|_| InteractionError::NoRuntime)?;
    let tasks = Arc::new(TaskSet::new(runtime));
    let likes = Arc::new(LikeButtons::new(like_client, tasks.clone()));

    let summary = InitSummary {
        anchors: smooth_scroll::install(&view),
        flash_messages: flash::install(&view, &tasks, settings),
        contact_form: contact_form::install(&view),
        project_cards: project_cards::install(&view, settings.card_hover_offset_px),
        skills_section: skill_bars::install(&view, &tasks, settings.skill_fill_delay),
        like_buttons: likes.install(&view),
    };
    info!(
        anchors = summary.anchors,
        flash_messages = summary.flash_messages,
        contact_form = summary.contact_form,
        project_cards = summary.project_cards,
        skills_section = summary.skills_section,
        like_buttons = summary.like_buttons,
        "page interactions ready"
    );

    Ok(PageInteractions {
        tasks,
        likes,
        summary,
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
