//! The page behaviors wired up by [`crate::init`].

pub(crate) mod contact_form;
pub(crate) mod flash;
pub(crate) mod like_button;
pub(crate) mod project_cards;
pub(crate) mod skill_bars;
pub(crate) mod smooth_scroll;

pub(crate) const FLASH_MESSAGE: &str = "flash-message";
pub(crate) const CONTACT_FORM: &str = "contact-form";
pub(crate) const EMAIL_FIELD: &str = "email";
pub(crate) const PROJECT_CARD: &str = "project-card";
pub(crate) const SKILLS_SECTION: &str = "skills";
pub(crate) const SKILL_LEVEL: &str = "skill-level";
pub(crate) const LIKE_BUTTON: &str = "like-btn";
pub(crate) const LIKE_COUNT: &str = "like-count";
pub(crate) const PROJECT_ID_ATTR: &str = "data-project-id";
