use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map($name)
            }
        }
    };
}

id_newtype!(UserId);
id_newtype!(ProjectId);
id_newtype!(SkillId);
id_newtype!(ContactId);

/// Outcome of toggling a like, as reported by the server.
///
/// Only `"liked"` is meaningful on the wire; every other status string is
/// read as [`LikeStatus::Unliked`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeStatus {
    Liked,
    Unliked,
}

impl LikeStatus {
    pub fn from_wire(status: &str) -> Self {
        if status == "liked" {
            Self::Liked
        } else {
            Self::Unliked
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Liked => "liked",
            Self::Unliked => "unliked",
        }
    }

    /// Change applied to the displayed like count.
    pub fn count_delta(self) -> i64 {
        match self {
            Self::Liked => 1,
            Self::Unliked => -1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub project_id: ProjectId,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    pub like_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillSummary {
    pub skill_id: SkillId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// 1 to 5.
    pub proficiency: u8,
}

impl SkillSummary {
    /// Inline width the skill bar is rendered at, e.g. `"80%"`.
    pub fn bar_width(&self) -> String {
        format!("{}%", u32::from(self.proficiency.min(5)) * 20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_status_other_than_liked_reads_as_unliked() {
        assert_eq!(LikeStatus::from_wire("liked"), LikeStatus::Liked);
        assert_eq!(LikeStatus::from_wire("unliked"), LikeStatus::Unliked);
        assert_eq!(LikeStatus::from_wire("LIKED"), LikeStatus::Unliked);
        assert_eq!(LikeStatus::from_wire(""), LikeStatus::Unliked);
    }

    #[test]
    fn project_id_parses_from_data_attribute() {
        assert_eq!(" 42 ".parse::<ProjectId>().expect("id"), ProjectId(42));
        assert!("abc".parse::<ProjectId>().is_err());
    }

    #[test]
    fn skill_bar_width_scales_proficiency() {
        let skill = SkillSummary {
            skill_id: SkillId(1),
            name: "Rust".into(),
            category: None,
            proficiency: 4,
        };
        assert_eq!(skill.bar_width(), "80%");
    }
}
