//! Completion banner content.

use serde::{Deserialize, Serialize};

use crate::types::SessionMode;

/// A transient message shown when a session completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    /// Short headline
    pub title: String,
    /// Body text
    pub message: String,
    /// The mode that just completed
    pub completed: SessionMode,
    /// The mode the timer moved to
    pub next: SessionMode,
}

impl Banner {
    /// Builds the banner for completing `completed` and moving to `next`.
    pub fn for_completion(completed: SessionMode, next: SessionMode) -> Self {
        let (title, message) = match (completed, next) {
            (SessionMode::Work, SessionMode::LongBreak) => {
                ("Work session complete", "Time for a long break!")
            }
            (SessionMode::Work, _) => ("Work session complete", "Time for a break!"),
            (_, _) => ("Break over", "Back to work!"),
        };

        Self {
            title: title.to_string(),
            message: message.to_string(),
            completed,
            next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_complete_banner() {
        let banner = Banner::for_completion(SessionMode::Work, SessionMode::ShortBreak);
        assert_eq!(banner.title, "Work session complete");
        assert_eq!(banner.message, "Time for a break!");
    }

    #[test]
    fn test_work_complete_before_long_break() {
        let banner = Banner::for_completion(SessionMode::Work, SessionMode::LongBreak);
        assert_eq!(banner.message, "Time for a long break!");
    }

    #[test]
    fn test_break_over_banner() {
        for completed in [SessionMode::ShortBreak, SessionMode::LongBreak] {
            let banner = Banner::for_completion(completed, SessionMode::Work);
            assert_eq!(banner.title, "Break over");
            assert_eq!(banner.message, "Back to work!");
        }
    }

    #[test]
    fn test_serialize_camel_case() {
        let banner = Banner::for_completion(SessionMode::Work, SessionMode::ShortBreak);
        let json = serde_json::to_value(&banner).unwrap();
        assert_eq!(json["completed"], "work");
        assert_eq!(json["next"], "short_break");
    }
}
