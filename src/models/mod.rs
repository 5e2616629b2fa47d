pub mod sql_enum;

pub mod achievement;
pub mod chapter;
pub mod lab_report;
pub mod misc;
pub mod notification;
pub mod pattern;
pub mod revision;
pub mod session;
pub mod streak;
pub mod subject;
pub mod task;
pub mod time_of_day;
pub mod timeline;
pub mod wellbeing;

pub use achievement::{AchievementCategory, AchievementDefinition, UserAchievement};
pub use chapter::{AssignmentStatus, Chapter, ChapterProgress, ReadingStatus};
pub use lab_report::{LabReport, LabReportStatus, Urgency};
pub use misc::{Guideline, MemoryFact};
pub use notification::{Notification, NotificationPreference, NotificationPriority, NotificationType};
pub use pattern::{DailyStudyStats, LearningPattern, Recommendation, RecommendationKind, SessionEffectiveness};
pub use revision::{Revision, DEFAULT_REVISION_INTERVALS_DAYS, EXPLICIT_TOOL_REVISION_INTERVALS_DAYS};
pub use session::{ActiveTimer, StudySession, DEEP_WORK_THRESHOLD_SECONDS, STREAK_MIN_SESSION_SECONDS};
pub use streak::UserStreak;
pub use subject::{Subject, SubjectType};
pub use task::{Task, TaskStatus, TaskType};
pub use time_of_day::TimeOfDay;
pub use timeline::{ActivityType, Block, Gap, GapClassification, Timeline};
pub use wellbeing::{BreakSession, BreakType, PomodoroPhase, PomodoroStatus, WellbeingMetric};
