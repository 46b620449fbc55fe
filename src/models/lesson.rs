//! Lesson content models.

use serde::Serialize;

/// Represents a lesson record from the database.
///
/// # Database Table
///
/// Maps to the `lessons` table. Lessons belong to a block (the unit of
/// purchase) and are listed in `position` order.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Lesson {
    pub id: i64,

    /// Entitlement id of the block this lesson belongs to,
    /// e.g. `course-1-block-2`
    pub block_id: String,

    pub title: String,

    /// Playback URL; only handed out after the access check passes
    pub video_url: String,

    /// 1-based ordering within the block
    pub position: i32,
}

/// Lesson as returned by `GET /api/lessons`.
#[derive(Debug, Serialize)]
pub struct LessonResponse {
    pub title: String,
    pub video_url: String,
    pub position: i32,
}

impl From<Lesson> for LessonResponse {
    fn from(lesson: Lesson) -> Self {
        Self {
            title: lesson.title,
            video_url: lesson.video_url,
            position: lesson.position,
        }
    }
}
