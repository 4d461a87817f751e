use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Authors may edit their comment for this long after posting.
pub const EDIT_WINDOW_HOURS: i64 = 24;

pub fn can_edit(
    author_id: Uuid,
    actor_id: Uuid,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    author_id == actor_id && now < created_at + Duration::hours(EDIT_WINDOW_HOURS)
}

/// Deletion is open to the author at any time, and to admins.
pub fn can_delete(author_id: Uuid, actor_id: Uuid, actor_is_admin: bool) -> bool {
    actor_is_admin || author_id == actor_id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_window_boundary() {
        let author = Uuid::new_v4();
        let created = Utc::now();
        let just_inside = created + Duration::hours(23) + Duration::minutes(59);
        let just_outside = created + Duration::hours(24) + Duration::minutes(1);

        assert!(can_edit(author, author, created, just_inside));
        assert!(!can_edit(author, author, created, just_outside));
        // Exactly 24h is closed.
        assert!(!can_edit(author, author, created, created + Duration::hours(24)));
    }

    #[test]
    fn only_author_can_edit() {
        let author = Uuid::new_v4();
        let other = Uuid::new_v4();
        let created = Utc::now();
        assert!(!can_edit(author, other, created, created));
    }

    #[test]
    fn author_or_admin_can_delete() {
        let author = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(can_delete(author, author, false));
        assert!(can_delete(author, other, true));
        assert!(!can_delete(author, other, false));
    }
}
