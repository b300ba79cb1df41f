use const_format::concatcp;

use crate::api::API_BASE_PATH;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Object {
    NotificationStats,
    NotificationStatsId,
}

impl Object {
    pub const fn path(&self) -> &'static str {
        use Object::*;
        match self {
            NotificationStats => concatcp!(API_BASE_PATH, "fcm/notification-stats"),
            NotificationStatsId => concatcp!(API_BASE_PATH, "fcm/notification-stats/:id"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Object;

    #[test]
    fn test_paths_are_under_api_base() {
        assert_eq!(Object::NotificationStats.path(), "/api/fcm/notification-stats");
        assert_eq!(Object::NotificationStatsId.path(), "/api/fcm/notification-stats/:id");
    }
}
