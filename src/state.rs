use std::sync::Arc;

use crate::db::OrmConn;

#[derive(Clone)]
pub struct AppState {
    pub orm: OrmConn,
    pub jwt_secret: Arc<str>,
    pub jwt_ttl_hours: i64,
}

impl AppState {
    pub fn new(orm: OrmConn, jwt_secret: impl Into<Arc<str>>, jwt_ttl_hours: i64) -> Self {
        Self {
            orm,
            jwt_secret: jwt_secret.into(),
            jwt_ttl_hours,
        }
    }
}
