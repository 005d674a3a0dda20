//! Per-browser UI state: one drill-down and filter set per page, the
//! drawer stack and the layout flags. Keyed by the `x-desk-session` header;
//! requests without it share the default session.
//!
//! Sessions idle for longer than the configured timeout are dropped, and the
//! registry never holds more than its capacity: opening one more evicts the
//! least recently used.

use std::collections::HashMap;
use std::convert::Infallible;
use std::time::Duration;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::drawer::DrawerStack;
use crate::navigation::{DrillDown, Page};
use crate::table::TableState;

pub const SESSION_HEADER: &str = "x-desk-session";
pub const DEFAULT_SESSION: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for SessionKey {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_SESSION);
        Ok(SessionKey(key.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct PageState {
    pub nav: DrillDown,
    pub table: TableState,
}

impl PageState {
    fn new(page: Page) -> Self {
        Self {
            nav: DrillDown::new(page),
            table: TableState::default(),
        }
    }

    /// Filters belong to the view they were set on; moving drops them.
    pub fn reset_filters(&mut self) {
        self.table = TableState::default();
    }
}

/// Layout flags of one operator's dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiFlags {
    pub global_loading: bool,
    pub sidebar_collapsed: bool,
}

#[derive(Debug, Default)]
pub struct Session {
    pages: HashMap<Page, PageState>,
    pub drawers: DrawerStack,
    pub ui: UiFlags,
}

impl Session {
    pub fn page(&mut self, page: Page) -> &mut PageState {
        self.pages
            .entry(page)
            .or_insert_with(|| PageState::new(page))
    }
}

#[derive(Debug)]
struct Slot {
    session: Session,
    last_used: Instant,
}

#[derive(Debug)]
pub struct Sessions {
    inner: Mutex<HashMap<String, Slot>>,
    idle_timeout: Duration,
    capacity: usize,
}

impl Sessions {
    pub fn new(idle_timeout: Duration, capacity: usize) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            idle_timeout,
            capacity: capacity.max(1),
        }
    }

    /// Runs `f` against the session, creating it on first use.
    pub async fn with<R>(&self, key: &SessionKey, f: impl FnOnce(&mut Session) -> R) -> R {
        let now = Instant::now();
        let mut sessions = self.inner.lock().await;

        let before = sessions.len();
        sessions.retain(|_, slot| now.duration_since(slot.last_used) < self.idle_timeout);
        if sessions.len() < before {
            debug!("dropped {} idle session(s)", before - sessions.len());
        }
        if !sessions.contains_key(&key.0) && sessions.len() >= self.capacity {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, slot)| slot.last_used)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                debug!("session registry full, evicting {oldest}");
                sessions.remove(&oldest);
            }
        }

        let slot = sessions.entry(key.0.clone()).or_insert_with(|| Slot {
            session: Session::default(),
            last_used: now,
        });
        slot.last_used = now;
        f(&mut slot.session)
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}

impl Default for Sessions {
    fn default() -> Self {
        Self::new(Duration::from_secs(8 * 60 * 60), 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityKind;
    use crate::navigation::{Crumb, Level};

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let sessions = Sessions::default();
        let a = SessionKey("a".into());
        let b = SessionKey("b".into());
        sessions
            .with(&a, |s| {
                s.page(Page::Clients).nav.open(
                    Level::Jobs,
                    Crumb {
                        kind: EntityKind::Client,
                        id: "1".into(),
                        label: "TechCorp".into(),
                    },
                )
            })
            .await
            .unwrap();
        let depth_a = sessions.with(&a, |s| s.page(Page::Clients).nav.depth()).await;
        let depth_b = sessions.with(&b, |s| s.page(Page::Clients).nav.depth()).await;
        assert_eq!((depth_a, depth_b), (1, 0));
    }

    #[tokio::test]
    async fn test_missing_header_uses_default_session() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        let key = SessionKey::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(key.0, DEFAULT_SESSION);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_are_dropped() {
        let sessions = Sessions::new(Duration::from_secs(60), 16);
        let a = SessionKey("a".into());
        sessions.with(&a, |s| s.ui.sidebar_collapsed = true).await;

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(sessions.with(&a, |s| s.ui.sidebar_collapsed).await);

        tokio::time::advance(Duration::from_secs(61)).await;
        sessions.with(&SessionKey("b".into()), |_| ()).await;
        assert_eq!(sessions.len().await, 1);
        assert!(!sessions.with(&a, |s| s.ui.sidebar_collapsed).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_registry_evicts_least_recently_used() {
        let sessions = Sessions::new(Duration::from_secs(3600), 2);
        let (a, b, c) = (
            SessionKey("a".into()),
            SessionKey("b".into()),
            SessionKey("c".into()),
        );
        sessions.with(&a, |s| s.ui.sidebar_collapsed = true).await;
        tokio::time::advance(Duration::from_secs(1)).await;
        sessions.with(&b, |s| s.ui.sidebar_collapsed = true).await;
        tokio::time::advance(Duration::from_secs(1)).await;
        // touching a makes b the oldest
        sessions.with(&a, |_| ()).await;
        tokio::time::advance(Duration::from_secs(1)).await;
        sessions.with(&c, |_| ()).await;

        assert_eq!(sessions.len().await, 2);
        assert!(sessions.with(&a, |s| s.ui.sidebar_collapsed).await);
        assert!(!sessions.with(&b, |s| s.ui.sidebar_collapsed).await);
    }
}
