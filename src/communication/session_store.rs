use crate::booking::{Conversation, Event, Session, Turn};
use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

// One lock per entry: inputs for the same chat are handled in order
#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<String, Arc<Mutex<Session>>>,
}

impl SessionStore {
    pub fn new(idle: Duration, max_sessions: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(idle)
            .build();
        Self { cache }
    }

    pub async fn open(&self, conversation: &Conversation, id: &str, phone: &str) -> Turn {
        let turn = conversation.start(id, phone).await;
        self.cache
            .insert(id.to_string(), Arc::new(Mutex::new(turn.session.clone())));
        turn
    }

    pub async fn get(&self, id: &str) -> Option<Session> {
        let entry = self.cache.get(id)?;
        let session = entry.lock().await.clone();
        Some(session)
    }

    pub async fn dispatch_with<F>(
        &self,
        conversation: &Conversation,
        id: &str,
        to_event: F,
    ) -> Option<Turn>
    where
        F: FnOnce(&Session) -> Event,
    {
        let Some(entry) = self.cache.get(id) else {
            debug!(session_id = id, "No live session");
            return None;
        };
        let mut session = entry.lock().await;
        let event = to_event(&session);
        let turn = conversation.handle(session.clone(), event).await;
        *session = turn.session.clone();
        Some(turn)
    }

    pub async fn dispatch(
        &self,
        conversation: &Conversation,
        id: &str,
        event: Event,
    ) -> Option<Turn> {
        self.dispatch_with(conversation, id, |_| event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{FixedClock, Step};
    use crate::configuration::ShopConfig;
    use crate::database::MemoryStore;
    use chrono::NaiveDate;

    fn conversation() -> Conversation {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        Conversation::new(
            Arc::new(MemoryStore::demo()),
            Arc::new(FixedClock::on(today)),
            ShopConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_dispatch_updates_stored_session() {
        let conversation = conversation();
        let sessions = SessionStore::new(Duration::from_secs(60), 10);

        sessions.open(&conversation, "chat-1", "5563999887766").await;
        let turn = sessions
            .dispatch(
                &conversation,
                "chat-1",
                Event::Text {
                    text: "52998224725".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(turn.session.step, Step::NameCapture);

        let stored = sessions.get("chat-1").await.unwrap();
        assert_eq!(stored, turn.session);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let conversation = conversation();
        let sessions = SessionStore::new(Duration::from_secs(60), 10);

        assert!(sessions.get("nope").await.is_none());
        assert!(sessions
            .dispatch(&conversation, "nope", Event::Restart)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_event_built_from_current_step() {
        let conversation = conversation();
        let sessions = SessionStore::new(Duration::from_secs(60), 10);
        sessions.open(&conversation, "chat-1", "5563999887766").await;

        let turn = sessions
            .dispatch_with(&conversation, "chat-1", |session| {
                assert_eq!(session.step, Step::IdentityVerification);
                Event::Text {
                    text: "123".to_string(),
                }
            })
            .await
            .unwrap();
        assert_eq!(turn.session.step, Step::IdentityVerification);
    }
}
