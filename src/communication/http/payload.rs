use crate::booking::{ChatMessage, Choice, Conversation, Panel, Session, Step, Turn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TextMessageRequest {
    pub text: String,
}

/// What a client needs to render a session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: String,
    pub step: Step,
    pub transcript: Vec<ChatMessage>,
    pub panel: Panel,
    pub choices: Vec<Choice>,
}

impl SessionView {
    pub fn new(conversation: &Conversation, session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            step: session.step,
            transcript: session.transcript.clone(),
            panel: conversation.panel(session),
            choices: conversation.choices(session),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub replies: Vec<ChatMessage>,
    pub session: SessionView,
}

impl TurnResponse {
    pub fn new(conversation: &Conversation, turn: Turn) -> Self {
        Self {
            session: SessionView::new(conversation, &turn.session),
            replies: turn.replies,
        }
    }
}
