use crate::booking::conversation::messages::{long_date, price};
use crate::booking::{Conversation, Event, Panel, Session, Turn};
use crate::communication::SessionStore;
use crate::configuration::Context;
use crate::core::service_manager::{Error as ServiceManagerError, Service};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, ChatId, KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup};
use tracing::{error, info};

const TOKEN_VAR: &str = "TELOXIDE_TOKEN";

pub struct TelegramService {
    bot: Bot,
    chat: Arc<TelegramChat>,
}

struct TelegramChat {
    conversation: Arc<Conversation>,
    sessions: SessionStore,
    default_phone: String,
    typing_delay: Duration,
}

#[async_trait]
impl Service for TelegramService {
    type Context = Context;
    const NAME: &'static str = "telegram";

    async fn new(context: Context) -> Result<Self, ServiceManagerError> {
        if std::env::var(TOKEN_VAR).is_err() {
            return Err(ServiceManagerError::new(&format!("{} is not set", TOKEN_VAR)));
        }
        let chat = TelegramChat {
            conversation: context.conversation,
            sessions: context.sessions,
            default_phone: context.config.shop.default_phone,
            typing_delay: Duration::from_millis(context.config.telegram.typing_delay_ms),
        };
        Ok(Self {
            bot: Bot::from_env(),
            chat: Arc::new(chat),
        })
    }

    async fn run(self) -> Result<(), ServiceManagerError> {
        info!("Telegram bot started");
        let chat = self.chat;
        teloxide::repl(self.bot, move |bot: Bot, msg: Message| {
            let chat = Arc::clone(&chat);
            async move {
                if let Err(e) = chat.handle_message(&bot, &msg).await {
                    error!(chat_id = %msg.chat.id, err = %e, "Failed to answer Telegram message");
                }
                respond(())
            }
        })
        .await;
        Ok(())
    }
}

impl TelegramChat {
    async fn handle_message(&self, bot: &Bot, msg: &Message) -> ResponseResult<()> {
        let chat_id = msg.chat.id;
        let Some(text) = msg.text() else {
            bot.send_message(chat_id, "Please answer with text or use the buttons below.")
                .await?;
            return Ok(());
        };

        let session_id = format!("telegram-{}", chat_id);
        let turn = if text.trim() == "/start" {
            None
        } else {
            self.sessions
                .dispatch_with(&self.conversation, &session_id, |session| {
                    resolve_input(&self.conversation, session, text)
                })
                .await
        };
        // No live session: a first contact, /start or an expired chat
        let turn = match turn {
            Some(turn) => turn,
            None => {
                self.sessions
                    .open(&self.conversation, &session_id, &self.default_phone)
                    .await
            }
        };

        self.send_turn(bot, chat_id, turn).await
    }

    async fn send_turn(&self, bot: &Bot, chat_id: ChatId, turn: Turn) -> ResponseResult<()> {
        let mut texts: Vec<String> = turn.replies.iter().map(|m| m.text.clone()).collect();
        let currency = &self.conversation.shop().currency_symbol;
        if let Some(details) = describe_panel(&self.conversation.panel(&turn.session), currency) {
            texts.push(details);
        }
        let keyboard = keyboard(&self.conversation, &turn.session);

        let last = texts.len().saturating_sub(1);
        for (i, text) in texts.into_iter().enumerate() {
            bot.send_chat_action(chat_id, ChatAction::Typing).await?;
            tokio::time::sleep(self.typing_delay).await;
            let message = bot.send_message(chat_id, text);
            if i == last {
                message.reply_markup(keyboard.clone()).await?;
            } else {
                message.await?;
            }
        }
        Ok(())
    }
}

/// Maps typed text to an event: free text on the CPF and name steps,
/// otherwise the button whose label matches.
fn resolve_input(conversation: &Conversation, session: &Session, text: &str) -> Event {
    let text = text.trim();
    if !session.step.accepts_free_text() {
        if let Some(choice) = conversation
            .choices(session)
            .into_iter()
            .find(|choice| choice.label == text)
        {
            return choice.event;
        }
    }
    Event::Text {
        text: text.to_string(),
    }
}

fn keyboard(conversation: &Conversation, session: &Session) -> ReplyMarkup {
    let choices = conversation.choices(session);
    if choices.is_empty() {
        return ReplyMarkup::KeyboardRemove(KeyboardRemove::new());
    }
    let rows = choices
        .into_iter()
        .map(|choice| vec![KeyboardButton::new(choice.label)]);
    ReplyMarkup::Keyboard(KeyboardMarkup::new(rows))
}

// Panels whose content isn't already carried by buttons
fn describe_panel(panel: &Panel, currency: &str) -> Option<String> {
    match panel {
        Panel::Summary {
            service,
            barber,
            date,
            time,
        } => {
            let mut lines = Vec::new();
            if let Some(service) = service {
                lines.push(format!("✂️ Service: {}", service.name));
                lines.push(format!("💰 Price: {}", price(service.price, currency)));
            }
            if let Some(barber) = barber {
                lines.push(format!("👨‍💼 Barber: {}", barber.name));
            }
            if let Some(date) = date {
                lines.push(format!("📅 Date: {}", long_date(*date)));
            }
            if let Some(time) = time {
                lines.push(format!("🕐 Time: {}", time));
            }
            Some(lines.join("\n"))
        }
        Panel::Success { address, maps_url } => Some(format!("{}\n{}", address, maps_url)),
        Panel::Appointments { appointments } => Some(
            appointments
                .iter()
                .map(|a| {
                    let service = a.service.as_ref().map(|s| s.name.as_str()).unwrap_or("-");
                    let barber = a.barber.as_ref().map(|b| b.name.as_str()).unwrap_or("-");
                    let status = if a.customer_attended { "✅" } else { "🗓️" };
                    format!(
                        "{} {} {} - {} with {}",
                        status,
                        a.appointment_date.format("%d/%m/%Y"),
                        a.time_label(),
                        service,
                        barber
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        Panel::Social {
            whatsapp,
            instagram,
            address,
        } => Some(format!(
            "WhatsApp: {}\nInstagram: {}\n📍 {}",
            whatsapp, instagram, address
        )),
        _ => None,
    }
}
