use crate::bus::{ChatEvent, EventBus};
use crate::chat::ChatMessage;
use crate::entity::{Participant, Sender};
use crate::responder::Responder;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Default)]
struct SessionState {
    is_open: bool,
    messages: Vec<ChatMessage>,
    disposed: bool,
}

/// Conversation behind the chat widget.
///
/// The session exclusively owns its history. Reply tasks only hold a weak
/// reference, so a reply that resolves after `dispose()` or after the session
/// is dropped is discarded instead of touching a torn-down widget.
pub struct ChatSession {
    id: String,
    owner: Participant,
    responder: Arc<Responder>,
    reply_delay: Duration,
    bus: Option<Arc<EventBus>>,
    state: Arc<Mutex<SessionState>>,
}

/// Completion of one scheduled owner reply. Dropping it leaves the reply scheduled.
#[derive(Debug)]
pub struct PendingReply {
    handle: JoinHandle<()>,
}

impl PendingReply {
    /// Wait until the reply has been appended or discarded.
    pub async fn settled(self) {
        if let Err(e) = self.handle.await {
            warn!("Reply task failed: {}", e);
        }
    }
}

impl ChatSession {
    pub fn new(responder: Arc<Responder>, owner: Participant) -> Self {
        let id = format!("chat_{}", Uuid::new_v4().simple());
        info!("Chat session {} created for {}", id, owner);

        Self {
            id,
            owner,
            responder,
            reply_delay: DEFAULT_REPLY_DELAY,
            bus: None,
            state: Arc::new(Mutex::new(SessionState::default())),
        }
    }

    /// Seed the history, e.g. with a welcome message or a fixed transcript for tests.
    pub fn with_history(self, seed: Vec<ChatMessage>) -> Self {
        lock(&self.state).messages = seed;
        self
    }

    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    pub fn with_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner(&self) -> &Participant {
        &self.owner
    }

    pub fn reply_delay(&self) -> Duration {
        self.reply_delay
    }

    pub fn is_open(&self) -> bool {
        lock(&self.state).is_open
    }

    pub fn open(&self) {
        self.set_open(true);
    }

    pub fn close(&self) {
        self.set_open(false);
    }

    pub fn toggle(&self) {
        let is_open = !self.is_open();
        self.set_open(is_open);
    }

    fn set_open(&self, is_open: bool) {
        lock(&self.state).is_open = is_open;
        debug!("Chat session {} is_open={}", self.id, is_open);
        self.publish(ChatEvent::Toggled { is_open });
    }

    /// Snapshot of the history in display order.
    pub fn messages(&self) -> Vec<ChatMessage> {
        lock(&self.state).messages.clone()
    }

    pub fn last_message(&self) -> Option<ChatMessage> {
        lock(&self.state).messages.last().cloned()
    }

    pub fn is_disposed(&self) -> bool {
        lock(&self.state).disposed
    }

    /// Append the visitor's message and schedule the owner's reply.
    ///
    /// Blank input and sends after `dispose()` are ignored. Must be called from
    /// within a Tokio runtime.
    pub fn send_user_message(&self, text: &str) -> Option<PendingReply> {
        let content = text.trim();
        if content.is_empty() {
            return None;
        }

        let message = ChatMessage::user(content);
        {
            let mut state = lock(&self.state);
            if state.disposed {
                debug!("Ignoring message for disposed session {}", self.id);
                return None;
            }
            state.messages.push(message.clone());
        }
        info!("Chat session {} received user message {}", self.id, message.id);
        self.publish(ChatEvent::MessageAppended(message));

        Some(self.schedule_reply(content.to_string()))
    }

    fn schedule_reply(&self, user_text: String) -> PendingReply {
        let session_id = self.id.clone();
        let state = Arc::downgrade(&self.state);
        let responder = self.responder.clone();
        let bus = self.bus.clone();
        let delay = self.reply_delay;

        debug!("Chat session {} reply scheduled in {:?}", session_id, delay);

        let handle = task::spawn(async move {
            tokio::time::sleep(delay).await;
            append_reply(&session_id, state, &responder, bus.as_deref(), &user_text);
        });

        PendingReply { handle }
    }

    /// Invalidate every pending reply. Later sends are ignored.
    pub fn dispose(&self) {
        {
            let mut state = lock(&self.state);
            if state.disposed {
                return;
            }
            state.disposed = true;
        }
        info!("Chat session {} disposed", self.id);
        self.publish(ChatEvent::Disposed);
    }

    fn publish(&self, event: ChatEvent) {
        if let Some(bus) = &self.bus {
            bus.publish(event);
        }
    }
}

fn append_reply(
    session_id: &str,
    state: Weak<Mutex<SessionState>>,
    responder: &Responder,
    bus: Option<&EventBus>,
    user_text: &str,
) {
    let Some(state) = state.upgrade() else {
        debug!("Chat session {} dropped, discarding reply", session_id);
        return;
    };

    let reply = ChatMessage::new(Sender::Owner, responder.reply_text(user_text));
    {
        let mut state = lock(&state);
        if state.disposed {
            debug!("Chat session {} disposed, discarding reply", session_id);
            return;
        }
        state.messages.push(reply.clone());
    }
    info!("Chat session {} appended owner reply {}", session_id, reply.id);

    if let Some(bus) = bus {
        bus.publish(ChatEvent::MessageAppended(reply));
    }
}

// The history is a plain list; a panic elsewhere cannot leave it half-written.
fn lock(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Profile;
    use crate::responder::ReplyCategory;

    const DELAY: Duration = Duration::from_millis(10);

    fn responder() -> Arc<Responder> {
        Arc::new(Responder::new(Arc::new(Profile {
            name: "Ada Lovelace".into(),
            title: "Software Engineer".into(),
            location: "London, UK".into(),
            email: "ada@example.com".into(),
            phone: None,
            bio: String::new(),
            avatar: None,
            social: vec![],
        })))
    }

    fn session() -> ChatSession {
        ChatSession::new(responder(), Participant::new("Ada Lovelace", None)).with_reply_delay(DELAY)
    }

    fn ids(session: &ChatSession) -> Vec<String> {
        session.messages().into_iter().map(|m| m.id).collect()
    }

    #[test]
    fn starts_closed_and_toggles() {
        let session = session();
        assert!(!session.is_open());
        assert_eq!(session.reply_delay(), DELAY);

        session.toggle();
        assert!(session.is_open());
        session.toggle();
        assert!(!session.is_open());

        session.open();
        session.open();
        assert!(session.is_open());
        session.close();
        assert!(!session.is_open());
    }

    #[test]
    fn default_delay_is_one_second() {
        let session = ChatSession::new(responder(), Participant::new("Ada", None));
        assert_eq!(session.reply_delay(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn blank_messages_are_ignored() {
        let session = session().with_history(vec![ChatMessage::owner("Welcome!")]);
        let before = ids(&session);

        assert!(session.send_user_message("   ").is_none());
        assert!(session.send_user_message("\n\t").is_none());
        assert!(session.send_user_message("").is_none());

        assert_eq!(ids(&session), before);
    }

    #[tokio::test]
    async fn user_message_then_owner_reply() {
        let session = session();
        let pending = session.send_user_message("  hi  ").unwrap();

        let user = session.last_message().unwrap();
        assert_eq!(user.sender, Sender::User);
        assert_eq!(user.content, "hi");
        assert_eq!(session.messages().len(), 1);

        pending.settled().await;

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        let reply = &messages[1];
        assert_eq!(reply.sender, Sender::Owner);
        assert!(reply.timestamp >= user.timestamp);
        assert_ne!(reply.id, user.id);
        assert_eq!(reply.content, responder().reply("hi").text);
        assert_eq!(responder().reply("hi").category, ReplyCategory::Greeting);
    }

    #[tokio::test]
    async fn each_message_gets_its_own_reply() {
        let session = session();
        let first = session.send_user_message("hello").unwrap();
        let second = session.send_user_message("what are your rates").unwrap();

        assert_eq!(session.messages().len(), 2);
        first.settled().await;
        second.settled().await;

        let messages = session.messages();
        let senders: Vec<Sender> = messages.iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![Sender::User, Sender::User, Sender::Owner, Sender::Owner]);

        let mut replies: Vec<&str> = messages[2..].iter().map(|m| m.content.as_str()).collect();
        let mut expected = vec![
            responder().reply_text("hello"),
            responder().reply_text("what are your rates"),
        ];
        replies.sort();
        expected.sort();
        assert_eq!(replies, expected);
    }

    #[tokio::test]
    async fn reply_lands_while_closed() {
        let session = session();
        session.open();
        let pending = session.send_user_message("thanks!").unwrap();
        session.close();

        pending.settled().await;

        assert!(!session.is_open());
        assert_eq!(session.last_message().unwrap().sender, Sender::Owner);
    }

    #[tokio::test]
    async fn dispose_discards_pending_reply() {
        let session = session();
        let pending = session.send_user_message("hello").unwrap();
        session.dispose();

        pending.settled().await;

        assert!(session.is_disposed());
        assert_eq!(session.messages().len(), 1);
        assert!(session.send_user_message("anyone there?").is_none());
        assert_eq!(session.messages().len(), 1);
    }

    #[tokio::test]
    async fn dropped_session_discards_pending_reply() {
        let session = session();
        let pending = session.send_user_message("hello").unwrap();
        drop(session);

        pending.settled().await;
    }

    #[tokio::test]
    async fn seed_history_comes_first() {
        let seed = vec![ChatMessage::owner("Hi! Ask me anything.")];
        let seed_id = seed[0].id.clone();
        let session = session().with_history(seed);

        session.send_user_message("hey").unwrap().settled().await;

        let messages = session.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].id, seed_id);
        assert_eq!(messages[1].sender, Sender::User);
        assert_eq!(messages[2].sender, Sender::Owner);
    }

    #[tokio::test]
    async fn events_follow_history() {
        let bus = Arc::new(EventBus::new());
        let mut rx = bus.subscribe();
        let session = session().with_bus(bus);

        session.toggle();
        session.send_user_message("hi").unwrap().settled().await;
        session.dispose();

        assert!(matches!(rx.recv().await.unwrap(), ChatEvent::Toggled { is_open: true }));
        match rx.recv().await.unwrap() {
            ChatEvent::MessageAppended(m) => assert_eq!(m.sender, Sender::User),
            other => panic!("unexpected event: {other:?}"),
        }
        match rx.recv().await.unwrap() {
            ChatEvent::MessageAppended(m) => assert_eq!(m.sender, Sender::Owner),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(matches!(rx.recv().await.unwrap(), ChatEvent::Disposed));
    }
}
