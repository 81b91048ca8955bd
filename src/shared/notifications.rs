//! User-facing notifications
//!
//! Operations report outcomes through a [`Notifier`] instead of returning
//! display strings. Success and failure stay distinct per operation.

use serde::Serialize;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    /// Underlying error text, when the notification reports a failure
    pub detail: Option<String>,
    /// Stays visible until dismissed or superseded
    pub persistent: bool,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            ..Self::new(NotificationLevel::Error, message)
        }
    }

    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            detail: None,
            persistent: false,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.level {
            NotificationLevel::Error => {
                tracing::error!(detail = ?n.detail, persistent = n.persistent, "{}", n.message)
            }
            NotificationLevel::Warning => {
                tracing::warn!(persistent = n.persistent, "{}", n.message)
            }
            NotificationLevel::Success | NotificationLevel::Info => {
                tracing::info!(persistent = n.persistent, "{}", n.message)
            }
        }
    }
}

/// Forwards notifications to a UI over an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        // Receiver gone means the UI is shutting down
        if self.sender.send(notification).is_err() {
            tracing::debug!("Notification dropped, no receiver");
        }
    }
}

/// Notification texts shown to users
pub mod messages {
    pub const FAVORITE_ADDED: &str = "Prompt adicionado aos favoritos!";
    pub const FAVORITE_ADD_FAILED: &str = "Erro ao adicionar aos favoritos";
    pub const FAVORITE_REMOVED: &str = "Prompt removido dos favoritos";
    pub const FAVORITE_REMOVE_FAILED: &str = "Erro ao remover dos favoritos";

    pub const COMMENT_ADDED: &str = "Comentário adicionado!";
    pub const COMMENT_FAILED: &str = "Erro ao adicionar comentário";
    pub const COLOR_UPDATED: &str = "Cor do prompt atualizada!";
    pub const COLOR_FAILED: &str = "Erro ao atualizar a cor do prompt";

    pub const COPY_RECORDED: &str = "Prompt copiado!";
    pub const COPY_FAILED: &str = "Erro ao registrar cópia";
    pub const STAR_RATING_RECORDED: &str = "Avaliação registrada!";
    pub const STAR_RATING_FAILED: &str = "Erro ao registrar avaliação";

    pub const CONNECTION_LOST: &str = "Você está offline. Verifique sua conexão.";
    pub const CONNECTION_RESTORED: &str = "Conexão restabelecida!";
    pub const RETRY_SUCCEEDED: &str = "Conexão verificada com sucesso!";
    pub const RETRY_FAILED: &str = "Não foi possível conectar ao servidor";
}
