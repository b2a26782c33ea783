use ai_nav::{PathNotice, Ticket, TriggerId};

/// Events delivered to an agent's goal tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    PathReady {
        ticket: Ticket,
        item: Option<TriggerId>,
    },
    NoPathAvailable {
        ticket: Ticket,
    },
}

impl Message {
    /// Path request the message answers.
    pub fn ticket(&self) -> Ticket {
        match *self {
            Message::PathReady { ticket, .. } | Message::NoPathAvailable { ticket } => ticket,
        }
    }
}

impl From<PathNotice> for Message {
    fn from(notice: PathNotice) -> Self {
        match notice {
            PathNotice::PathReady { ticket, item } => Message::PathReady { ticket, item },
            PathNotice::NoPathAvailable { ticket } => Message::NoPathAvailable { ticket },
        }
    }
}
