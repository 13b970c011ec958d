use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};

/// Coarse channel an event belongs to. Listeners that only care about one
/// area (the mistakes list, the analytics panel) filter on this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topic {
    Progress,
    Mistakes,
    History,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgressEvent {
    WeekCompleted {
        user_id: String,
        week_id: u32,
    },
    MistakeRecorded {
        user_id: String,
        week_id: u32,
        question_id: String,
    },
    MistakeCleared {
        user_id: String,
        week_id: u32,
        question_id: String,
    },
    AttemptLogged {
        user_id: String,
        week_id: u32,
        question_id: String,
        is_correct: bool,
    },
}

impl ProgressEvent {
    pub fn topic(&self) -> Topic {
        match self {
            ProgressEvent::WeekCompleted { .. } => Topic::Progress,
            ProgressEvent::MistakeRecorded { .. } | ProgressEvent::MistakeCleared { .. } => {
                Topic::Mistakes
            }
            ProgressEvent::AttemptLogged { .. } => Topic::History,
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            ProgressEvent::WeekCompleted { user_id, .. }
            | ProgressEvent::MistakeRecorded { user_id, .. }
            | ProgressEvent::MistakeCleared { user_id, .. }
            | ProgressEvent::AttemptLogged { user_id, .. } => user_id,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&ProgressEvent)>;

struct Listener {
    id: SubscriptionId,
    callback: Callback,
}

/// Fire-and-forget broadcast. Only listeners registered at the moment an
/// event is emitted receive it; nothing is queued for late subscribers.
///
/// Listeners may subscribe or unsubscribe from inside a callback. An event
/// emitted from inside a callback is queued and delivered to every listener
/// after the current event has reached all of them, so events arrive in emit
/// order and no callback ever runs inside another.
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<Vec<Listener>>,
    next_id: Cell<u64>,
    emitting: Cell<bool>,
    removed_during_emit: RefCell<HashSet<SubscriptionId>>,
    pending: RefCell<VecDeque<ProgressEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: impl FnMut(&ProgressEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.listeners.borrow_mut().push(Listener {
            id,
            callback: Box::new(callback),
        });
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.borrow_mut().retain(|l| l.id != id);
        if self.emitting.get() {
            self.removed_during_emit.borrow_mut().insert(id);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn emit(&self, event: &ProgressEvent) {
        if self.emitting.replace(true) {
            self.pending.borrow_mut().push_back(event.clone());
            return;
        }

        self.dispatch(event);
        loop {
            let Some(next) = self.pending.borrow_mut().pop_front() else {
                break;
            };
            self.dispatch(&next);
        }

        self.emitting.set(false);
    }

    fn dispatch(&self, event: &ProgressEvent) {
        let mut current = std::mem::take(&mut *self.listeners.borrow_mut());

        for listener in current.iter_mut() {
            if self.removed_during_emit.borrow().contains(&listener.id) {
                continue;
            }
            (listener.callback)(event);
        }

        let mut added = std::mem::take(&mut *self.listeners.borrow_mut());
        current.append(&mut added);
        let removed = std::mem::take(&mut *self.removed_during_emit.borrow_mut());
        current.retain(|l| !removed.contains(&l.id));
        *self.listeners.borrow_mut() = current;
    }
}
