pub mod events;
pub mod store;

pub use events::{EventBus, ProgressEvent, SubscriptionId, Topic};
pub use store::{Attempt, Mistake, ProgressStore};
