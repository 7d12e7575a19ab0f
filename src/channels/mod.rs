pub mod slack;

pub use slack::{Messenger, SlackMessenger};
