pub mod notifier;

pub use notifier::{SystemAlert, completion_message};
