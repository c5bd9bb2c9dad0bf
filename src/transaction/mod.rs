pub mod model;

pub use model::{REWARD_SENDER, Transaction};
