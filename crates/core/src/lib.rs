pub mod intent;
pub mod models;
pub mod prompts;

pub use intent::{
    acknowledgement, build_information_query, normalize_text, CHECKING_MESSAGE, FALLBACK_MESSAGE,
};
pub use models::*;
