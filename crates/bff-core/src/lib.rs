pub mod agent;
pub mod error;
pub mod task;
pub mod time;

pub use agent::AgentId;
pub use error::{CoreError, ErrorCategory, Result};
pub use task::TaskPayload;
pub use time::{Rfc3339Timestamp, now_utc};
