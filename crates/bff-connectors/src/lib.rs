pub mod email;
pub mod error;
pub mod ocoya;
pub mod systeme;
pub mod types;

pub use email::{EmailConfig, EmailRelay};
pub use error::ConnectorError;
pub use ocoya::{OcoyaClient, OcoyaConfig};
pub use systeme::{SystemeClient, SystemeConfig};
pub use types::{EmailMessage, PublishPost, RelayOutcome, RelayStatus, SystemeContact};
