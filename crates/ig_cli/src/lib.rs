pub mod config;
pub mod logging;
pub mod pipeline;
pub mod webhook;

pub use config::{load_dotenv, resolve_api_key, Cli, HumanDuration};
pub use logging::init_logging;
pub use pipeline::{CaptionAgent, RunOutcome};
pub use webhook::{deliver, DeliveryOutcome};
