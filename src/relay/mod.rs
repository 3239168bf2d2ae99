//! Generation proxy: `POST /generate-image` relays a prompt to the external
//! chat-completions image service and normalizes whatever comes back.

pub mod error;
pub mod extract;
pub mod route;
pub mod upstream;

pub use route::{router, RelayState, GENERATE_IMAGE_PATH};
pub use upstream::{HttpUpstream, ImageUpstream};
