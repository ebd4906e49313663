//! HTTP surface for fibdex.
//!
//! | Route | Answer |
//! |-------|--------|
//! | `GET /` | plain text greeting |
//! | `GET /values/all` | durable rows, or cache-derived rows when the durable store is down or empty |
//! | `GET /values/current` | the cache projection, index -> value |
//! | `POST /values` | `{"working": true}`, or `422` when the index is out of range |

pub mod args;
pub mod error;
pub mod router;
pub mod state;
pub mod telemetry;

pub use args::{Backoff, LogFormat, ServerArgs};
pub use error::ApiError;
pub use router::router;
pub use state::{AppState, Services};
