//! In-process client for the voxnote HTTP API.
//!
//! Mirrors what the browser front end does: a [`Session`] state machine for
//! login/register/logout with the token persisted locally, a
//! [`Recorder`] state machine driving an opaque [`AudioSource`] capture
//! device, and an [`ApiClient`] speaking the server's HTTP surface. Also the
//! driver for the end-to-end test suite.

pub mod api;
pub mod recorder;
pub mod session;

pub use api::{ApiClient, ClientError, Profile};
pub use recorder::{AudioSource, Recorder, RecorderError, RecorderState};
pub use session::{Session, SessionError, SessionState, SessionStore};
