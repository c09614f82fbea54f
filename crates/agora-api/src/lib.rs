//! HTTP front end for chat applications.
//!
//! An application implements [`ChatApp`]; the server owns sessions and
//! streams the app's [`UiEvent`]s to the browser over SSE. Two sample
//! apps ship in [`apps`]: a selector-driven analysis team and a
//! plan-then-execute pair.

pub mod app;
pub mod apps;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod session;
pub mod state;

pub use app::{ChatApp, Starter, UiEvent, UiSink};
pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use server::{build_router, init_logging, serve};
pub use session::SessionStore;
pub use state::AppState;
