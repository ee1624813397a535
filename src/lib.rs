//! smartstatus: status indicator widgets for ratatui terminal UIs.
//!
//! A [`StatusWidget`] shows an animated spinner, a message line and a
//! dismiss control, attached either to a named screen region (rendered
//! directly under it) or to the whole screen (docked to the bottom edge).
//! A [`StatusRegistry`] owned by the application guarantees at most one
//! widget per target and backs `find` lookups.
//!
//! ```no_run
//! use ratatui::layout::Rect;
//! use smartstatus::{StatusRegistry, StatusWidget, Target};
//!
//! let registry = StatusRegistry::new();
//! let upload = StatusWidget::attached(
//!     &registry,
//!     "Uploading release artifacts",
//!     &Target::region("upload", Rect::new(2, 2, 24, 3)),
//! )?;
//! upload.show();
//! // ... later, as the operation completes:
//! upload.finish("Upload complete", true);
//! # Ok::<(), smartstatus::AttachError>(())
//! ```
//!
//! Rendering happens inside the application's normal draw loop via
//! [`ui::render_widgets`]; mouse clicks are routed to dismiss controls with
//! [`ui::input::handle_mouse_event`].

pub mod config;
pub mod error;
pub mod logging;
pub mod registry;
pub mod types;
pub mod ui;
pub mod widget;

pub use error::AttachError;
pub use registry::StatusRegistry;
pub use types::{DismissBehavior, Outcome, Phase, Target};
pub use widget::StatusWidget;

/// Library version, informational.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
