//! # MailForge
//!
//! Turns the markup of the MailForge visual email designer into table-based
//! HTML that email clients without modern CSS layout (Outlook in particular)
//! render correctly.
//!
//! ## Features
//! - Column and row containers become presentation tables, with the
//!   container `gap` redistributed as cell padding
//! - Every editor component is wrapped in a one-cell table carrying its
//!   alignment, background, corner radius and font styling
//! - Editor-only attributes, marker classes and flex/dashed styles are removed
//! - Export and send wrappers, inline (`cid:`) embedding of local images
//! - Raw project files (`.mf`) saved and loaded verbatim
//!
//! ## Example
//! ```ignore
//! use mailforge::transpile;
//!
//! let raw = r#"
//! <div class="editable-component" data-id="c1" data-type="text" data-align="center">
//!   <span class="text-content">Hello</span>
//! </div>
//! "#;
//!
//! let clean = transpile(raw).expect("editor markup should be well formed");
//! assert!(clean.contains(r#"<td align="center""#));
//! ```
//!
//! ## Example: export document
//! ```ignore
//! use mailforge::{export_html, MailforgeConfig};
//!
//! let config = MailforgeConfig::load("mailforge.yaml")?;
//! let document = export_html(&raw, &config.export)?;
//! ```

pub mod components;
pub mod config;
pub mod dom;
pub mod error;
pub mod export;
pub mod inline_images;
pub mod layout;
pub mod project;
pub mod render;
pub mod sanitize;
pub mod style;
pub mod transpiler;

// --- Core types ---
pub use components::{Align, ComponentKind, EditableComponent};
pub use config::{ExportOptions, MailforgeConfig, SendOptions};
pub use error::{MailforgeError, MailforgeResult};
pub use style::StyleMap;
pub use transpiler::{transpile, Transpiler};

// --- Collaborators ---
pub use export::{export_document, export_html, send_document, send_preview_html};
pub use inline_images::{embed_local_images, InlineImage, InlineImages};
pub use project::{load_project, save_project};
