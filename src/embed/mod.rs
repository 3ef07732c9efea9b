//! Embedded static resources for the preview page.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `serve` - Preview shell page, script and stylesheet
//!
//! Script and stylesheet are minified by `build.rs` into `OUT_DIR`.
//!
//! # Usage
//!
//! ```ignore
//! use embed::serve::{PREVIEW_JS, PreviewJsVars, SHELL_HTML, ShellVars};
//!
//! let script = PREVIEW_JS.render(&PreviewJsVars { ws_port: 35730 });
//! let html = SHELL_HTML.render(&ShellVars { title: "notes.gmi".into(), script });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use super::{Template, TemplateVars};
    use crate::utils::html::escape;

    /// Variables for preview.js.
    pub struct PreviewJsVars {
        pub ws_port: u16,
    }

    impl TemplateVars for PreviewJsVars {
        fn apply(&self, content: &str) -> String {
            content.replace("__GEMPEEK_WS_PORT__", &self.ws_port.to_string())
        }
    }

    /// Variables for shell.html.
    pub struct ShellVars {
        /// Page title (escaped on render)
        pub title: String,
        /// Inline script, already rendered
        pub script: String,
    }

    impl TemplateVars for ShellVars {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__TITLE__", &escape(&self.title))
                .replace("__STYLE__", PREVIEW_CSS)
                .replace("__SCRIPT__", &self.script)
        }
    }

    /// Preview page skeleton.
    pub const SHELL_HTML: Template<ShellVars> = Template::new(include_str!("serve/shell.html"));

    /// Live preview client with WebSocket port injection.
    pub const PREVIEW_JS: Template<PreviewJsVars> =
        Template::new(include_str!(concat!(env!("OUT_DIR"), "/preview.min.js")));

    /// Preview stylesheet (minified).
    pub const PREVIEW_CSS: &str = include_str!(concat!(env!("OUT_DIR"), "/preview.min.css"));

    /// Render the complete preview page.
    pub fn shell_page(title: &str, ws_port: u16) -> String {
        SHELL_HTML.render(&ShellVars {
            title: title.to_string(),
            script: PREVIEW_JS.render(&PreviewJsVars { ws_port }),
        })
    }
}
