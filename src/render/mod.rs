//! Rendering of charts and dashboard pages.

pub mod chart;
pub mod html;

pub use chart::{render_svg, ChartSpec, RenderError};
pub use html::{dashboard_page, error_page, escape_html, static_page_name, SelectorTarget};
