pub mod dataset;
pub mod view;

pub use dataset::Dataset;
pub use view::{render_matrix, render_profile, render_summary, DashboardView, Panel, Selection};
