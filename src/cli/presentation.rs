//! CLI presentation: text and json formatters per command.

mod menu;
mod registry;
mod shared;
mod spawn;

pub use menu::{format_menu_json, format_menu_text};
pub use registry::{
    format_courses_json, format_courses_text, format_identity_text, format_users_json,
    format_users_text, CourseRow, UsersOutput,
};
pub use shared::format_validation_report_text;
pub use spawn::{format_spawn_plan_json, format_spawn_plan_text};
