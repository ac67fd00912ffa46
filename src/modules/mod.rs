pub mod compositor;
pub mod import_sheet;
pub mod project;
