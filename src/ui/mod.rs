// Terminal UI: input form and result display.

pub mod display;
pub mod form;

pub use form::ConsoleForm;
