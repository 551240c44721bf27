pub mod color;
pub mod editor;
pub mod help;
pub mod insight;
pub mod notice;
pub mod status_bar;
pub mod tabs;
pub mod text_input;
pub mod transaction_form;
