use thiserror::Error;

#[derive(Debug, Error)]
pub enum TuiError {
    #[error("Terminal error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid key binding: {0}")]
    KeyBindingError(String),

    #[error(
        "Terminal too small: {width}x{height}, dayboard needs at least {min_width}x{min_height}. Please resize your terminal window."
    )]
    TerminalTooSmall {
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },
}
