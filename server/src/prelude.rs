pub use crate::core::app::App;
pub use edgegate_types::error::{EgResult, Error, ValidationError};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
