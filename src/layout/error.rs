use thiserror::Error;

use super::LayoutPhase;

/// Errors raised by the layout state machine.
///
/// These are programmer errors: the passes were driven out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("`{operation}` called out of order: layout is {phase}")]
    Sequencing {
        operation: &'static str,
        phase: LayoutPhase,
    },
}

pub type Result<T> = std::result::Result<T, LayoutError>;
