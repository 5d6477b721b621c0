/// Pointer/touch drag state machine.
pub mod drag;
