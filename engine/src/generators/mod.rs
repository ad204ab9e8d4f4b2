//! Generation capabilities
//!
//! One module per catalog tool. Each generator owns its prompt template,
//! calls the model through the failover router, extracts the JSON payload
//! from the completion, and validates the minimum shape. Generators are
//! deliberately thin: swapping a prompt or an output field stays local to
//! one file and never touches the orchestration core.

pub mod agenda;
pub mod code;
pub mod copy;
pub mod deck;
pub mod mindmap;
pub mod palette;
pub mod persona;
pub mod plan;
