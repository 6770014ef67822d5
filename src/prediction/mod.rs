pub mod confidence_gate;
pub mod pipeline;
