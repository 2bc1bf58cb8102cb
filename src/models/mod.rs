pub mod component;
pub mod kit;
pub mod kit_component;
pub mod loan;
