pub mod errors;
pub mod teleportation;
