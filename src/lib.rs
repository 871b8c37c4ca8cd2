pub mod field;
pub mod linear;
pub mod mesh;
pub mod system;
