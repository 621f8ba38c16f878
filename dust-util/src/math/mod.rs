pub mod direction;
pub mod position;
pub mod vector3;
