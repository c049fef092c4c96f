pub mod geom;
pub mod place;
