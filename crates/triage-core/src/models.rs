pub mod cluster;
pub mod decision;
pub mod evaluation;
pub mod hospital;
pub mod image;
pub mod recommendation;
pub mod severity;
pub mod vitals;
