pub mod annotations;
pub mod connections;
pub mod documents;
pub mod export;
pub mod symbols;
