pub mod enrich;
pub mod normalize;
