pub mod normalize;
pub mod relay;
pub mod sanitizer;
pub mod upstream;
