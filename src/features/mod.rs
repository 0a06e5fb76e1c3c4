mod encoder;

pub use encoder::{encode, EncodeResult, Feature, FeatureCollection, Geometry};
