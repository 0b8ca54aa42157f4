pub mod chain;
pub mod frames;
pub mod manifest;
pub mod outlier;
pub mod report;
pub mod sequence;
pub mod signature;
