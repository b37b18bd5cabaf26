pub mod s3;
pub mod store;
pub mod videos;
