pub mod cleanup;
pub mod encoding;
pub mod export;
pub mod orientation;
pub mod pipeline;
pub mod registry;
pub mod speakers;
pub mod validate;
