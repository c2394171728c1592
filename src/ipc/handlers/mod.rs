pub mod codec;
pub mod core;
pub mod link;
pub mod report;
pub mod settings;
pub mod store;
