pub mod http_client;
pub mod local_file;
pub mod source_factory;
pub mod synthetic;

pub use source_factory::build_source;
