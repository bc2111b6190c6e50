use crate::app::ports::DataSource;
use crate::config::{SourceConfig, SourceMode};
use crate::infra::http_client::RemoteCsvSource;
use crate::infra::local_file::LocalFileSource;
use crate::infra::synthetic::SyntheticSource;

/// Build the data source selected by configuration.
pub fn build_source(config: &SourceConfig) -> Box<dyn DataSource> {
    match config.mode {
        SourceMode::Remote => Box::new(RemoteCsvSource::new(config.remote_url.clone())),
        SourceMode::Local => Box::new(LocalFileSource::new(config.local_path.clone())),
        SourceMode::Synthetic => Box::new(SyntheticSource::new(
            config.synthetic_days,
            config.synthetic_seed,
        )),
    }
}
