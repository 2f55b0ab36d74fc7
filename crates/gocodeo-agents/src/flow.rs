use anyhow::Result;
use async_trait::async_trait;

use gocodeo_models::BuildRequest;

/// Entry point the CLI hands a resolved request to.
///
/// `Ok(true)` means the project was built, `Ok(false)` means the flow ran but
/// could not produce the project, and `Err` carries an unexpected failure.
#[async_trait]
pub trait BuildFlow: Send + Sync {
    async fn run_build_flow(&self, request: &BuildRequest) -> Result<bool>;
}
