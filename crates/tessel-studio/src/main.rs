mod demo;
mod gpu;
mod runtime;

use anyhow::Result;
use tessel_engine::logging::{LoggingConfig, init_logging};

use crate::gpu::GpuInit;
use crate::runtime::{Runtime, RuntimeConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    Runtime::run(RuntimeConfig::default(), GpuInit::default())
}
