use candle_core::Device;
use tracing::warn;

/// Picks the compute device for one of the model runtimes. GPU backends
/// are tried in feature order (Metal, then CUDA); CPU always works, so
/// selection cannot fail.
pub fn select_device(runtime: &str) -> Device {
    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => {
            tracing::info!(runtime, "Using Metal GPU");
            return device;
        }
        Err(e) => warn!(runtime, error = %e, "Metal device unavailable"),
    }

    #[cfg(feature = "cuda")]
    match Device::new_cuda(0) {
        Ok(device) => {
            tracing::info!(runtime, "Using CUDA GPU");
            return device;
        }
        Err(e) => warn!(runtime, error = %e, "CUDA device unavailable"),
    }

    if cfg!(any(feature = "metal", feature = "cuda")) {
        warn!(runtime, "No GPU device available, falling back to CPU");
    } else {
        tracing::debug!(runtime, "No GPU backend compiled, using CPU");
    }

    Device::Cpu
}
