//! Host start-up failures
//!
//! The simulation itself cannot fail; these only come from the browser or GPU
//! environment and abort start-up.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("missing page element #{0}")]
    MissingElement(&'static str),
    #[error("element #{0} is not a canvas")]
    NotACanvas(&'static str),
    #[error("failed to create drawing surface: {source}")]
    Surface {
        #[from]
        source: wgpu::CreateSurfaceError,
    },
    #[error("no suitable GPU adapter: {source}")]
    Adapter {
        #[from]
        source: wgpu::RequestAdapterError,
    },
    #[error("failed to create GPU device: {source}")]
    Device {
        #[from]
        source: wgpu::RequestDeviceError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_element() {
        assert_eq!(
            HostError::MissingElement("canvas").to_string(),
            "missing page element #canvas"
        );
        assert_eq!(
            HostError::NotACanvas("hud").to_string(),
            "element #hud is not a canvas"
        );
    }
}
