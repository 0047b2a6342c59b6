//! Errors raised while mounting a slider on a host element.

use thiserror::Error;

/// Mounting failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MountError {
    /// Not running in a window (worker, server-side render).
    #[error("no window available")]
    NoWindow,
    /// The window has no document.
    #[error("no document available")]
    NoDocument,
    /// No element with the given id.
    #[error("element '{0}' not found")]
    ElementNotFound(String),
    /// A DOM call failed.
    #[error("DOM operation failed: {0}")]
    Dom(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(MountError::NoWindow.to_string(), "no window available");
        assert_eq!(
            MountError::ElementNotFound("volume".into()).to_string(),
            "element 'volume' not found"
        );
        assert_eq!(
            MountError::Dom("appendChild".into()).to_string(),
            "DOM operation failed: appendChild"
        );
    }
}
