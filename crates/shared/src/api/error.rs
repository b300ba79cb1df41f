use thiserror::Error;

#[cfg(feature = "wasm")]
pub use frontend::*;

/// Failure of a call into the host environment (notification display, client
/// enumeration, focus, open, telemetry fetch)
#[derive(Debug, Clone, Error)]
pub enum HostError {
    #[error("{operation} rejected by host: {message}")]
    Rejected {
        operation: &'static str,
        message: String,
    },
    #[error("{operation} returned an unexpected value: {message}")]
    UnexpectedValue {
        operation: &'static str,
        message: String,
    },
    #[error("{method} {url} failed with status {status}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
    },
    #[cfg(feature = "wasm")]
    #[error("{operation}: {inner}")]
    Js {
        operation: &'static str,
        inner: JsError,
    },
}

impl HostError {
    pub fn rejected<S: Into<String>>(operation: &'static str, message: S) -> Self {
        Self::Rejected {
            operation,
            message: message.into(),
        }
    }

    pub fn unexpected<S: Into<String>>(operation: &'static str, message: S) -> Self {
        Self::UnexpectedValue {
            operation,
            message: message.into(),
        }
    }
}

#[cfg(feature = "wasm")]
mod frontend {
    use thiserror::Error;
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::js_sys::{
        Error as GenericJsError, RangeError as JsRangeError, ReferenceError as JsReferenceError,
        SyntaxError as JsSyntaxError, TypeError as JsTypeError, UriError as JsUriError,
    };

    use super::HostError;

    #[derive(Debug, Clone, Error)]
    pub enum JsError {
        #[error("GenericJs Error: {0:?}")]
        GenericJs(GenericJsError),
        #[error("JsRange Error: {0:?}")]
        JsRange(JsRangeError),
        #[error("JsReference Error: {0:?}")]
        JsReference(JsReferenceError),
        #[error("JsSyntax Error: {0:?}")]
        JsSyntax(JsSyntaxError),
        #[error("JsType Error: {0:?}")]
        JsType(JsTypeError),
        #[error("JsUri Error: {0:?}")]
        JsUri(JsUriError),
        #[error("UnknownJsValue Error: {0:?}")]
        UnknownJsValue(String),
    }

    impl From<JsValue> for JsError {
        fn from(err: JsValue) -> JsError {
            if err.is_instance_of::<JsRangeError>() {
                return JsError::JsRange(err.into());
            }
            if err.is_instance_of::<JsReferenceError>() {
                return JsError::JsReference(err.into());
            }
            if err.is_instance_of::<JsSyntaxError>() {
                return JsError::JsSyntax(err.into());
            }
            if err.is_instance_of::<JsTypeError>() {
                return JsError::JsType(err.into());
            }
            if err.is_instance_of::<JsUriError>() {
                return JsError::JsUri(err.into());
            }
            if err.is_instance_of::<GenericJsError>() {
                return JsError::GenericJs(err.into());
            }
            JsError::UnknownJsValue(format!("{:?}", err))
        }
    }

    impl From<HostError> for JsValue {
        fn from(err: HostError) -> JsValue {
            match err {
                // Hand the original exception back so the host logs it as-is
                HostError::Js {
                    inner: JsError::GenericJs(e),
                    ..
                } => e.into(),
                other => GenericJsError::new(&other.to_string()).into(),
            }
        }
    }

    pub trait JsResultExt<T> {
        /// Tag a failed host call with the name of the operation
        fn host_op(self, operation: &'static str) -> Result<T, HostError>;
    }

    impl<T> JsResultExt<T> for Result<T, JsValue> {
        fn host_op(self, operation: &'static str) -> Result<T, HostError> {
            self.map_err(|e| HostError::Js {
                operation,
                inner: JsError::from(e),
            })
        }
    }
}
