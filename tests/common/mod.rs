#![allow(dead_code)]

use hmrouter::dispatcher::{Dispatched, Dispatcher, InboundRequest};
use http::Method;
use serde_json::Value;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Dispatcher serving the Library demo without a base path.
pub fn demo() -> Dispatcher {
    hmrouter::demo::dispatcher("").unwrap()
}

/// Dispatch one request and parse its body.
pub fn call(dispatcher: &Dispatcher, method: Method, path: &str, body: &[u8]) -> (Dispatched, Value) {
    let out = dispatcher.handle(&InboundRequest::new(method, path, body.to_vec()));
    let json: Value = serde_json::from_str(&out.response.body).unwrap();
    (out, json)
}

pub mod logs {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` with a thread-local JSON subscriber and return what it logged.
    pub fn capture<R>(f: impl FnOnce() -> R) -> (R, String) {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        (out, text)
    }
}
