use super::request::read_request;
use super::response::{write_finalized, write_json_error};
use crate::dispatcher::Dispatcher;
use may_minihttp::{HttpService, Request, Response};
use std::io;
use tracing::warn;

/// `may_minihttp` service that hands every request to a [`Dispatcher`].
///
/// Cloned once per connection; the clones share the dispatcher's read-only
/// route table and registry.
#[derive(Clone, Debug)]
pub struct AppService {
    pub dispatcher: Dispatcher,
}

impl AppService {
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let inbound = match read_request(req) {
            Ok(inbound) => inbound,
            Err(err) => {
                warn!(error = %err, "Unreadable request");
                write_json_error(res, 400, &err.to_string());
                return Ok(());
            }
        };

        let dispatched = self.dispatcher.handle(&inbound);
        write_finalized(res, dispatched.response);
        Ok(())
    }
}
