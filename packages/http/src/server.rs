//! The blocking transport loop.

use std::io::{self, Read};
use std::net::SocketAddr;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tiny_http::{Header, Response, StatusCode};

use crate::config::ServerConfig;
use crate::service::Service;
use crate::types::{Exchange, Reply};
use crate::Error;

impl Exchange for tiny_http::Request {
    fn method(&self) -> Result<http::Method, String> {
        let token = tiny_http::Request::method(self).as_str();
        http::Method::from_bytes(token.as_bytes()).map_err(|_| token.to_string())
    }

    fn target(&self) -> &str {
        self.url()
    }

    fn client(&self) -> String {
        self.remote_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn read_body(&mut self) -> io::Result<Vec<u8>> {
        let mut body = Vec::new();
        self.as_reader().read_to_end(&mut body)?;
        Ok(body)
    }
}

/// Serves a [`Service`] over HTTP, one request at a time.
///
/// Between requests (and at least once per poll interval when idle) the
/// service gets a chance to write its backup.
pub struct Server {
    http: tiny_http::Server,
    service: Service,
    poll_interval: Duration,
}

impl Server {
    pub fn bind(config: &ServerConfig, service: Service) -> Result<Self, Error> {
        Self::bind_addr(&config.listen_addr(), service, config.poll_interval())
    }

    pub fn bind_addr(addr: &str, service: Service, poll_interval: Duration) -> Result<Self, Error> {
        let http = tiny_http::Server::http(addr).map_err(|e| Error::Bind {
            addr: addr.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            http,
            service,
            poll_interval,
        })
    }

    /// The bound address; useful after binding port 0.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.http.server_addr().to_ip()
    }

    /// Serve forever.
    pub fn run(mut self) -> Result<(), Error> {
        let running = AtomicBool::new(true);
        self.run_while(&running)
    }

    /// Serve until `running` is cleared. The flag is checked once per poll
    /// interval.
    pub fn run_while(&mut self, running: &AtomicBool) -> Result<(), Error> {
        if let Some(addr) = self.local_addr() {
            log::info!("Listening on {}", addr);
        }
        while running.load(Ordering::SeqCst) {
            self.poll_once()?;
        }
        Ok(())
    }

    /// Wait up to one poll interval for a request, serve it, then run
    /// maintenance.
    pub fn poll_once(&mut self) -> Result<(), Error> {
        if let Some(request) = self.http.recv_timeout(self.poll_interval)? {
            self.serve(request);
        }
        self.service.maintain(Instant::now());
        Ok(())
    }

    fn serve(&mut self, mut request: tiny_http::Request) {
        let service = &mut self.service;
        let reply = panic::catch_unwind(AssertUnwindSafe(|| service.handle(&mut request)))
            .unwrap_or_else(|_| {
                log::error!("Request handler panicked; replying 400");
                Reply::bad_request()
            });

        if let Err(e) = request.respond(to_response(reply)) {
            log::warn!("Could not send reply: {}", e);
        }
    }
}

fn to_response(reply: Reply) -> Response<io::Cursor<Vec<u8>>> {
    let mut response =
        Response::from_data(reply.body).with_status_code(StatusCode(reply.status.as_u16()));
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], Reply::CONTENT_TYPE.as_bytes()) {
        response.add_header(header);
    }
    response
}
