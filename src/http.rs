use std::io::{self, Read};

use crate::update::{ProviderClient, UpdateError};

pub const USER_AGENT: &str = concat!("ddnsup/", env!("CARGO_PKG_VERSION"));

pub struct Request {
    inner: ureq::Request,
}

pub struct Response {
    reader: Box<dyn Read>,
}

pub enum Error {
    Status(u16, Response),
    Transport(Box<str>),
}

impl Request {
    pub fn get(url: &str) -> Self {
        let inner = ureq::get(url).set("User-Agent", USER_AGENT);
        Self { inner }
    }

    pub fn set(mut self, header: &str, value: &str) -> Self {
        self.inner = self.inner.set(header, value);
        self
    }

    pub fn call(self) -> Result<Response, Error> {
        self.inner
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, resp) => Error::Status(
                    code,
                    Response {
                        reader: resp.into_reader(),
                    },
                ),
                ureq::Error::Transport(tp) => Error::Transport(tp.to_string().into()),
            })
            .map(|resp| Response {
                reader: resp.into_reader(),
            })
    }
}

impl Response {
    pub fn into_string(self) -> Result<String, io::Error> {
        let mut vec = Vec::with_capacity(1024);
        let read = self.reader.take(2 * 1024 * 1024).read_to_end(&mut vec)?;
        vec.resize(read, 0);
        String::from_utf8(vec).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// Live transport behind the reconciler's `ProviderClient` seam.
///
/// DDNS providers routinely answer rejections with a non-2xx status and a
/// diagnostic body, so a status error is still a readable response here; only
/// transport failures surface as errors.
pub struct HttpClient;

impl ProviderClient for HttpClient {
    fn send(&self, url: &str, authorization: Option<&str>) -> Result<String, UpdateError> {
        let mut request = Request::get(url);

        if let Some(auth) = authorization {
            request = request.set("Authorization", auth);
        }

        match request.call() {
            Ok(resp) | Err(Error::Status(_, resp)) => resp
                .into_string()
                .map_err(|e| UpdateError::Body(e.to_string().into())),

            Err(Error::Transport(t)) => Err(UpdateError::Transport(t)),
        }
    }
}
