use log::info;
use rouille::{Request, Response};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    config::HttpConfig,
    http::error::ApiError,
    session::Session,
    source::QueueSource,
    sync::{
        event::PlaybackEvent,
        sink::{DescriptorRecord, SharedSink},
    },
};

pub struct HttpServer {
    session: Arc<Mutex<Session>>,
    events: QueueSource,
    published: SharedSink,
    pub config: HttpConfig,
}

impl HttpServer {
    /// `events` must be (a clone of) the session's source and `published`
    /// (a clone of) a sink the session publishes to.
    pub fn new(
        session: Session,
        events: QueueSource,
        published: SharedSink,
        config: HttpConfig,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            events,
            published,
            config,
        }
    }

    pub fn run(self) {
        let addr = format!("{}:{}", self.config.bind_addr, self.config.port);
        rouille::start_server(addr, move |request| self.handle_request(request));
    }

    fn handle_request(&self, request: &Request) -> Response {
        Self::log_request(request);

        let response = rouille::router!(request,
            (GET) (/now) => {
                self.respond(self.now_playing())
            },
            (GET) (/now/artwork) => {
                self.respond(self.artwork())
            },
            (GET) (/status) => {
                self.respond(self.status())
            },
            (POST) (/events) => {
                self.respond(self.post_event(request))
            },
            _ => Response::empty_404()
        );

        info!("Response: {} {}", request.method(), response.status_code);
        response
    }

    fn log_request(request: &Request) {
        info!("{} {}", request.method(), request.url());
    }

    fn respond(&self, result: Result<Response, ApiError>) -> Response {
        result.unwrap_or_else(ApiError::into_response)
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, Session>, ApiError> {
        self.session
            .lock()
            .map_err(|e| ApiError::Internal(format!("Could not access session under lock: {e}")))
    }

    fn now_playing(&self) -> Result<Response, ApiError> {
        let descriptor = self.lock_session()?.current_descriptor();
        let updated_at = self
            .published
            .last()
            .map(|published| published.published_at.to_rfc3339());

        Ok(Response::json(&NowPlayingResponse {
            descriptor: DescriptorRecord::from_domain(&descriptor),
            updated_at,
        }))
    }

    fn artwork(&self) -> Result<Response, ApiError> {
        let artwork = self
            .lock_session()?
            .current_descriptor()
            .artwork
            .ok_or_else(|| ApiError::NotFound("no artwork for the current track".into()))?;

        log::debug!("ARTWORK -> 200 OK, id: {}, {} bytes", artwork.id, artwork.len());
        Ok(Response::from_data(artwork.mime(), artwork.data)
            .with_additional_header("X-Artwork-Id", artwork.id.to_hex()))
    }

    fn status(&self) -> Result<Response, ApiError> {
        let status = self.lock_session()?.status();
        Ok(Response::json(&status))
    }

    fn post_event(&self, request: &Request) -> Result<Response, ApiError> {
        let event: PlaybackEvent = rouille::input::json_input(request)?;
        let descriptor = {
            let mut session = self.lock_session()?;
            self.events.push(event);
            session.pump();
            session.current_descriptor()
        };
        Ok(Response::json(&DescriptorRecord::from_domain(&descriptor)))
    }
}

#[derive(Serialize, Deserialize)]
struct NowPlayingResponse {
    #[serde(flatten)]
    descriptor: DescriptorRecord,
    updated_at: Option<String>,
}

#[cfg(test)]
pub fn parse_json_response<T: serde::de::DeserializeOwned>(
    response: rouille::Response,
) -> anyhow::Result<T> {
    Ok(serde_json::from_reader(
        response.data.into_reader_and_size().0,
    )?)
}
