//! Tracker server client.
//!
//! [`Tracker`] is the seam the workflows talk to; [`HttpTracker`] is the
//! `ureq` implementation. Every call is attempted exactly once: no retries,
//! no timeouts beyond the transport defaults.

use std::io::Read;

use multipart::client::lazy::Multipart;
use serde::de::DeserializeOwned;
use serde_json::json;

use tracker_core::{
    Action, CommitHash, CreatedSet, Credentials, ListFilter, PatchStatus, RemotePatchSet,
    RemoteSet,
};

use crate::error::SyncError;

/// Target of a review action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionTarget {
    /// Whole set: `POST /set/{id}/{action}`.
    Set(String),
    /// One patch, addressed by its `TrackedAt:` URL: `POST {url}/{action}`.
    Patch(String),
}

/// Remote operations the sync workflows need.
pub trait Tracker {
    /// `POST /set`; `obsoletes` names the set this one supersedes.
    fn create_set(&self, payload: &str, obsoletes: Option<&str>) -> Result<CreatedSet, SyncError>;

    /// `POST /patch/{commit}/body` as multipart field `diff`.
    fn upload_patch_body(&self, commit: &CommitHash, body: &str) -> Result<(), SyncError>;

    /// `GET /patch/{commit}/download`.
    fn download_patch_body(&self, commit: &CommitHash) -> Result<String, SyncError>;

    /// `GET /set/{id}`.
    fn fetch_set(&self, set_id: &str) -> Result<RemoteSet, SyncError>;

    fn post_action(
        &self,
        target: &ActionTarget,
        action: Action,
        message: Option<&str>,
    ) -> Result<(), SyncError>;

    /// `POST /patchset/{id}/obsolete`.
    fn mark_obsolete(&self, set_id: &str) -> Result<(), SyncError>;

    /// `GET /patch/{commit}`; `Ok(None)` when the server has no record.
    fn fetch_patch_status(&self, commit: &CommitHash) -> Result<Option<PatchStatus>, SyncError>;

    /// `GET /set`, unauthenticated.
    fn list_sets(&self, filter: Option<&ListFilter>) -> Result<Vec<RemotePatchSet>, SyncError>;
}

// ---------------------------------------------------------------------------
// HttpTracker
// ---------------------------------------------------------------------------

const USER_AGENT: &str = concat!("tracker/", env!("CARGO_PKG_VERSION"));

/// Blocking HTTP client bound to one set of credentials.
pub struct HttpTracker {
    agent: ureq::Agent,
    credentials: Credentials,
}

impl HttpTracker {
    pub fn new(credentials: Credentials) -> Self {
        let agent = ureq::AgentBuilder::new().user_agent(USER_AGENT).build();
        Self { agent, credentials }
    }

    pub fn base_url(&self) -> &str {
        self.credentials.base_url()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }

    fn authed(&self, method: &str, url: &str) -> ureq::Request {
        tracing::debug!("{} {}", method, url);
        self.agent
            .request(method, url)
            .set("Authorization", &self.credentials.authorization())
    }
}

impl Tracker for HttpTracker {
    fn create_set(&self, payload: &str, obsoletes: Option<&str>) -> Result<CreatedSet, SyncError> {
        let response = self
            .authed("POST", &self.url("/set"))
            .set("Content-Type", "application/json")
            .set("X-Obsoletes", obsoletes.unwrap_or("no"))
            .send_string(payload)?;
        read_json(response)
    }

    fn upload_patch_body(&self, commit: &CommitHash, body: &str) -> Result<(), SyncError> {
        let (content_type, form) = diff_form(&format!("{commit}.patch"), body)?;
        self.authed("POST", &self.url(&format!("/patch/{commit}/body")))
            .set("Content-Type", &content_type)
            .send_bytes(&form)?;
        Ok(())
    }

    fn download_patch_body(&self, commit: &CommitHash) -> Result<String, SyncError> {
        let response = self
            .authed("GET", &self.url(&format!("/patch/{commit}/download")))
            .set("Content-Type", "text/plain")
            .call()?;
        read_text(response)
    }

    fn fetch_set(&self, set_id: &str) -> Result<RemoteSet, SyncError> {
        let response = self
            .authed("GET", &self.url(&format!("/set/{set_id}")))
            .set("Accept", "application/json")
            .call()?;
        read_json(response)
    }

    fn post_action(
        &self,
        target: &ActionTarget,
        action: Action,
        message: Option<&str>,
    ) -> Result<(), SyncError> {
        let url = match target {
            ActionTarget::Set(id) => self.url(&format!("/set/{id}/{action}")),
            ActionTarget::Patch(tracked_url) => {
                format!("{}/{action}", tracked_url.trim_end_matches('/'))
            }
        };
        self.authed("POST", &url)
            .set("Content-Type", "application/json")
            .send_string(&json!({ "message": message }).to_string())?;
        Ok(())
    }

    fn mark_obsolete(&self, set_id: &str) -> Result<(), SyncError> {
        self.authed("POST", &self.url(&format!("/patchset/{set_id}/obsolete")))
            .set("Content-Type", "application/json")
            .send_string("")?;
        Ok(())
    }

    fn fetch_patch_status(&self, commit: &CommitHash) -> Result<Option<PatchStatus>, SyncError> {
        let result = self
            .authed("GET", &self.url(&format!("/patch/{commit}")))
            .set("Accept", "application/json")
            .call();
        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        read_json::<Option<PatchStatus>>(response)
    }

    fn list_sets(&self, filter: Option<&ListFilter>) -> Result<Vec<RemotePatchSet>, SyncError> {
        let url = self.url("/set");
        tracing::debug!("GET {}", url);
        let mut request = self.agent.get(&url).set("Accept", "application/json");
        if let Some(filter) = filter {
            let (field, value) = filter.query_pairs();
            request = request.query("filter", field).query("filter_value", value);
        }
        read_json(request.call()?)
    }
}

fn read_text(response: ureq::Response) -> Result<String, SyncError> {
    let mut body = String::new();
    response
        .into_reader()
        .read_to_string(&mut body)
        .map_err(|e| SyncError::Transport(format!("failed to read response body: {e}")))?;
    Ok(body)
}

fn read_json<T: DeserializeOwned>(response: ureq::Response) -> Result<T, SyncError> {
    let body = read_text(response)?;
    Ok(serde_json::from_str(&body)?)
}

/// `multipart/form-data` body with the patch as file field `diff`.
///
/// Buffered so the request carries a `Content-Length` instead of being chunked.
fn diff_form(filename: &str, content: &str) -> Result<(String, Vec<u8>), SyncError> {
    let mut form = Multipart::new();
    form.add_stream("diff", content.as_bytes(), Some(filename), None);
    let mut prepared = form
        .prepare()
        .map_err(|e| SyncError::InvalidData(format!("failed to build upload form: {}", e.error)))?;

    let content_type = format!("multipart/form-data; boundary={}", prepared.boundary());
    let mut body = Vec::with_capacity(content.len() + 256);
    prepared
        .read_to_end(&mut body)
        .map_err(|e| SyncError::InvalidData(format!("failed to build upload form: {e}")))?;
    Ok((content_type, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_form_carries_one_file_field() {
        let (content_type, body) = diff_form("x.patch", "line 1\nline 2\n").unwrap();
        let boundary = content_type
            .strip_prefix("multipart/form-data; boundary=")
            .expect("multipart content type");
        let body = String::from_utf8(body).unwrap();

        assert!(body.contains(&format!("--{boundary}\r\n")));
        assert!(body.contains("name=\"diff\""));
        assert!(body.contains("filename=\"x.patch\""));
        assert!(body.contains("line 1\nline 2\n"));
        assert!(body.trim_end().ends_with(&format!("--{boundary}--")));
    }

    #[test]
    fn base_url_ignores_trailing_slash() {
        let tracker = HttpTracker::new(Credentials {
            url: "http://localhost:9292/".into(),
            user: "u".into(),
            password: "p".into(),
        });
        assert_eq!(tracker.url("/set"), "http://localhost:9292/set");
    }
}
