use serde::Deserialize;

/// Body of `POST /projects`. Any owner field sent by the client is ignored.
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}
