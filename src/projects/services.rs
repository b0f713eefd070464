use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::AppError,
    projects::{
        dto::CreateProjectRequest,
        repo_types::{NewProject, Project},
    },
    state::AppState,
};

/// `owner` must come from the verified token, never from the request body.
pub async fn create_project(
    state: &AppState,
    owner: Uuid,
    payload: CreateProjectRequest,
) -> Result<Project, AppError> {
    // Blank titles are rejected; accepted ones are stored as sent.
    let title = payload
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Title is required".into()))?;

    let project = state
        .projects
        .create(NewProject {
            user_id: owner,
            title,
            description: payload.description,
        })
        .await?;
    info!(user_id = %owner, project_id = %project.id, "project created");
    Ok(project)
}

pub async fn list_projects(state: &AppState, owner: Uuid) -> Result<Vec<Project>, AppError> {
    let projects = state.projects.list_by_user(owner).await?;
    debug!(user_id = %owner, count = projects.len(), "projects listed");
    Ok(projects)
}

/// Unknown, foreign, or unparseable ids are a silent no-op.
pub async fn delete_project(state: &AppState, owner: Uuid, raw_id: &str) -> Result<bool, AppError> {
    let Ok(project_id) = Uuid::parse_str(raw_id) else {
        debug!(user_id = %owner, raw_id, "delete with unparseable id ignored");
        return Ok(false);
    };
    let deleted = state.projects.delete(owner, project_id).await?;
    info!(user_id = %owner, project_id = %project_id, deleted, "project delete");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(title: Option<&str>, description: Option<&str>) -> CreateProjectRequest {
        CreateProjectRequest {
            title: title.map(Into::into),
            description: description.map(Into::into),
        }
    }

    #[tokio::test]
    async fn title_is_required() {
        let state = AppState::fake();
        let owner = Uuid::new_v4();
        for payload in [req(None, Some("d")), req(Some(""), None), req(Some("   "), None)] {
            let err = create_project(&state, owner, payload).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(ref m) if m == "Title is required"));
        }
        assert!(list_projects(&state, owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn title_is_stored_as_sent() {
        let state = AppState::fake();
        let owner = Uuid::new_v4();
        let project = create_project(&state, owner, req(Some(" T "), None)).await.unwrap();
        assert_eq!(project.title, " T ");
        assert_eq!(list_projects(&state, owner).await.unwrap()[0].title, " T ");
    }

    #[tokio::test]
    async fn listing_is_owner_scoped_and_ordered() {
        let state = AppState::fake();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let a1 = create_project(&state, a, req(Some("first"), None)).await.unwrap();
        let b1 = create_project(&state, b, req(Some("other"), None)).await.unwrap();
        let a2 = create_project(&state, a, req(Some("second"), Some("desc")))
            .await
            .unwrap();

        let listed = list_projects(&state, a).await.unwrap();
        assert_eq!(listed, vec![a1, a2]);
        assert!(listed.iter().all(|p| p.user_id == a));
        assert_eq!(list_projects(&state, b).await.unwrap(), vec![b1]);
    }

    #[tokio::test]
    async fn delete_only_touches_own_projects() {
        let state = AppState::fake();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let pb = create_project(&state, b, req(Some("b's"), None)).await.unwrap();

        let before = list_projects(&state, b).await.unwrap();
        let deleted = delete_project(&state, a, &pb.id.to_string()).await.unwrap();
        assert!(!deleted);
        assert_eq!(list_projects(&state, b).await.unwrap(), before);

        assert!(delete_project(&state, b, &pb.id.to_string()).await.unwrap());
        assert!(list_projects(&state, b).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_with_bad_or_unknown_id_is_noop() {
        let state = AppState::fake();
        let owner = Uuid::new_v4();
        assert!(!delete_project(&state, owner, "not-a-uuid").await.unwrap());
        assert!(!delete_project(&state, owner, &Uuid::new_v4().to_string())
            .await
            .unwrap());
    }
}
