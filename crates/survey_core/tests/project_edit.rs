use std::collections::HashSet;
use survey_core::{
    InMemorySeriesRepository, ProjectDraft, ProjectField, ProjectPatch, ProjectStatus, RepoError,
    SeriesRepository, SurveyProject, ValidationError, DEFAULT_SURVEY_TEMPLATE,
};

fn repo_with_project(status: ProjectStatus) -> (InMemorySeriesRepository, SurveyProject) {
    let mut repo = InMemorySeriesRepository::new();
    let series = repo.create_series("Fall Cohort").unwrap();
    let draft = ProjectDraft::new("Fall 2024", status)
        .with_course_sections(6)
        .with_enrollments(150)
        .with_survey_template("Midterm Pulse");
    let project = repo.create_project(&series.id, &draft).unwrap();
    (repo, project)
}

fn stored(repo: &InMemorySeriesRepository, project_id: &str) -> SurveyProject {
    repo.find_project(project_id).unwrap().1.clone()
}

#[test]
fn create_without_counts_uses_defaults() {
    let mut repo = InMemorySeriesRepository::new();
    let series = repo.create_series("Fall Cohort").unwrap();
    let project = repo
        .create_project(&series.id, &ProjectDraft::new("Fall 2024", ProjectStatus::Draft))
        .unwrap();

    assert_eq!(project.course_sections, 0);
    assert_eq!(project.enrollments, 0);
    assert_eq!(project.survey_template, DEFAULT_SURVEY_TEMPLATE);
    assert_eq!(stored(&repo, &project.id), project);
}

#[test]
fn create_rejects_blank_title_and_bad_status() {
    let mut repo = InMemorySeriesRepository::new();
    let series = repo.create_series("Fall Cohort").unwrap();

    let err = repo
        .create_project(&series.id, &ProjectDraft::new("  ", ProjectStatus::Draft))
        .unwrap_err();
    assert_eq!(err, RepoError::Validation(ValidationError::BlankTermTitle));

    let draft = ProjectDraft {
        term_title: "Fall".to_string(),
        status: Some("Archived".to_string()),
        ..ProjectDraft::default()
    };
    let err = repo.create_project(&series.id, &draft).unwrap_err();
    assert_eq!(
        err,
        RepoError::Validation(ValidationError::InvalidStatus("Archived".to_string()))
    );
}

#[test]
fn projects_keep_creation_order_and_unique_ids() {
    let mut repo = InMemorySeriesRepository::new();
    let first = repo.create_series("A").unwrap();
    let second = repo.create_series("B").unwrap();

    let mut ids = HashSet::new();
    for (index, title) in ["Zeta", "Alpha", "Mu"].into_iter().enumerate() {
        let owner = if index % 2 == 0 { &first.id } else { &second.id };
        let project = repo
            .create_project(owner, &ProjectDraft::new(title, ProjectStatus::Draft))
            .unwrap();
        assert!(ids.insert(project.id));
    }

    let titles = repo
        .get_series(&first.id)
        .unwrap()
        .projects
        .iter()
        .map(|project| project.term_title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["Zeta", "Mu"]);
}

#[test]
fn closed_project_rejects_every_edit_unchanged() {
    let (mut repo, project) = repo_with_project(ProjectStatus::Closed);
    let before = serde_json::to_vec(&stored(&repo, &project.id)).unwrap();

    for patch in [
        ProjectPatch::new(),
        ProjectPatch::new().set(ProjectField::Enrollments, "10"),
        ProjectPatch::new().set(ProjectField::Status, "Closed"),
    ] {
        let err = repo.edit_project(&project.id, &patch).unwrap_err();
        assert_eq!(err, RepoError::ImmutableState(project.id.clone()));
    }

    let after = serde_json::to_vec(&stored(&repo, &project.id)).unwrap();
    assert_eq!(before, after);
}

#[test]
fn backward_transition_rejects_whole_patch() {
    let (mut repo, project) = repo_with_project(ProjectStatus::Live);
    let patch = ProjectPatch::new()
        .set(ProjectField::Enrollments, "999")
        .set(ProjectField::Status, "Draft");

    let err = repo.edit_project(&project.id, &patch).unwrap_err();
    assert!(matches!(
        err,
        RepoError::InvalidTransition {
            from: ProjectStatus::Live,
            to: ProjectStatus::Draft,
            ..
        }
    ));
    assert_eq!(stored(&repo, &project.id), project);
}

#[test]
fn invalid_count_rejects_whole_patch() {
    let (mut repo, project) = repo_with_project(ProjectStatus::Draft);
    let patch = ProjectPatch::new()
        .set(ProjectField::TermTitle, "Renamed")
        .set(ProjectField::CourseSections, "-2");

    assert!(matches!(
        repo.edit_project(&project.id, &patch),
        Err(RepoError::Validation(ValidationError::InvalidCount { .. }))
    ));
    assert_eq!(stored(&repo, &project.id), project);
}

#[test]
fn same_status_is_not_a_transition() {
    let (mut repo, project) = repo_with_project(ProjectStatus::Published);
    let patch = ProjectPatch::new().set(ProjectField::Status, "Published");

    assert!(matches!(
        repo.edit_project(&project.id, &patch),
        Err(RepoError::InvalidTransition { .. })
    ));
}

#[test]
fn draft_edit_updates_every_field() {
    let (mut repo, project) = repo_with_project(ProjectStatus::Draft);
    let patch = ProjectPatch::new()
        .set(ProjectField::TermTitle, " Fall 2024 (rev) ")
        .set(ProjectField::CourseSections, "8")
        .set(ProjectField::Enrollments, "210")
        .set(ProjectField::SurveyTemplate, "End of Term")
        .set(ProjectField::Status, "Live");

    let updated = repo.edit_project(&project.id, &patch).unwrap();
    assert_eq!(updated.term_title, "Fall 2024 (rev)");
    assert_eq!(updated.course_sections, 8);
    assert_eq!(updated.enrollments, 210);
    assert_eq!(updated.survey_template, "End of Term");
    assert_eq!(updated.status, ProjectStatus::Live);
    assert_eq!(updated.created_at, project.created_at);
    assert_eq!(updated.id, project.id);
}

#[test]
fn published_edit_ignores_template_and_blank_values() {
    let (mut repo, project) = repo_with_project(ProjectStatus::Published);
    let patch = ProjectPatch::new()
        .set(ProjectField::SurveyTemplate, "Custom")
        .set(ProjectField::TermTitle, "")
        .set(ProjectField::CourseSections, "7");

    let updated = repo.edit_project(&project.id, &patch).unwrap();
    assert_eq!(updated.survey_template, "Midterm Pulse");
    assert_eq!(updated.term_title, "Fall 2024");
    assert_eq!(updated.course_sections, 7);
    assert_eq!(updated.status, ProjectStatus::Published);
}

#[test]
fn edit_patch_deserializes_from_form_json() {
    let (mut repo, project) = repo_with_project(ProjectStatus::Live);
    let patch: ProjectPatch = serde_json::from_value(serde_json::json!({
        "termTitle": "ignored while live",
        "enrollments": 175,
        "status": "Closed"
    }))
    .unwrap();

    let updated = repo.edit_project(&project.id, &patch).unwrap();
    assert_eq!(updated.enrollments, 175);
    assert_eq!(updated.status, ProjectStatus::Closed);
    assert_eq!(updated.term_title, "Fall 2024");
}
