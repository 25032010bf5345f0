use std::io::Write;
use survey_core::{
    load_seed_path, load_seed_str, DashboardService, ProjectStatus, RepoError, SeedError,
    SeriesRepository,
};

const SEED: &str = r#"[
    {
        "id": "series-b",
        "name": "Spring Cohort",
        "projects": [
            {
                "id": "proj-1",
                "termTitle": "Spring 2024",
                "courseSections": 12,
                "enrollments": 340,
                "surveyTemplate": "Default Survey Template",
                "createdAt": "2024-01-15T09:30:00Z",
                "status": "Closed"
            }
        ]
    },
    {
        "id": "series-a",
        "name": "Fall Cohort",
        "projects": [
            {
                "id": "proj-2",
                "termTitle": "Fall 2024",
                "courseSections": 4,
                "enrollments": 90,
                "surveyTemplate": "Midterm Pulse",
                "createdAt": "2024-08-20T14:00:00.000Z",
                "status": "Published"
            }
        ]
    }
]"#;

#[test]
fn seed_file_loads_sorted_and_selects_first_series() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SEED.as_bytes()).unwrap();

    let repo = load_seed_path(file.path()).unwrap();
    let service = DashboardService::new(repo);

    let selected = service.selected_series().unwrap();
    assert_eq!(selected.id, "series-a");
    assert_eq!(selected.projects[0].status, ProjectStatus::Published);
    assert_eq!(service.repository().list_series()[1].name, "Spring Cohort");
}

#[test]
fn seed_rejects_duplicate_project_ids_across_series() {
    let seed = SEED.replace("proj-2", "proj-1");
    let err = load_seed_str(&seed).unwrap_err();
    assert!(matches!(err, SeedError::Invalid(RepoError::InvalidData(_))));
    assert!(err.to_string().contains("proj-1"));
}

#[test]
fn seed_rejects_blank_series_names() {
    let seed = SEED.replace("Fall Cohort", "   ");
    assert!(matches!(
        load_seed_str(&seed),
        Err(SeedError::Invalid(RepoError::Validation(_)))
    ));
}

#[test]
fn missing_seed_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let err = load_seed_path(&path).unwrap_err();
    assert!(matches!(err, SeedError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn empty_seed_starts_without_selection() {
    let service = DashboardService::new(load_seed_str("[]").unwrap());
    assert!(service.repository().list_series().is_empty());
    assert_eq!(service.selection().selected_series_id(), None);
}
