use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use rsvp::{
    contract::{
        client::RsvpApi,
        error::RsvpError,
        model::{Category, GuestResponse, Group, Language, NewGuestResponse},
    },
    domain::{
        admin_view::AdminView,
        error::DomainError,
        repo::ResponsesRepository,
        selection::SelectionState,
        service::{Service, ServiceConfig},
    },
    gateways::local::RsvpLocalClient,
    infra::{
        report::PdfReportRenderer,
        storage::{migrations::Migrator, sea_orm_repo::SeaOrmResponsesRepository},
    },
};

/// Create a fresh test database for each test
async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

async fn create_test_service() -> Arc<Service> {
    let db = create_test_db().await;
    Arc::new(Service::new(
        Arc::new(SeaOrmResponsesRepository::new(db)),
        Arc::new(PdfReportRenderer::new("Report Partecipanti Matrimonio")),
        ServiceConfig::default(),
    ))
}

fn guest(first: &str, last: &str) -> NewGuestResponse {
    NewGuestResponse {
        first_name: first.to_string(),
        last_name: last.to_string(),
        ..Default::default()
    }
}

/// Submissions in quick succession can share a timestamp prefix; space them out
/// so newest-first ordering is observable.
async fn submit_spaced(service: &Service, new: NewGuestResponse) -> GuestResponse {
    tokio::time::sleep(Duration::from_millis(20)).await;
    service.submit(new).await.expect("submit failed")
}

#[tokio::test]
async fn maria_bianchi_with_no_selections_is_stored_with_empty_fields() -> Result<()> {
    let service = create_test_service().await;

    let created = service.submit(guest("Maria", "Bianchi")).await?;
    assert_eq!(created.first_name, "Maria");
    assert_eq!(created.last_name, "Bianchi");
    assert_eq!(created.intolerances, "");
    assert_eq!(created.allergies, "");
    assert_eq!(created.notes, "");

    let all = service.list(None).await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, created.id);
    assert_eq!(all[0].intolerances, "");
    assert_eq!(all[0].notes, "");
    Ok(())
}

#[tokio::test]
async fn selections_are_flattened_in_catalog_then_custom_order() -> Result<()> {
    let service = create_test_service().await;

    let mut state = SelectionState::new();
    state.toggle(Category::Lactose);
    state.toggle(Category::Gluten);
    state.toggle(Category::Peanuts);
    state.toggle_other(Group::Intolerances);
    assert!(state.confirm_custom(Group::Intolerances, "  Fruttosio "));
    state.toggle_other(Group::Allergies);
    assert!(state.confirm_custom(Group::Allergies, "Kiwi"));

    let created = service
        .submit(NewGuestResponse {
            first_name: "Marco".into(),
            last_name: "Rossi".into(),
            notes: Some("Arrivo tardi".into()),
            language: Language::It,
            selection: state.into_selection(),
        })
        .await?;

    assert_eq!(created.intolerances, "Lattosio, Glutine, Fruttosio");
    assert_eq!(created.allergies, "Arachidi, Kiwi");
    assert_eq!(created.notes, "Arrivo tardi");

    // Detail view shows exactly what was persisted
    let fetched = service.get(created.id).await?;
    assert_eq!(fetched.intolerances, created.intolerances);
    assert_eq!(fetched.allergies, created.allergies);
    Ok(())
}

#[tokio::test]
async fn labels_follow_the_guest_language() -> Result<()> {
    let service = create_test_service().await;

    let mut new = guest("Arta", "Hoxha");
    new.language = Language::Sq;
    new.selection.selected.insert(Category::Eggs);
    new.selection.selected.insert(Category::Gluten);

    let created = service.submit(new).await?;
    assert_eq!(created.intolerances, "Gluten");
    assert_eq!(created.allergies, "Vezë");
    assert_eq!(created.language, Language::Sq);
    assert_eq!(service.get(created.id).await?.language, Language::Sq);
    Ok(())
}

#[tokio::test]
async fn custom_none_entries_are_dropped_when_flattening() -> Result<()> {
    let service = create_test_service().await;

    let mut new = guest("Luca", "Verdi");
    new.selection.custom_intolerances = vec!["nessuna".into()];
    new.selection.custom_allergies = vec!["NESSUNA".into(), "Sesamo".into()];

    let created = service.submit(new).await?;
    assert_eq!(created.intolerances, "");
    assert_eq!(created.allergies, "Sesamo");
    Ok(())
}

#[tokio::test]
async fn empty_names_create_no_record() -> Result<()> {
    let service = create_test_service().await;

    for (first, last) in [("", "Bianchi"), ("Maria", ""), ("   ", "Bianchi"), ("Maria", "\t")] {
        let err = service.submit(guest(first, last)).await.unwrap_err();
        assert!(matches!(err, DomainError::EmptyName { .. }), "{err:?}");
    }

    assert!(service.list(None).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn names_are_trimmed_and_duplicates_are_kept() -> Result<()> {
    let service = create_test_service().await;

    service.submit(guest("  Maria ", " Bianchi")).await?;
    service.submit(guest("Maria", "Bianchi")).await?;

    let all = service.list(None).await?;
    assert_eq!(all.len(), 2);
    assert!(all
        .iter()
        .all(|r| r.first_name == "Maria" && r.last_name == "Bianchi"));
    assert_ne!(all[0].id, all[1].id);
    Ok(())
}

#[tokio::test]
async fn list_is_newest_first_and_search_matches_either_name() -> Result<()> {
    let service = create_test_service().await;

    let first = submit_spaced(&service, guest("Marco", "Rossi")).await;
    let second = submit_spaced(&service, guest("Roberta", "Neri")).await;
    let third = submit_spaced(&service, guest("Maria", "Bianchi")).await;

    let ids: Vec<Uuid> = service.list(None).await?.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);

    // "ro" hits Rossi by last name and Roberta by first name
    let hits: Vec<Uuid> = service.list(Some("ro")).await?.iter().map(|r| r.id).collect();
    assert_eq!(hits, vec![second.id, first.id]);

    let hits = service.list(Some("RO")).await?;
    assert_eq!(hits.len(), 2);

    let hits = service.list(Some("")).await?;
    assert_eq!(hits.len(), 3);
    Ok(())
}

#[tokio::test]
async fn second_delete_of_same_id_is_not_found() -> Result<()> {
    let service = create_test_service().await;
    let keep = service.submit(guest("Marco", "Rossi")).await?;
    let gone = service.submit(guest("Maria", "Bianchi")).await?;

    service.delete(gone.id).await?;
    let err = service.delete(gone.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { id } if id == gone.id));

    let remaining = service.list(None).await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep.id);
    Ok(())
}

#[tokio::test]
async fn report_counts_tokens_and_skips_the_none_sentinel() -> Result<()> {
    let repo = Arc::new(SeaOrmResponsesRepository::new(create_test_db().await));

    // Stored text as older clients wrote it, sentinel included
    for intolerances in ["Gluten, Nessuna", "Gluten", ""] {
        repo.insert(GuestResponse {
            id: Uuid::new_v4(),
            first_name: "Ospite".into(),
            last_name: "Test".into(),
            intolerances: intolerances.into(),
            allergies: String::new(),
            notes: String::new(),
            submitted_at: Utc::now(),
            language: Language::It,
        })
        .await?;
    }

    let service = Service::new(
        repo,
        Arc::new(PdfReportRenderer::new("Report")),
        ServiceConfig::default(),
    );
    let report = service.report(Utc::now()).await?;
    assert_eq!(report.stats.total, 3);
    assert_eq!(report.stats.intolerances.len(), 1);
    assert_eq!(report.stats.intolerances[0].token, "Gluten");
    assert_eq!(report.stats.intolerances[0].count, 2);
    assert!(report.stats.allergies.is_empty());

    // Missing values render as "-" in the table
    assert!(report.rows.iter().any(|r| r.intolerances == "-"));
    assert!(report.rows.iter().all(|r| r.allergies == "-"));
    Ok(())
}

#[tokio::test]
async fn exported_report_is_a_pdf() -> Result<()> {
    let service = create_test_service().await;
    service.submit(guest("Maria", "Bianchi")).await?;

    let bytes = service.export_report(Utc::now()).await?;
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(service.report_content_type(), "application/pdf");
    Ok(())
}

#[tokio::test]
async fn admin_search_narrows_the_list_but_not_the_report() -> Result<()> {
    let service = create_test_service().await;
    let client: Arc<dyn RsvpApi> = Arc::new(RsvpLocalClient::new(service.clone()));

    let mut maria = guest("Maria", "Bianchi");
    maria.selection.selected.insert(Category::Gluten);
    client.submit(maria).await?;
    client.submit(guest("Marco", "Rossi")).await?;
    client.submit(guest("Giulia", "Biancofiore")).await?;

    service.verify_admin("cla&ago", "29082026")?;

    let mut view = AdminView::new(Vec::new());
    assert_eq!(view.refresh(client.as_ref()).await?, 3);

    view.set_search("bian");
    let names: Vec<String> = view.filtered().iter().map(|r| r.last_name.clone()).collect();
    assert_eq!(names.len(), 2);
    assert!(names.iter().all(|n| n.to_lowercase().contains("bian")));

    let report = view.report("Nessuna", Utc::now());
    assert_eq!(report.stats.total, 3);
    assert_eq!(report.rows.len(), 3);
    Ok(())
}

#[tokio::test]
async fn admin_delete_flow_through_local_client() -> Result<()> {
    let service = create_test_service().await;
    let client: Arc<dyn RsvpApi> = Arc::new(RsvpLocalClient::new(service.clone()));

    let maria = client.submit(guest("Maria", "Bianchi")).await?;
    client.submit(guest("Marco", "Rossi")).await?;

    let mut view = AdminView::new(Vec::new());
    view.refresh(client.as_ref()).await?;
    view.open_detail(maria.id);

    let pending = view.request_delete(maria.id).cloned().expect("pending delete");
    assert_eq!(
        pending.prompt,
        "Sei sicuro di voler eliminare la partecipazione di Maria Bianchi?"
    );
    assert_eq!(view.confirm_delete(client.as_ref()).await?, Some(maria.id));
    assert_eq!(view.records().len(), 1);
    assert!(view.detail().is_none());

    // Already deleted in the store: the list stays as it is
    let err = client.delete_response(maria.id).await.unwrap_err();
    assert_eq!(err, RsvpError::not_found(maria.id));
    assert_eq!(client.list_responses(None).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn wrong_credentials_are_rejected() {
    let service = create_test_service().await;
    let err = service.verify_admin("cla&ago", "wrong").unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized));
    assert_eq!(err.to_string(), "Credenziali errate");
}

/// Store that refuses every call.
struct DownRepo;

#[async_trait::async_trait]
impl ResponsesRepository for DownRepo {
    async fn insert(&self, _r: GuestResponse) -> anyhow::Result<()> {
        anyhow::bail!("connection refused")
    }
    async fn list_newest_first(&self) -> anyhow::Result<Vec<GuestResponse>> {
        anyhow::bail!("connection refused")
    }
    async fn find_by_id(&self, _id: Uuid) -> anyhow::Result<Option<GuestResponse>> {
        anyhow::bail!("connection refused")
    }
    async fn delete(&self, _id: Uuid) -> anyhow::Result<bool> {
        anyhow::bail!("connection refused")
    }
}

#[tokio::test]
async fn store_outage_surfaces_as_unavailable() {
    let service = Arc::new(Service::new(
        Arc::new(DownRepo),
        Arc::new(PdfReportRenderer::new("Report")),
        ServiceConfig::default(),
    ));
    let client = RsvpLocalClient::new(service.clone());

    let err = service.submit(guest("Maria", "Bianchi")).await.unwrap_err();
    assert!(matches!(err, DomainError::StoreUnavailable { .. }));
    assert!(err.to_string().contains("connection refused"));

    assert_eq!(
        client.list_responses(None).await.unwrap_err(),
        RsvpError::Unavailable
    );

    // A failed refresh keeps the list the view already had
    let existing = GuestResponse {
        id: Uuid::new_v4(),
        first_name: "Maria".into(),
        last_name: "Bianchi".into(),
        intolerances: String::new(),
        allergies: String::new(),
        notes: String::new(),
        submitted_at: Utc::now(),
        language: Language::It,
    };
    let mut view = AdminView::new(vec![existing]);
    assert!(view.refresh(&client).await.is_err());
    assert_eq!(view.records().len(), 1);

    view.request_delete(view.records()[0].id);
    assert_eq!(view.confirm_delete(&client).await, Err(RsvpError::Unavailable));
    assert_eq!(view.records().len(), 1);
}
