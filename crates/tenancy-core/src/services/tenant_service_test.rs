use std::sync::Arc;

use tenancy_shared::types::{Outcome, SortType};

use crate::dto::{
    CreateTenantRequest, DeleteTenantRequest, EditTenantRequest, GetTenantByIdRequest,
    GetTenantBySlugRequest, GetTenantListRequest,
};
use crate::error::ViolationCode;
use crate::repositories::{MockUserCensus, TenantFilter, TenantSort};
use crate::services::testing::{lazy_sessions, FakeTenantRepo};
use crate::services::TenantService;

fn service_with(
    repo: FakeTenantRepo,
    census: MockUserCensus,
) -> (TenantService<FakeTenantRepo>, Arc<FakeTenantRepo>) {
    let repo = Arc::new(repo);
    let service = TenantService::new(repo.clone(), lazy_sessions(), Arc::new(census));
    (service, repo)
}

#[tokio::test]
async fn create_with_unique_slug_persists_and_returns_server_fields() {
    let (service, repo) = service_with(FakeTenantRepo::default(), MockUserCensus::new());

    let outcome = service
        .create(CreateTenantRequest { name: "Acme Corp".into(), slug: "acme".into() })
        .await
        .unwrap();

    let created = outcome.ok().expect("create should succeed");
    let tenants = repo.tenants.lock().unwrap();
    assert_eq!(tenants.len(), 1);
    assert_eq!(tenants[0].id, created.id);
    assert_eq!(tenants[0].created_at, created.created_at);
}

#[tokio::test]
async fn create_with_duplicate_slug_is_rejected_without_a_write() {
    let seeded = FakeTenantRepo::seed("Acme Corp", "acme");
    let (service, repo) = service_with(
        FakeTenantRepo::with(vec![seeded]),
        MockUserCensus::new(),
    );

    let outcome = service
        .create(CreateTenantRequest { name: "Other".into(), slug: "acme".into() })
        .await
        .unwrap();

    assert_eq!(
        outcome.rejection(),
        Some(&ViolationCode::TenantSlugAlreadyExists)
    );
    assert_eq!(repo.tenants.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn edit_patches_only_supplied_fields() {
    let seeded = FakeTenantRepo::seed("Acme Corp", "acme");
    let id = seeded.id;
    let (service, repo) = service_with(
        FakeTenantRepo::with(vec![seeded]),
        MockUserCensus::new(),
    );

    let outcome = service
        .edit(EditTenantRequest { id, name: Some("Acme Inc".into()), slug: None })
        .await
        .unwrap();

    assert!(outcome.has_data());
    let tenants = repo.tenants.lock().unwrap();
    assert_eq!(tenants[0].name, "Acme Inc");
    assert_eq!(tenants[0].slug, "acme");
    assert!(tenants[0].updated_at.is_some());
}

#[tokio::test]
async fn edit_of_missing_tenant_reports_not_found() {
    let (service, _repo) = service_with(FakeTenantRepo::default(), MockUserCensus::new());

    let outcome = service
        .edit(EditTenantRequest {
            id: tenancy_shared::types::new_id(),
            name: Some("Ghost".into()),
            slug: None,
        })
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::NotFound);
}

#[tokio::test]
async fn non_cascading_delete_is_rejected_while_users_remain() {
    let seeded = FakeTenantRepo::seed("Acme Corp", "acme");
    let id = seeded.id;
    let mut census = MockUserCensus::new();
    census.expect_count_by_tenant().returning(|_| Ok(3));
    let (service, repo) = service_with(FakeTenantRepo::with(vec![seeded]), census);

    let outcome = service
        .hard_delete_single(DeleteTenantRequest::single(id))
        .await
        .unwrap();

    assert_eq!(
        outcome.rejection(),
        Some(&ViolationCode::TenantIsAssociatedByUsers)
    );
    assert_eq!(repo.tenants.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn cascading_delete_skips_the_association_guard() {
    let seeded = FakeTenantRepo::seed("Acme Corp", "acme");
    let id = seeded.id;
    // No expectation set: the census must not be consulted at all.
    let (service, repo) = service_with(FakeTenantRepo::with(vec![seeded]), MockUserCensus::new());

    let outcome = service
        .hard_delete_single(DeleteTenantRequest {
            ids: vec![id],
            is_atomic: None,
            is_cascading: Some(true),
        })
        .await
        .unwrap();

    let deleted = outcome.ok().expect("delete should succeed");
    assert_eq!(deleted.affected, 1);
    assert!(repo.tenants.lock().unwrap().is_empty());
}

#[tokio::test]
async fn non_cascading_delete_succeeds_for_a_tenant_without_users() {
    let seeded = FakeTenantRepo::seed("Acme Corp", "acme");
    let id = seeded.id;
    let mut census = MockUserCensus::new();
    census.expect_count_by_tenant().returning(|_| Ok(0));
    let (service, _repo) = service_with(FakeTenantRepo::with(vec![seeded]), census);

    let outcome = service
        .hard_delete_single(DeleteTenantRequest::single(id))
        .await
        .unwrap();

    assert!(outcome.has_data());
}

#[tokio::test]
async fn delete_of_missing_tenant_reports_not_found() {
    let mut census = MockUserCensus::new();
    census.expect_count_by_tenant().returning(|_| Ok(0));
    let (service, _repo) = service_with(FakeTenantRepo::default(), census);

    let outcome = service
        .hard_delete_single(DeleteTenantRequest::single(tenancy_shared::types::new_id()))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::NotFound);
}

#[tokio::test]
async fn get_by_id_and_slug_return_details() {
    let seeded = FakeTenantRepo::seed("Acme Corp", "acme");
    let id = seeded.id;
    let (service, _repo) = service_with(
        FakeTenantRepo::with(vec![seeded]),
        MockUserCensus::new(),
    );

    let by_id = service.get_by_id(GetTenantByIdRequest { id }).await.unwrap();
    assert_eq!(by_id.as_ref().map(|t| t.slug.as_str()), Some("acme"));

    let by_slug = service
        .get_by_slug(GetTenantBySlugRequest { slug: "acme".into() })
        .await
        .unwrap();
    assert_eq!(by_slug.map(|t| t.id), Some(id));

    let missing = service
        .get_by_slug(GetTenantBySlugRequest { slug: "nope".into() })
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn exists_checks_by_slug() {
    let (service, _repo) = service_with(
        FakeTenantRepo::with(vec![FakeTenantRepo::seed("Acme Corp", "acme")]),
        MockUserCensus::new(),
    );

    assert!(service.exists(TenantFilter::by_slug("acme")).await.unwrap());
    assert!(!service.exists(TenantFilter::by_slug("nope")).await.unwrap());
}

#[tokio::test]
async fn list_pages_are_disjoint_and_total_consistent() {
    let tenants: Vec<_> = (0..5)
        .map(|i| FakeTenantRepo::seed(&format!("Tenant {i}"), &format!("t{i}")))
        .collect();
    let (service, _repo) = service_with(FakeTenantRepo::with(tenants), MockUserCensus::new());

    let page = |index| GetTenantListRequest {
        page_index: index,
        page_size: 2,
        sort_by: TenantSort::Slug,
        sort_type: SortType::Asc,
    };

    let first = service.get_list(page(1)).await.unwrap();
    let second = service.get_list(page(2)).await.unwrap();
    let third = service.get_list(page(3)).await.unwrap();

    assert_eq!(first.total, 5);
    assert_eq!(second.total, 5);
    assert_eq!(first.items.len(), 2);
    assert_eq!(second.items.len(), 2);
    assert_eq!(third.items.len(), 1);

    let mut seen: Vec<_> = first
        .items
        .iter()
        .chain(second.items.iter())
        .chain(third.items.iter())
        .map(|t| t.slug.clone())
        .collect();
    seen.dedup();
    assert_eq!(seen, vec!["t0", "t1", "t2", "t3", "t4"]);
}
