// Fluxos contra um Postgres real. Rodar com:
//   DATABASE_URL=postgres://... cargo test -- --ignored
// O `#[sqlx::test]` cria um banco descartável e aplica as migrações.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use gestion_stock::{
    common::error::AppError,
    db::{asset_repo::AssetFields, supply_repo::SupplyFields},
    models::{asset::AssetStatus, auth::UserRole},
    AppState, Settings,
};

fn state(pool: PgPool) -> AppState {
    let settings = Settings {
        database_url: String::new(),
        jwt_secret: "segredo-de-teste".to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        allowed_origins: Vec::new(),
        cookie_secure: false,
        token_ttl_hours: 1,
        database_max_connections: 1,
        admin_email: None,
        admin_password: None,
    };
    AppState::from_pool(pool, settings)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("date")
}

async fn seed_supply(state: &AppState, name: &str, quantity: i32, price: Decimal) -> uuid::Uuid {
    let category = match state.category_service.list().await.expect("categories").into_iter().next() {
        Some(category) => category,
        None => state
            .category_service
            .create("Papeterie", None, None)
            .await
            .expect("category"),
    };

    state
        .supply_service
        .create(SupplyFields {
            name,
            category_id: category.id,
            quantity,
            unit_price: price,
            purchase_date: date(2024, 3, 1),
            supplier: None,
        })
        .await
        .expect("supply")
        .supply
        .id
}

#[sqlx::test]
#[ignore]
async fn assignments_cumulate_and_respect_remaining_stock(pool: PgPool) {
    let state = state(pool);
    let agency = state
        .agency_service
        .create("101", "Dakar Plateau", None, None)
        .await
        .expect("agency");
    let supply_id = seed_supply(&state, "Ramette A4", 10, Decimal::new(450, 2)).await;

    state.assignment_service.assign_supply(agency.id, supply_id, 4).await.expect("first");
    let link = state
        .assignment_service
        .assign_supply(agency.id, supply_id, 3)
        .await
        .expect("second");
    assert_eq!(link.quantity, 7);

    let supply = state.supply_service.get(supply_id).await.expect("supply");
    assert_eq!(supply.supply.remaining_quantity, 3);

    match state.assignment_service.assign_supply(agency.id, supply_id, 4).await {
        Err(AppError::InsufficientStock { available, requested }) => {
            assert_eq!((available, requested), (3, 4));
        }
        other => panic!("esperava estoque insuficiente, veio {other:?}"),
    }

    // Reduzir a atribuição devolve a diferença ao estoque
    state
        .assignment_service
        .update_supply_assignment(link.id, 5)
        .await
        .expect("update");
    let supply = state.supply_service.get(supply_id).await.expect("supply");
    assert_eq!(supply.supply.remaining_quantity, 5);
}

#[sqlx::test]
#[ignore]
async fn deleting_an_agency_returns_its_stock(pool: PgPool) {
    let state = state(pool);
    let agency = state
        .agency_service
        .create("202", "Thiès", None, None)
        .await
        .expect("agency");
    let supply_id = seed_supply(&state, "Stylo bleu", 20, Decimal::ONE).await;

    state.assignment_service.assign_supply(agency.id, supply_id, 12).await.expect("assign");
    state.assignment_service.delete_agency(agency.id).await.expect("delete");

    let supply = state.supply_service.get(supply_id).await.expect("supply");
    assert_eq!(supply.supply.remaining_quantity, 20);
    assert!(matches!(
        state.agency_service.get(agency.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[sqlx::test]
#[ignore]
async fn cmup_weights_lots_of_the_same_supply(pool: PgPool) {
    let state = state(pool);
    let first = seed_supply(&state, "Toner", 10, Decimal::new(2000, 2)).await;
    seed_supply(&state, " toner ", 30, Decimal::new(2400, 2)).await;

    let group = state.supply_service.cmup_for(first).await.expect("cmup");
    assert_eq!(group.lots, 2);
    assert_eq!(group.remaining_quantity, 40);
    // (10 × 20 + 30 × 24) / 40 = 23
    assert_eq!(group.cmup, Decimal::new(2300, 2));
}

#[sqlx::test]
#[ignore]
async fn generated_schedule_sums_to_acquisition_value(pool: PgPool) {
    let state = state(pool);
    let asset = state
        .asset_service
        .create(AssetFields {
            code: "IMM-001",
            name: "Photocopieur",
            category_id: None,
            acquisition_value: Decimal::new(100000, 2),
            acquisition_date: date(2024, 7, 1),
            useful_life_years: 3,
            quantity: 2,
            status: AssetStatus::InService,
        })
        .await
        .expect("asset");

    let schedule = state
        .depreciation_service
        .generate(asset.asset.id)
        .await
        .expect("schedule");

    assert_eq!(schedule.len(), 4);
    let last = schedule.last().expect("last line");
    assert_eq!(last.accumulated_amount, Decimal::new(100000, 2));
    assert_eq!(last.net_book_value, Decimal::ZERO);

    // A quantidade não pode cair abaixo do que foi atribuído
    let agency = state
        .agency_service
        .create("303", "Saint-Louis", None, None)
        .await
        .expect("agency");
    state
        .assignment_service
        .assign_asset(agency.id, asset.asset.id, 2, None)
        .await
        .expect("assign");

    let result = state
        .asset_service
        .update(
            asset.asset.id,
            AssetFields {
                code: "IMM-001",
                name: "Photocopieur",
                category_id: None,
                acquisition_value: Decimal::new(100000, 2),
                acquisition_date: date(2024, 7, 1),
                useful_life_years: 3,
                quantity: 1,
                status: AssetStatus::InService,
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

fn asset_fields(code: &str, quantity: i32, status: AssetStatus) -> AssetFields<'_> {
    AssetFields {
        code,
        name: "Climatiseur",
        category_id: None,
        acquisition_value: Decimal::new(120000, 2),
        acquisition_date: date(2024, 1, 1),
        useful_life_years: 3,
        quantity,
        status,
    }
}

#[sqlx::test]
#[ignore]
async fn disposed_assets_cannot_be_assigned(pool: PgPool) {
    let state = state(pool);
    let agency = state
        .agency_service
        .create("404", "Ziguinchor", None, None)
        .await
        .expect("agency");
    let asset = state
        .asset_service
        .create(asset_fields("IMM-900", 3, AssetStatus::Disposed))
        .await
        .expect("asset");

    let result = state
        .assignment_service
        .assign_asset(agency.id, asset.asset.id, 1, None)
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[sqlx::test]
#[ignore]
async fn repeated_asset_assignments_cumulate_and_refresh_the_date(pool: PgPool) {
    let state = state(pool);
    let agency = state
        .agency_service
        .create("505", "Kaolack", None, None)
        .await
        .expect("agency");
    let asset = state
        .asset_service
        .create(asset_fields("IMM-901", 5, AssetStatus::InService))
        .await
        .expect("asset");

    let first = state
        .assignment_service
        .assign_asset(agency.id, asset.asset.id, 2, Some(date(2024, 2, 1)))
        .await
        .expect("first");
    let second = state
        .assignment_service
        .assign_asset(agency.id, asset.asset.id, 2, Some(date(2024, 9, 1)))
        .await
        .expect("second");

    assert_eq!(first.id, second.id);
    assert_eq!(second.quantity, 4);
    assert_eq!(second.assigned_date, date(2024, 9, 1));

    match state
        .assignment_service
        .assign_asset(agency.id, asset.asset.id, 2, None)
        .await
    {
        Err(AppError::InsufficientStock { available, requested }) => {
            assert_eq!((available, requested), (1, 2));
        }
        other => panic!("esperava estoque insuficiente, veio {other:?}"),
    }
}

#[sqlx::test]
#[ignore]
async fn removing_a_supply_assignment_returns_the_stock(pool: PgPool) {
    let state = state(pool);
    let agency = state
        .agency_service
        .create("606", "Touba", None, None)
        .await
        .expect("agency");
    let supply_id = seed_supply(&state, "Enveloppe", 50, Decimal::new(25, 2)).await;

    let link = state
        .assignment_service
        .assign_supply(agency.id, supply_id, 30)
        .await
        .expect("assign");
    state
        .assignment_service
        .remove_supply_assignment(link.id)
        .await
        .expect("remove");

    let supply = state.supply_service.get(supply_id).await.expect("supply");
    assert_eq!(supply.supply.remaining_quantity, 50);
    assert!(matches!(
        state.assignment_service.get_supply(link.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[sqlx::test]
#[ignore]
async fn supply_update_shifts_remaining_by_the_same_delta(pool: PgPool) {
    let state = state(pool);
    let agency = state
        .agency_service
        .create("707", "Mbour", None, None)
        .await
        .expect("agency");
    let supply_id = seed_supply(&state, "Cartouche", 10, Decimal::new(3000, 2)).await;
    state
        .assignment_service
        .assign_supply(agency.id, supply_id, 6)
        .await
        .expect("assign");

    let current = state.supply_service.get(supply_id).await.expect("supply");
    let fields = |quantity| SupplyFields {
        name: "Cartouche",
        category_id: current.supply.category_id,
        quantity,
        unit_price: Decimal::new(3000, 2),
        purchase_date: date(2024, 3, 1),
        supplier: None,
    };

    // 10 -> 15: restante 4 -> 9
    let updated = state
        .supply_service
        .update(supply_id, fields(15))
        .await
        .expect("grow");
    assert_eq!(updated.supply.remaining_quantity, 9);

    // Abaixo dos 6 já distribuídos
    let result = state.supply_service.update(supply_id, fields(5)).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let unchanged = state.supply_service.get(supply_id).await.expect("supply");
    assert_eq!(unchanged.supply.quantity, 15);
    assert_eq!(unchanged.supply.remaining_quantity, 9);
}

#[sqlx::test]
#[ignore]
async fn manual_depreciation_guards_years_and_value(pool: PgPool) {
    let state = state(pool);
    let asset = state
        .asset_service
        .create(asset_fields("IMM-902", 1, AssetStatus::InService))
        .await
        .expect("asset");
    let id = asset.asset.id;
    let deps = &state.depreciation_service;

    let entry = deps
        .create_manual(id, 2025, Decimal::new(40000, 2))
        .await
        .expect("2025");
    assert_eq!(entry.accumulated_amount, Decimal::new(40000, 2));
    assert_eq!(entry.net_book_value, Decimal::new(80000, 2));

    // Ano repetido
    assert!(matches!(
        deps.create_manual(id, 2025, Decimal::ONE).await,
        Err(AppError::Conflict(_))
    ));
    // Anterior à aquisição
    assert!(matches!(
        deps.create_manual(id, 2023, Decimal::ONE).await,
        Err(AppError::BadRequest(_))
    ));
    // Já existe um ano posterior (2025)
    assert!(matches!(
        deps.create_manual(id, 2024, Decimal::ONE).await,
        Err(AppError::BadRequest(_))
    ));
    // 400 + 900 > 1200
    assert!(matches!(
        deps.create_manual(id, 2026, Decimal::new(90000, 2)).await,
        Err(AppError::BadRequest(_))
    ));

    let next = deps
        .create_manual(id, 2026, Decimal::new(80000, 2))
        .await
        .expect("2026");
    assert_eq!(next.accumulated_amount, Decimal::new(120000, 2));
    assert_eq!(next.net_book_value, Decimal::ZERO);
}

#[sqlx::test]
#[ignore]
async fn category_hierarchy_rejects_cycles_and_guarded_deletes(pool: PgPool) {
    let state = state(pool);
    let categories = &state.category_service;

    let root = categories.create("Informatique", None, None).await.expect("root");
    let child = categories
        .create("Périphériques", None, Some(root.id))
        .await
        .expect("child");

    // A raiz não pode virar filha da própria filha
    let result = categories
        .update(root.id, "Informatique", None, Some(child.id))
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    // Ainda tem subcategoria
    assert!(matches!(categories.delete(root.id).await, Err(AppError::Conflict(_))));

    // Ainda tem fornitura
    state
        .supply_service
        .create(SupplyFields {
            name: "Souris",
            category_id: child.id,
            quantity: 3,
            unit_price: Decimal::new(900, 2),
            purchase_date: date(2024, 3, 1),
            supplier: None,
        })
        .await
        .expect("supply");
    assert!(matches!(categories.delete(child.id).await, Err(AppError::Conflict(_))));
}

#[sqlx::test]
#[ignore]
async fn user_can_only_be_linked_to_one_agency(pool: PgPool) {
    let state = state(pool);
    let user = state
        .user_service
        .create("Fatou", "Sow", "fatou@agence.local", "segredo123", UserRole::User)
        .await
        .expect("user");
    let dakar = state
        .agency_service
        .create("808", "Dakar", None, None)
        .await
        .expect("agency");
    let thies = state
        .agency_service
        .create("809", "Thiès", None, None)
        .await
        .expect("agency");

    let link = state
        .assignment_service
        .link_user_to_agency(user.id, dakar.id)
        .await
        .expect("link");
    assert!(matches!(
        state.assignment_service.link_user_to_agency(user.id, thies.id).await,
        Err(AppError::Conflict(_))
    ));

    let moved = state
        .assignment_service
        .move_user_to_agency(link.id, thies.id)
        .await
        .expect("move");
    assert_eq!(moved.agency_id, thies.id);
}

#[sqlx::test]
#[ignore]
async fn emails_and_category_names_are_unique_ignoring_case(pool: PgPool) {
    let state = state(pool);
    state
        .user_service
        .create("Awa", "Diallo", "Awa@Agence.local", "segredo123", UserRole::User)
        .await
        .expect("user");

    let duplicate = state
        .user_service
        .create("Awa", "Diallo", "awa@agence.local", "segredo123", UserRole::User)
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    state
        .category_service
        .create("Papier", None, None)
        .await
        .expect("category");
    assert!(matches!(
        state.category_service.create("papier", None, None).await,
        Err(AppError::Conflict(_))
    ));
}
