//! Tests de integración del repositorio
//!
//! Ejercitan los caminos transaccionales (crear, reemplazar deducciones,
//! duplicar, borrado lógico) contra un PostgreSQL real apuntado por
//! DATABASE_URL. Van marcados con #[ignore] para que la suite por defecto
//! no exija una base disponible:
//!
//!     DATABASE_URL=postgres://... cargo test --test repository_tests -- --ignored

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;

use appraisal_api::config::database::DatabaseConfig;
use appraisal_api::models::appraisal::{NewAppraisal, NewDeduction};
use appraisal_api::repositories::appraisal_repository::AppraisalRepository;

async fn test_repository() -> AppraisalRepository {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL debe apuntar a la base de tests");

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("conexión a la base de tests");

    DatabaseConfig::run_migrations(&pool)
        .await
        .expect("migraciones de la base de tests");

    AppraisalRepository::new(pool)
}

// Placa única por corrida para que los tests no se pisen entre sí
// (cabe en VARCHAR(20): prefijo de 3 + guión + 16 dígitos de micros)
fn unique_plate(prefix: &str) -> String {
    let micros = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_micros();
    format!("{}-{}", prefix, micros)
}

fn sample_record(plate: &str) -> NewAppraisal {
    NewAppraisal {
        appraisal_date: NaiveDate::from_ymd_opt(2024, 6, 15),
        vehicle_description: Some("Toyota Corolla 2015".to_string()),
        brand: Some("Toyota".to_string()),
        model_year: Some(2015),
        color: Some("Gris".to_string()),
        mileage: 120000,
        fuel_type: Some("Gasolina".to_string()),
        engine_size: Decimal::new(18, 1),
        plate_number: Some(plate.to_string()),
        applicant: Some("Banco Nacional".to_string()),
        owner: Some("Juan Pérez".to_string()),
        vin: Some("1HGCM82633A004352".to_string()),
        engine_number: Some("4G63-12345".to_string()),
        notes: None,
        appraisal_value_usd: Decimal::from(8500),
        appraisal_value_local: Decimal::from(4250000),
        appraisal_value_lower_cost: None,
        appraisal_value_bank: None,
        appraisal_value_lower_bank: None,
        validity_days: 30,
        validity_kms: 1000,
    }
}

fn sample_deductions() -> Vec<NewDeduction> {
    vec![
        NewDeduction {
            description: Some("Pintura rayada".to_string()),
            amount: Decimal::from(7500),
        },
        NewDeduction {
            description: Some("Llantas gastadas".to_string()),
            amount: Decimal::from(12500),
        },
    ]
}

#[tokio::test]
#[ignore]
async fn test_update_replaces_deduction_set() {
    let repo = test_repository().await;
    let plate = unique_plate("UPD");

    let (created, stored) = repo
        .create(&sample_record(&plate), &sample_deductions())
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);

    // El set anterior desaparece completo, solo quedan las filas nuevas
    let replacement = vec![NewDeduction {
        description: Some("Parabrisas quebrado".to_string()),
        amount: Decimal::from(3000),
    }];
    let (_, stored) = repo
        .update(created.id, &sample_record(&plate), &replacement)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].description.as_deref(), Some("Parabrisas quebrado"));
    assert_eq!(stored[0].amount, Some(Decimal::from(3000)));
}

#[tokio::test]
#[ignore]
async fn test_update_with_empty_list_removes_all_deductions() {
    let repo = test_repository().await;
    let plate = unique_plate("VAC");

    let (created, stored) = repo
        .create(&sample_record(&plate), &sample_deductions())
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);

    let (_, stored) = repo
        .update(created.id, &sample_record(&plate), &[])
        .await
        .unwrap()
        .unwrap();

    assert!(stored.is_empty());
    assert!(repo.deductions_for(created.id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_duplicate_clones_fields_with_new_id_and_today() {
    let repo = test_repository().await;
    let plate = unique_plate("DUP");

    let (original, original_deductions) = repo
        .create(&sample_record(&plate), &sample_deductions())
        .await
        .unwrap();

    let today = Utc::now().date_naive();
    let (clone, clone_deductions) = repo
        .duplicate(original.id, today)
        .await
        .unwrap()
        .unwrap();

    // Id propio y fecha de hoy; el resto de campos idéntico al original
    assert_ne!(clone.id, original.id);
    assert_eq!(clone.appraisal_date, Some(today));
    assert_eq!(clone.plate_number, original.plate_number);
    assert_eq!(clone.vehicle_description, original.vehicle_description);
    assert_eq!(clone.model_year, original.model_year);
    assert_eq!(clone.appraisal_value_usd, original.appraisal_value_usd);
    assert_eq!(clone.appraisal_value_local, original.appraisal_value_local);
    assert_eq!(clone.validity_days, original.validity_days);
    assert_eq!(clone.validity_kms, original.validity_kms);

    // Las deducciones del clon son filas nuevas con los mismos pares
    // (descripción, monto), colgadas del clon
    assert_eq!(clone_deductions.len(), original_deductions.len());
    for (copy, source) in clone_deductions.iter().zip(&original_deductions) {
        assert_ne!(copy.id, source.id);
        assert_eq!(copy.vehicle_appraisal_id, clone.id);
        assert_eq!(copy.description, source.description);
        assert_eq!(copy.amount, source.amount);
    }

    // El original conserva su fecha y sus filas
    let kept = repo.deductions_for(original.id).await.unwrap();
    assert_eq!(kept.len(), original_deductions.len());
}

#[tokio::test]
#[ignore]
async fn test_soft_delete_hides_record_from_default_reads() {
    let repo = test_repository().await;
    let plate = unique_plate("DEL");

    let (created, _) = repo.create(&sample_record(&plate), &[]).await.unwrap();

    assert_eq!(repo.count_search(&plate).await.unwrap(), 1);

    assert!(repo.soft_delete(created.id).await.unwrap());

    // Fuera de get, búsqueda y conteo por defecto
    assert!(repo.find_by_id(created.id).await.unwrap().is_none());
    assert_eq!(repo.count_search(&plate).await.unwrap(), 0);
    assert!(repo.search_page(&plate, 10, 0).await.unwrap().is_empty());

    // El camino explícito que incluye borrados sí lo encuentra
    let fetched = repo
        .find_by_id_including_deleted(created.id)
        .await
        .unwrap()
        .unwrap();
    assert!(fetched.is_deleted);

    // Un borrado repetido ya no afecta filas
    assert!(!repo.soft_delete(created.id).await.unwrap());

    // Actualizar un registro borrado tampoco lo revive
    assert!(repo
        .update(created.id, &sample_record(&plate), &[])
        .await
        .unwrap()
        .is_none());
}
