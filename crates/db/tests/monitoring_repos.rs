use sqlx::PgPool;
use vitalwatch_core::alert::Alert;
use vitalwatch_core::record::VitalSignRecord;
use vitalwatch_core::vitals::{HeartRate, OxygenLevel, Temperature};
use vitalwatch_db::repositories::{AlertRepo, VitalSignRepo};

fn record(patient_id: i64, hr: i32) -> VitalSignRecord {
    VitalSignRecord::create(
        patient_id,
        101,
        HeartRate::new(hr).unwrap(),
        OxygenLevel::new(97).unwrap(),
        Temperature::new(36.6).unwrap(),
    )
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn insert_assigns_identity_and_round_trips(pool: PgPool) {
    let created = record(1, 78);
    let row = VitalSignRepo::insert(&pool, &created).await.unwrap();

    assert!(row.id > 0);
    assert_eq!(row.patient_id, 1);
    assert_eq!(row.device_id, 101);
    assert_eq!(row.heart_rate, 78);
    assert_eq!(row.oxygen_level, 97);
    assert_eq!(row.temperature, 36.6);

    let found = VitalSignRepo::find_by_id(&pool, row.id).await.unwrap();
    assert_eq!(found.unwrap().id, row.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn find_by_id_missing_returns_none(pool: PgPool) {
    let found = VitalSignRepo::find_by_id(&pool, 9999).await.unwrap();
    assert!(found.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn patient_history_is_newest_first(pool: PgPool) {
    for hr in [60, 70, 80] {
        VitalSignRepo::insert(&pool, &record(1, hr)).await.unwrap();
    }
    // Another patient's records must not leak in.
    VitalSignRepo::insert(&pool, &record(2, 90)).await.unwrap();

    let rows = VitalSignRepo::find_by_patient(&pool, 1).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].heart_rate, 80);
    assert!(rows.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
}

#[sqlx::test(migrations = "./migrations")]
async fn find_recent_limits_and_orders(pool: PgPool) {
    for hr in [60, 65, 70, 75, 80] {
        VitalSignRepo::insert(&pool, &record(1, hr)).await.unwrap();
    }

    let rows = VitalSignRepo::find_recent(&pool, 3).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].heart_rate, 80);
    assert!(rows.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

    // Asking for more than exists returns everything.
    let all = VitalSignRepo::find_recent(&pool, 50).await.unwrap();
    assert_eq!(all.len(), 5);
}

#[sqlx::test(migrations = "./migrations")]
async fn latest_for_patient_matches_history_head(pool: PgPool) {
    for hr in [60, 70] {
        VitalSignRepo::insert(&pool, &record(1, hr)).await.unwrap();
    }

    let latest = VitalSignRepo::find_latest_for_patient(&pool, 1)
        .await
        .unwrap()
        .expect("patient has records");
    assert_eq!(latest.heart_rate, 70);
    assert!(VitalSignRepo::find_latest_for_patient(&pool, 99)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn alert_insert_round_trips_wire_strings(pool: PgPool) {
    let alert = record(1, 140).generate_alert_if_needed().expect("abnormal");
    let row = AlertRepo::insert(&pool, &alert).await.unwrap();

    assert!(row.id > 0);
    assert_eq!(row.severity, "CRITICAL");
    assert_eq!(row.category, "HEART_RATE");
    assert!(row.message.contains("HR=140 bpm"));
    assert_eq!(row.created_at, alert.created_at);
}

#[sqlx::test(migrations = "./migrations")]
async fn severity_filter_is_case_insensitive(pool: PgPool) {
    let alert = Alert::critical(1, 101, None, "Temp=39.2 C");
    AlertRepo::insert(&pool, &alert).await.unwrap();

    let rows = AlertRepo::find_by_severity(&pool, "critical").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert!(AlertRepo::find_by_severity(&pool, "HIGH")
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn alerts_by_patient_are_newest_first(pool: PgPool) {
    let older = Alert::critical(
        1,
        101,
        Some(chrono::Utc::now() - chrono::Duration::hours(2)),
        "SpO2=85%",
    );
    let newer = Alert::critical(1, 101, None, "Temp=39.2 C");
    AlertRepo::insert(&pool, &older).await.unwrap();
    AlertRepo::insert(&pool, &newer).await.unwrap();

    let rows = AlertRepo::find_by_patient(&pool, 1).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].category, "TEMPERATURE");
    assert_eq!(rows[1].category, "OXYGENATION");
}
