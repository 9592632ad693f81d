#![cfg(target_arch = "wasm32")]

use removals_booking::{BookingRecord, BookingStore, IN_PROGRESS_KEY, KeyValueStore, ServiceType};
use removals_web::storage::LocalStorage;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn reset() {
    let _ = LocalStorage.remove_item(IN_PROGRESS_KEY);
}

#[wasm_bindgen_test]
fn booking_survives_a_round_trip_through_local_storage() {
    reset();
    let store = BookingStore::new(LocalStorage);
    store
        .save(&BookingRecord::with_service(ServiceType::Business))
        .expect("save booking");
    let raw = LocalStorage
        .get_item(IN_PROGRESS_KEY)
        .expect("read slot")
        .expect("slot written");
    assert!(raw.contains("\"serviceType\":\"business\""));
    assert_eq!(
        store.load().and_then(|r| r.service_type),
        Some(ServiceType::Business)
    );
    reset();
}

#[wasm_bindgen_test]
fn garbage_in_local_storage_loads_as_no_booking() {
    LocalStorage
        .set_item(IN_PROGRESS_KEY, "not json")
        .expect("write slot");
    assert_eq!(BookingStore::new(LocalStorage).load(), None);
    assert_eq!(LocalStorage.get_item(IN_PROGRESS_KEY).expect("read slot"), None);
}

#[wasm_bindgen_test]
fn today_comes_from_the_browser_clock() {
    let today = removals_web::dom::today();
    assert!(today.format("%Y").to_string().parse::<i32>().unwrap() >= 2024);
}
