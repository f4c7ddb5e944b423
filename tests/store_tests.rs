use appointment_desk::{
    Appointment, AppointmentStore, LoadFailurePolicy, MemoryBackend, StoreError,
};

const PEREZ: &str = "Dr. Pérez - Cardiología";
const GOMEZ: &str = "Dra. Gómez - Pediatría";

fn sample() -> Vec<Appointment> {
    vec![
        Appointment::new("Ana", PEREZ, "2024-03-01", "09:00"),
        Appointment::new("Luis", GOMEZ, "2024-03-02", "10:15"),
        Appointment::new("Marta", PEREZ, "2024-03-03", "11:30"),
    ]
}

fn loaded_store(appointments: Vec<Appointment>) -> AppointmentStore<MemoryBackend> {
    let mut store = AppointmentStore::with_backend(MemoryBackend::with_appointments(appointments));
    store.load().unwrap();
    store
}

#[test]
fn front_desk_scenario_schedule_edit_cancel() {
    let mut store = AppointmentStore::with_backend(MemoryBackend::new());
    assert_eq!(store.load().unwrap(), 0);
    assert!(store.is_loaded());

    store.schedule("Ana", PEREZ, "2024-03-01", "09:00").unwrap();
    assert_eq!(
        store.appointments(),
        &[Appointment::new("Ana", PEREZ, "2024-03-01", "09:00")]
    );

    store.edit(0, "", "", "", "09:30").unwrap();
    assert_eq!(
        store.get(0),
        Some(&Appointment::new("Ana", PEREZ, "2024-03-01", "09:30"))
    );

    store.cancel(0).unwrap();
    assert!(store.is_empty());
    assert_eq!(store.backend().stored(), Some(Vec::new()));
}

#[test]
fn schedule_appends_one_entry_and_saves() {
    let mut store = loaded_store(sample());
    let before = store.appointments().to_vec();

    let report = store.schedule("Pablo", GOMEZ, "2024-04-10", "08:45").unwrap();

    let expected = Appointment::new("Pablo", GOMEZ, "2024-04-10", "08:45");
    assert_eq!(report.index, 3);
    assert_eq!(report.appointment, expected);
    assert!(report.is_persisted());
    assert_eq!(store.len(), before.len() + 1);
    assert_eq!(&store.appointments()[..3], before.as_slice());
    assert_eq!(store.appointments().last(), Some(&expected));
    assert_eq!(store.backend().stored().unwrap(), store.appointments());
    assert_eq!(store.backend().save_count(), 1);
}

#[test]
fn schedule_accepts_duplicates() {
    let mut store = loaded_store(Vec::new());
    store.schedule("Ana", PEREZ, "2024-03-01", "09:00").unwrap();
    store.schedule("Ana", PEREZ, "2024-03-01", "09:00").unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(0), store.get(1));
}

#[test]
fn schedule_trims_surrounding_whitespace() {
    let mut store = loaded_store(Vec::new());
    let report = store.schedule("  Ana ", PEREZ, "2024-03-01", " 09:00\t").unwrap();
    assert_eq!(report.appointment.patient, "Ana");
    assert_eq!(report.appointment.time, "09:00");
}

#[test]
fn schedule_rejects_blank_patient_or_time() {
    let mut store = loaded_store(sample());
    let before = store.appointments().to_vec();

    for (patient, time) in [("", "09:00"), ("   ", "09:00"), ("Ana", ""), ("Ana", " \t "), ("", "")] {
        let err = store.schedule(patient, PEREZ, "2024-03-01", time).unwrap_err();
        assert!(
            matches!(err, StoreError::Validation(_)),
            "expected validation error for ({patient:?}, {time:?}), got {err:?}"
        );
    }

    assert_eq!(store.appointments(), before.as_slice());
    assert_eq!(store.backend().save_count(), 0);
}

#[test]
fn validation_error_names_blank_fields() {
    let mut store = loaded_store(Vec::new());
    match store.schedule(" ", PEREZ, "2024-03-01", "") {
        Err(StoreError::Validation(err)) => {
            assert_eq!(err.missing_fields(), &["patient", "time"]);
            assert_eq!(err.to_string(), "required field(s) blank: patient, time");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn edit_keeps_blank_fields_and_overwrites_the_rest() {
    let mut store = loaded_store(sample());

    store.edit(1, "Luisa", "", "2024-05-05", " ").unwrap();

    assert_eq!(store.len(), 3);
    assert_eq!(
        store.get(1),
        Some(&Appointment::new("Luisa", GOMEZ, "2024-05-05", "10:15"))
    );
    assert_eq!(store.get(0), Some(&sample()[0]));
    assert_eq!(store.get(2), Some(&sample()[2]));
}

#[test]
fn edit_with_all_fields_blank_leaves_record_unchanged() {
    let mut store = loaded_store(sample());
    let report = store.edit(2, "", " ", "", "").unwrap();
    assert_eq!(report.appointment, sample()[2]);
    assert_eq!(store.appointments(), sample().as_slice());
    assert_eq!(store.backend().save_count(), 1);
}

#[test]
fn edit_overwrites_every_non_blank_field() {
    let mut store = loaded_store(sample());
    store.edit(0, "Eva", GOMEZ, "2025-01-02", "16:00").unwrap();
    assert_eq!(
        store.get(0),
        Some(&Appointment::new("Eva", GOMEZ, "2025-01-02", "16:00"))
    );
}

#[test]
fn cancel_removes_entry_and_shifts_later_ones() {
    let mut store = loaded_store(sample());

    let report = store.cancel(1).unwrap();

    assert_eq!(report.appointment, sample()[1]);
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(0), Some(&sample()[0]));
    assert_eq!(store.get(1), Some(&sample()[2]));
    assert_eq!(store.backend().stored().unwrap(), store.appointments());
}

#[test]
fn out_of_range_index_is_rejected_without_mutation() {
    for len in 0..=3 {
        let initial: Vec<Appointment> = sample().into_iter().take(len).collect();
        let mut store = loaded_store(initial.clone());

        for index in [len, len + 1, usize::MAX] {
            let err = store.edit(index, "X", "", "", "").unwrap_err();
            assert!(matches!(err, StoreError::IndexOutOfRange { index: i, len: l } if i == index && l == len));

            let err = store.cancel(index).unwrap_err();
            assert!(matches!(err, StoreError::IndexOutOfRange { .. }));
        }

        assert_eq!(store.appointments(), initial.as_slice());
        assert_eq!(store.backend().save_count(), 0);
    }
}

#[test]
fn save_failure_keeps_in_memory_mutation() {
    let mut store = loaded_store(sample());
    store.backend().set_fail_save(true);

    let report = store.schedule("Pablo", GOMEZ, "2024-04-10", "08:45").unwrap();

    assert!(!report.is_persisted());
    assert_eq!(store.len(), 4);
    assert_eq!(store.backend().stored().unwrap(), sample());

    let report = store.cancel(0).unwrap();
    assert!(report.save_error.is_some());
    assert_eq!(store.len(), 3);
    assert!(store.save().is_err());
}

#[test]
fn load_failure_resets_to_empty_by_default() {
    let mut store = loaded_store(sample());
    assert_eq!(store.load_failure_policy(), LoadFailurePolicy::ResetToEmpty);

    store.backend().set_fail_load(true);
    assert!(store.load().is_err());
    assert!(store.is_empty());
}

#[test]
fn load_failure_can_keep_current_list() {
    let backend = MemoryBackend::with_appointments(sample());
    let mut store = AppointmentStore::with_backend(backend)
        .with_load_failure_policy(LoadFailurePolicy::KeepCurrent);
    store.load().unwrap();

    store.backend().set_fail_load(true);
    assert!(store.load().is_err());
    assert_eq!(store.appointments(), sample().as_slice());
}

#[test]
fn load_with_nothing_stored_starts_empty() {
    let mut store = loaded_store(sample());
    let mut fresh = AppointmentStore::with_backend(MemoryBackend::new());
    assert_eq!(fresh.load().unwrap(), 0);
    assert!(fresh.is_empty());

    // reload replaces whatever is in memory
    store.schedule("Pablo", GOMEZ, "2024-04-10", "08:45").unwrap();
    assert_eq!(store.load().unwrap(), 4);
}

#[test]
fn first_mutation_reads_backing_before_saving() {
    let mut store = AppointmentStore::with_backend(MemoryBackend::with_appointments(sample()));
    assert!(!store.is_loaded());

    let report = store.schedule("Pablo", GOMEZ, "2024-04-10", "08:45").unwrap();

    assert!(store.is_loaded());
    assert_eq!(report.index, 3);
    let stored = store.backend().stored().unwrap();
    assert_eq!(stored.len(), 4);
    assert_eq!(&stored[..3], sample().as_slice());
}

#[test]
fn failed_implicit_load_aborts_mutation_without_saving() {
    let mut store = AppointmentStore::with_backend(MemoryBackend::with_appointments(sample()));
    store.backend().set_fail_load(true);

    let err = store.edit(0, "Ana María", "", "", "").unwrap_err();

    assert!(matches!(err, StoreError::Persistence(_)), "{err:?}");
    assert_eq!(store.backend().save_count(), 0);
    assert_eq!(store.backend().stored().unwrap(), sample());
}
