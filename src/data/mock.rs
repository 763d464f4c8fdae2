//! Demo tables bundled with the binary

use super::{
    CalendarEvent, EventKind, HealthRecord, Pet, PetKind, Task, TaskKind, TrainingSession,
};

pub(super) fn pets() -> Vec<Pet> {
    vec![
        Pet {
            id: "p1".to_string(),
            name: "Buddy".to_string(),
            kind: PetKind::Dog,
            breed: "Golden Retriever".to_string(),
            age: 3,
            weight_kg: 32.0,
            image: "https://picsum.photos/id/237/400/400".to_string(),
            next_vet_visit: "2024-06-15".to_string(),
        },
        Pet {
            id: "p2".to_string(),
            name: "Luna".to_string(),
            kind: PetKind::Cat,
            breed: "Siamese".to_string(),
            age: 2,
            weight_kg: 4.5,
            image: "https://picsum.photos/id/40/400/400".to_string(),
            next_vet_visit: "2024-08-20".to_string(),
        },
    ]
}

pub(super) fn tasks() -> Vec<Task> {
    let task = |id: &str, title: &str, time: &str, completed: bool, pet_id: &str, kind| Task {
        id: id.to_string(),
        title: title.to_string(),
        time: time.to_string(),
        completed,
        pet_id: pet_id.to_string(),
        kind,
    };

    vec![
        task("t1", "Morning Feeding", "08:00 AM", true, "p1", TaskKind::Food),
        task("t2", "Heartworm Pill", "09:00 AM", false, "p1", TaskKind::Medication),
        task("t3", "Evening Walk", "06:00 PM", false, "p1", TaskKind::Walk),
        task("t4", "Clean Litterbox", "10:00 AM", false, "p2", TaskKind::Grooming),
    ]
}

pub(super) fn health_records() -> Vec<HealthRecord> {
    let record = |id: &str, date: &str, kind: &str, notes: &str, vet: &str| HealthRecord {
        id: id.to_string(),
        date: date.to_string(),
        kind: kind.to_string(),
        notes: notes.to_string(),
        vet: vet.to_string(),
    };

    vec![
        record("h1", "2023-12-01", "Vaccination", "Rabies booster", "Dr. Smith"),
        record("h2", "2024-01-15", "Checkup", "Healthy weight", "Dr. Smith"),
        record("h3", "2024-03-10", "Injury", "Minor paw scrape", "Dr. Doe"),
    ]
}

pub(super) fn training_sessions() -> Vec<TrainingSession> {
    [
        ("Mon", "Sit", 15, 60),
        ("Tue", "Sit", 20, 75),
        ("Wed", "Stay", 10, 40),
        ("Thu", "Sit", 15, 85),
        ("Fri", "Recall", 30, 50),
        ("Sat", "Recall", 25, 65),
        ("Sun", "Sit", 10, 95),
    ]
    .into_iter()
    .map(|(day, command, duration_min, success_rate)| TrainingSession {
        day: day.to_string(),
        command: command.to_string(),
        duration_min,
        success_rate,
    })
    .collect()
}

pub(super) fn calendar_events() -> Vec<CalendarEvent> {
    [
        (1, "Vet Appointment", "Tomorrow, 10:00 AM", EventKind::Medical, "p1"),
        (2, "Grooming Session", "Sat Jun 24, 2:00 PM", EventKind::Grooming, "p2"),
        (3, "Training Class", "Sun Jun 25, 11:00 AM", EventKind::Training, "p1"),
    ]
    .into_iter()
    .map(|(id, title, when, kind, pet_id)| CalendarEvent {
        id,
        title: title.to_string(),
        when: when.to_string(),
        kind,
        pet_id: pet_id.to_string(),
    })
    .collect()
}
