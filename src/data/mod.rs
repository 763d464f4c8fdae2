// Data module - pet records and the static dataset
//
// Flat value records for pets, care tasks, health records and training sessions.
// Everything is read-only except `Task::completed`, which the dashboard task list
// toggles through `Dataset::toggle_task`.

mod mock;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Species shown on the pet profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PetKind {
    Dog,
    Cat,
    Other,
}

impl fmt::Display for PetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dog => write!(f, "Dog"),
            Self::Cat => write!(f, "Cat"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// A pet owned by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub kind: PetKind,
    pub breed: String,
    /// Age in years
    pub age: u32,
    pub weight_kg: f32,
    /// Profile picture URL
    pub image: String,
    /// ISO date (YYYY-MM-DD)
    pub next_vet_visit: String,
}

/// Category of a daily care task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Food,
    Medication,
    Grooming,
    Walk,
}

impl TaskKind {
    /// Short glyph for the task list
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Food => "🍖",
            Self::Medication => "💊",
            Self::Grooming => "✂",
            Self::Walk => "🐾",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Display time, e.g. "08:00 AM"
    pub time: String,
    pub completed: bool,
    pub pet_id: String,
    pub kind: TaskKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub id: String,
    pub date: String,
    /// Vaccination, Checkup, Injury, ...
    pub kind: String,
    pub notes: String,
    pub vet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSession {
    /// Weekday label, e.g. "Mon"
    pub day: String,
    pub command: String,
    pub duration_min: u32,
    /// Percentage 0-100
    pub success_rate: u8,
}

/// What an appointment on the calendar is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Medical,
    Grooming,
    Training,
}

impl EventKind {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Medical => "✚",
            Self::Grooming => "✂",
            Self::Training => "🎓",
        }
    }
}

/// Upcoming appointment shown on the calendar screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: u32,
    pub title: String,
    /// Display date, e.g. "Tomorrow, 10:00 AM"
    pub when: String,
    pub kind: EventKind,
    pub pet_id: String,
}

/// The tables the screens read from
#[derive(Debug, Clone)]
pub struct Dataset {
    pets: Vec<Pet>,
    tasks: Vec<Task>,
    health: Vec<HealthRecord>,
    training: Vec<TrainingSession>,
    events: Vec<CalendarEvent>,
}

impl Dataset {
    pub fn new(
        pets: Vec<Pet>,
        tasks: Vec<Task>,
        health: Vec<HealthRecord>,
        training: Vec<TrainingSession>,
    ) -> Self {
        Self {
            pets,
            tasks,
            health,
            training,
            events: Vec::new(),
        }
    }

    pub fn with_events(mut self, events: Vec<CalendarEvent>) -> Self {
        self.events = events;
        self
    }

    /// The bundled demo data
    pub fn mock() -> Self {
        Self::new(
            mock::pets(),
            mock::tasks(),
            mock::health_records(),
            mock::training_sessions(),
        )
        .with_events(mock::calendar_events())
    }

    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    pub fn pet(&self, id: &str) -> Option<&Pet> {
        self.pets.iter().find(|p| p.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn health_records(&self) -> &[HealthRecord] {
        &self.health
    }

    pub fn training_sessions(&self) -> &[TrainingSession] {
        &self.training
    }

    pub fn calendar_events(&self) -> &[CalendarEvent] {
        &self.events
    }

    /// Tasks belonging to one pet
    pub fn tasks_for<'a>(&'a self, pet_id: &'a str) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks.iter().filter(move |t| t.pet_id == pet_id)
    }

    /// Tasks still open across all pets
    pub fn pending_task_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    /// Flip a task's completion flag. Returns the new value, or None for an unknown id.
    pub fn toggle_task(&mut self, task_id: &str) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == task_id)?;
        task.completed = !task.completed;
        tracing::debug!(task = %task.id, completed = task.completed, "Task toggled");
        Some(task.completed)
    }

    /// Average success rate for one command across all sessions
    pub fn success_rate_for(&self, command: &str) -> Option<f64> {
        let rates: Vec<f64> = self
            .training
            .iter()
            .filter(|s| s.command.eq_ignore_ascii_case(command))
            .map(|s| s.success_rate as f64)
            .collect();

        if rates.is_empty() {
            return None;
        }
        Some(rates.iter().sum::<f64>() / rates.len() as f64)
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::mock()
    }
}
