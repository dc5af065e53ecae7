use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::requests::UpdateNoteRequest;
use super::types::Note;

/// Prefix of generated note ids.
pub const NOTE_ID_PREFIX: &str = "Note#";

/// Generates a fresh note id of the form `Note#<random-uuid>`.
///
/// The id is random (UUID v4) and carries no information about the note's
/// position in the sequence.
pub fn generate_note_id() -> String {
    format!("{NOTE_ID_PREFIX}{}", Uuid::new_v4())
}

/// Finds a note by id with a linear scan. The first match wins.
pub fn find_note<'a>(notes: &'a [Note], note_id: &str) -> Option<&'a Note> {
    notes.iter().find(|note| note.id == note_id)
}

/// Applies `changes` to the note with the given id and stamps `updated_at`.
///
/// Returns the updated note, or None if no note matches.
pub fn update_note<'a>(
    notes: &'a mut [Note],
    note_id: &str,
    changes: &UpdateNoteRequest,
    now: DateTime<Utc>,
) -> Option<&'a Note> {
    let note = notes.iter_mut().find(|note| note.id == note_id)?;
    changes.apply_to(note);
    note.updated_at = now;
    Some(&*note)
}

/// Returns a copy of `notes` without the note(s) whose id matches.
///
/// An id that matches nothing yields an unchanged copy.
pub fn remove_note(notes: &[Note], note_id: &str) -> Vec<Note> {
    notes
        .iter()
        .filter(|note| note.id != note_id)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::{AddNoteRequest, RecordType};

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn note(id: &str, author: &str) -> Note {
        AddNoteRequest::new(author, format!("content of {id}"))
            .with_id(id)
            .into_note("p1", at("2024-01-01T00:00:00Z"))
            .unwrap()
    }

    #[test]
    fn test_generated_ids_are_prefixed_and_distinct() {
        let first = generate_note_id();
        let second = generate_note_id();

        assert!(first.starts_with(NOTE_ID_PREFIX));
        assert!(Uuid::parse_str(&first[NOTE_ID_PREFIX.len()..]).is_ok());
        assert_ne!(first, second);
    }

    #[test]
    fn test_find_note_by_id() {
        let notes = vec![note("n1", "Dr.A"), note("n2", "Dr.B")];

        assert_eq!(find_note(&notes, "n1").unwrap().author, "Dr.A");
        assert_eq!(find_note(&notes, "n2").unwrap().author, "Dr.B");
        assert!(find_note(&notes, "n3").is_none());
    }

    #[test]
    fn test_update_note_stamps_updated_at() {
        let mut notes = vec![note("n1", "Dr.A"), note("n2", "Dr.B")];
        let later = at("2024-02-01T00:00:00Z");
        let changes = UpdateNoteRequest::default().with_author("Dr.C");

        let updated = update_note(&mut notes, "n2", &changes, later).unwrap();

        assert_eq!(updated.author, "Dr.C");
        assert_eq!(updated.updated_at, later);
        assert_eq!(updated.created_at, at("2024-01-01T00:00:00Z"));
        assert_eq!(updated.record_type, RecordType::Note);
        assert_eq!(notes[0].author, "Dr.A");
    }

    #[test]
    fn test_update_missing_note_leaves_list_untouched() {
        let mut notes = vec![note("n1", "Dr.A")];
        let before = notes.clone();
        let changes = UpdateNoteRequest::default().with_author("Dr.C");

        assert!(update_note(&mut notes, "nope", &changes, at("2024-02-01T00:00:00Z")).is_none());
        assert_eq!(notes, before);
    }

    #[test]
    fn test_remove_note_filters_by_id() {
        let notes = vec![note("n1", "Dr.A"), note("n2", "Dr.B"), note("n3", "Dr.C")];

        let remaining = remove_note(&notes, "n2");

        let ids: Vec<&str> = remaining.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n1", "n3"]);
    }

    #[test]
    fn test_remove_unknown_note_is_noop() {
        let notes = vec![note("n1", "Dr.A")];

        assert_eq!(remove_note(&notes, "missing"), notes);
    }
}
