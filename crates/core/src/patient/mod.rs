mod error;
mod operations;
mod requests;
mod types;

pub use error::NoteError;
pub use operations::{find_note, generate_note_id, remove_note, update_note, NOTE_ID_PREFIX};
pub use requests::{AddNoteRequest, CreatePatientRequest, UpdateNoteRequest, UpdatePatientRequest};
pub use types::{EmergencyContact, Note, Patient, RecordType};
