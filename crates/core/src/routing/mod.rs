//! Pure routing over (resource template, HTTP method) pairs.
//!
//! The gateway hands over the matched resource template (e.g.
//! `/patients/{id}/notes`) rather than the concrete path, so routing is an
//! exact lookup in a fixed table.

use std::collections::HashMap;

use thiserror::Error;

/// `/patients`
pub const PATIENTS_RESOURCE: &str = "/patients";
/// `/patients/{id}`
pub const PATIENT_RESOURCE: &str = "/patients/{id}";
/// `/patients/{id}/notes`
pub const NOTES_RESOURCE: &str = "/patients/{id}/notes";
/// `/patients/{id}/notes/{noteId}`
pub const NOTE_RESOURCE: &str = "/patients/{id}/notes/{noteId}";

/// Path parameter carrying the patient id.
pub const PATIENT_ID_PARAM: &str = "id";
/// Path parameter carrying the note id.
pub const NOTE_ID_PARAM: &str = "noteId";

/// Every operation the handler can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    CreatePatient,
    GetPatient,
    UpdatePatient,
    DeletePatient,
    AddNote,
    ListNotes,
    GetNote,
    UpdateNote,
    DeleteNote,
}

impl Route {
    /// All routes, in table order.
    pub const ALL: [Route; 9] = [
        Route::CreatePatient,
        Route::GetPatient,
        Route::UpdatePatient,
        Route::DeletePatient,
        Route::AddNote,
        Route::ListNotes,
        Route::GetNote,
        Route::UpdateNote,
        Route::DeleteNote,
    ];

    /// The resource template this route is registered under.
    pub fn resource(&self) -> &'static str {
        match self {
            Route::CreatePatient => PATIENTS_RESOURCE,
            Route::GetPatient | Route::UpdatePatient | Route::DeletePatient => PATIENT_RESOURCE,
            Route::AddNote | Route::ListNotes => NOTES_RESOURCE,
            Route::GetNote | Route::UpdateNote | Route::DeleteNote => NOTE_RESOURCE,
        }
    }

    /// The HTTP method this route is registered under.
    pub fn method(&self) -> &'static str {
        match self {
            Route::CreatePatient | Route::AddNote => "POST",
            Route::GetPatient | Route::ListNotes | Route::GetNote => "GET",
            Route::UpdatePatient | Route::UpdateNote => "PUT",
            Route::DeletePatient | Route::DeleteNote => "DELETE",
        }
    }

    /// Short operation name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Route::CreatePatient => "create_patient",
            Route::GetPatient => "get_patient",
            Route::UpdatePatient => "update_patient",
            Route::DeletePatient => "delete_patient",
            Route::AddNote => "add_note",
            Route::ListNotes => "list_notes",
            Route::GetNote => "get_note",
            Route::UpdateNote => "update_note",
            Route::DeleteNote => "delete_note",
        }
    }
}

/// Errors produced while selecting a route.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error("Invalid request. Resource or method not found.")]
    MissingResourceOrMethod,
    #[error("Method Not Allowed")]
    MethodNotAllowed { resource: String, method: String },
}

/// Selects the route for a resource template and method.
///
/// Both must be present; a pair outside the table is `MethodNotAllowed`.
/// Matching is exact and case-sensitive.
pub fn resolve_route(resource: Option<&str>, method: Option<&str>) -> Result<Route, RoutingError> {
    let (Some(resource), Some(method)) = (resource, method) else {
        return Err(RoutingError::MissingResourceOrMethod);
    };

    Route::ALL
        .into_iter()
        .find(|route| route.resource() == resource && route.method() == method)
        .ok_or_else(|| RoutingError::MethodNotAllowed {
            resource: resource.to_string(),
            method: method.to_string(),
        })
}

/// Extracts the raw (still percent-encoded) path parameters of `path`
/// according to `template`.
///
/// Segments written as `{name}` in the template capture the matching segment
/// of the path. Returns an empty map if the segment counts differ.
pub fn extract_path_parameters(template: &str, path: &str) -> HashMap<String, String> {
    let template_segments: Vec<&str> = template.trim_matches('/').split('/').collect();
    let path_segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    if template_segments.len() != path_segments.len() {
        return HashMap::new();
    }

    template_segments
        .iter()
        .zip(path_segments.iter())
        .filter_map(|(template_segment, path_segment)| {
            template_segment
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
                .map(|name| (name.to_string(), path_segment.to_string()))
        })
        .collect()
}

/// Percent-decodes a path parameter.
///
/// Invalid UTF-8 sequences are replaced rather than rejected; `+` is left
/// as-is.
pub fn decode_path_parameter(raw: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}
