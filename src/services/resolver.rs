use thiserror::Error;
use uuid::Uuid;

use crate::api::{SubsectionChanges, SubsectionCreateRequest};
use crate::database::models::{Audit, Location, Subsection, SubsectionKind, SubsectionType};

#[derive(Error, Debug, PartialEq)]
pub enum ResolveError {
    #[error("Title must not be blank")]
    BlankTitle,

    #[error("Subsection {id} is of type {stored}; a {requested} update cannot be applied")]
    TypeMismatch {
        id: Uuid,
        stored: SubsectionType,
        requested: SubsectionType,
    },

    #[error("Invalid coordinates in {field}: latitude must be within [-90, 90] and longitude within [-180, 180]")]
    InvalidLocation { field: String },
}

pub fn validate_title(title: &str) -> Result<(), ResolveError> {
    if title.trim().is_empty() {
        return Err(ResolveError::BlankTitle);
    }
    Ok(())
}

fn validate_location(location: &Location, field: impl Into<String>) -> Result<(), ResolveError> {
    if location.is_valid() {
        Ok(())
    } else {
        Err(ResolveError::InvalidLocation { field: field.into() })
    }
}

fn validate_waypoints(waypoints: &[Location]) -> Result<(), ResolveError> {
    for (index, waypoint) in waypoints.iter().enumerate() {
        validate_location(waypoint, format!("waypoints[{}]", index))?;
    }
    Ok(())
}

fn validate_kind(kind: &SubsectionKind) -> Result<(), ResolveError> {
    match kind {
        SubsectionKind::Activity { location, .. } | SubsectionKind::Sightseeing { location } => {
            validate_location(location, "location")
        }
        SubsectionKind::Route { waypoints } => validate_waypoints(waypoints),
    }
}

/// Maps subsection payloads onto concrete subsection variants.
pub struct SubsectionResolver;

impl SubsectionResolver {
    /// Build a new, not yet attached subsection from a create request.
    pub fn create(request: SubsectionCreateRequest, creator: Uuid) -> Result<Subsection, ResolveError> {
        validate_title(&request.title)?;
        validate_kind(&request.kind)?;

        Ok(Subsection {
            id: Uuid::new_v4(),
            title: request.title,
            journal_id: None,
            audit: Audit::new(creator),
            kind: request.kind,
        })
    }

    /// Merge the variant-specific part of an update into `subsection`.
    ///
    /// Nothing is mutated when an error is returned.
    pub fn apply_update(subsection: &mut Subsection, changes: SubsectionChanges) -> Result<(), ResolveError> {
        let id = subsection.id;

        match (&mut subsection.kind, changes) {
            (
                SubsectionKind::Activity { activity_type, location },
                SubsectionChanges::Activity {
                    activity_type: new_activity_type,
                    location: new_location,
                },
            ) => {
                if let Some(new_location) = &new_location {
                    validate_location(new_location, "location")?;
                }
                *activity_type = new_activity_type;
                if let Some(new_location) = new_location {
                    *location = new_location;
                }
            }
            (
                SubsectionKind::Sightseeing { location },
                SubsectionChanges::Sightseeing { location: new_location },
            ) => {
                if let Some(new_location) = new_location {
                    validate_location(&new_location, "location")?;
                    *location = new_location;
                }
            }
            (SubsectionKind::Route { waypoints }, SubsectionChanges::Route { waypoints: new_waypoints }) => {
                match new_waypoints {
                    Some(new_waypoints) if !new_waypoints.is_empty() => {
                        if let Err(e) = validate_waypoints(&new_waypoints) {
                            tracing::warn!("Rejected waypoint update for route subsection {}: {}", id, e);
                            return Err(e);
                        }
                        *waypoints = new_waypoints;
                    }
                    _ => {}
                }
            }
            (kind, changes) => {
                return Err(ResolveError::TypeMismatch {
                    id,
                    stored: kind.subsection_type(),
                    requested: changes.subsection_type(),
                });
            }
        }

        Ok(())
    }
}
