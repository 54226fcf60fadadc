//! Wholesale rebuild of the marker groups from a fresh data set.
//!
//! No marker is reused across rebuilds. Every pass allocates new drawable ids,
//! so a stale marker can never be mistaken for its replacement.

use foundation::geo::CoordError;
use foundation::ids::IdAllocator;
use incidents::{FireDepartmentRecord, IncidentRecord, RecordId, RecordKind, SpatialRecord};
use map::drawable::{Drawable, DrawableId};
use map::layer::{HeatSample, LayerId};
use tracing::warn;

use crate::group::{Category, DrawableGroup, Marker};
use crate::heat::{DEFAULT_HEAT_RADIUS_PX, HeatGroup, severity_weight};
use crate::symbology::{department_style, incident_style, incident_title};

/// A record left off the map because its coordinates are unusable.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub kind: RecordKind,
    pub id: RecordId,
    pub error: CoordError,
}

/// Freshly built, not yet attached, representation of one data set.
#[derive(Debug, Clone, PartialEq)]
pub struct Rebuild {
    pub incidents: DrawableGroup,
    pub fire_departments: DrawableGroup,
    pub heat: HeatGroup,
    pub skipped: Vec<SkippedRecord>,
}

#[derive(Debug, Clone)]
pub struct GroupBuilder {
    drawable_ids: IdAllocator,
    layer_ids: IdAllocator,
    heat_radius_px: u32,
}

impl Default for GroupBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_HEAT_RADIUS_PX)
    }
}

impl GroupBuilder {
    pub fn new(heat_radius_px: u32) -> Self {
        Self {
            drawable_ids: IdAllocator::starting_at(1),
            layer_ids: IdAllocator::starting_at(1),
            heat_radius_px,
        }
    }

    pub fn build(
        &mut self,
        incidents: &[IncidentRecord],
        fire_departments: &[FireDepartmentRecord],
    ) -> Rebuild {
        let mut skipped = Vec::new();

        let mut incident_markers = Vec::with_capacity(incidents.len());
        let mut samples = Vec::with_capacity(incidents.len());
        for record in incidents {
            let position = match record.position() {
                Ok(p) => p,
                Err(error) => {
                    skipped.push(skip(RecordKind::Incident, record.id, error));
                    continue;
                }
            };
            samples.push(HeatSample {
                position,
                weight: severity_weight(record.severity_score),
            });
            incident_markers.push(Marker {
                drawable: Drawable::new(
                    self.next_drawable_id(),
                    position,
                    incident_style(record),
                    incident_title(record),
                ),
                record: SpatialRecord::Incident(record.clone()),
            });
        }

        let mut department_markers = Vec::with_capacity(fire_departments.len());
        for record in fire_departments {
            let position = match record.position() {
                Ok(p) => p,
                Err(error) => {
                    skipped.push(skip(RecordKind::FireDepartment, record.id, error));
                    continue;
                }
            };
            department_markers.push(Marker {
                drawable: Drawable::new(
                    self.next_drawable_id(),
                    position,
                    department_style(record),
                    record.name.clone(),
                ),
                record: SpatialRecord::FireDepartment(record.clone()),
            });
        }

        let heat = HeatGroup::new(
            LayerId(self.layer_ids.next_id()),
            samples,
            self.heat_radius_px,
        );

        Rebuild {
            incidents: DrawableGroup::new(Category::Incidents, incident_markers),
            fire_departments: DrawableGroup::new(Category::FireDepartments, department_markers),
            heat,
            skipped,
        }
    }

    fn next_drawable_id(&mut self) -> DrawableId {
        DrawableId(self.drawable_ids.next_id())
    }
}

fn skip(kind: RecordKind, id: RecordId, error: CoordError) -> SkippedRecord {
    warn!(?kind, id, %error, "skipping record with unusable coordinates");
    SkippedRecord { kind, id, error }
}

#[cfg(test)]
mod tests {
    use super::GroupBuilder;
    use foundation::geo::CoordError;
    use incidents::{FireDepartmentRecord, IncidentRecord, IncidentType, RecordKind};
    use pretty_assertions::assert_eq;

    fn incidents() -> Vec<IncidentRecord> {
        vec![
            IncidentRecord::new(1, IncidentType::ForestFire, 38.0, 23.7).with_severity(5.0),
            IncidentRecord::new(2, IncidentType::Flood, 40.6, 22.9),
        ]
    }

    #[test]
    fn builds_one_marker_and_sample_per_valid_incident() {
        let mut b = GroupBuilder::default();
        let fds = vec![FireDepartmentRecord::new(10, "Central", 37.98, 23.72)];
        let rebuild = b.build(&incidents(), &fds);

        assert_eq!(rebuild.incidents.len(), 2);
        assert_eq!(rebuild.fire_departments.len(), 1);
        assert_eq!(rebuild.heat.sample_count(), 2);
        assert!(rebuild.skipped.is_empty());
        assert!(!rebuild.incidents.is_attached());
        assert!(!rebuild.heat.is_attached());
    }

    #[test]
    fn invalid_coordinates_are_skipped_and_reported() {
        let mut b = GroupBuilder::default();
        let mut data = incidents();
        data.push(IncidentRecord::new(3, IncidentType::Blackout, f64::NAN, 23.0));
        let fds = vec![
            FireDepartmentRecord::new(10, "Central", 37.98, 23.72),
            FireDepartmentRecord::new(11, "Nowhere", 95.0, 0.0),
        ];

        let rebuild = b.build(&data, &fds);
        assert_eq!(rebuild.incidents.len(), 2);
        assert_eq!(rebuild.heat.sample_count(), 2);
        assert_eq!(rebuild.fire_departments.len(), 1);

        let skipped: Vec<_> = rebuild.skipped.iter().map(|s| (s.kind, s.id)).collect();
        assert_eq!(
            skipped,
            vec![(RecordKind::Incident, 3), (RecordKind::FireDepartment, 11)]
        );
        assert_eq!(rebuild.skipped[1].error, CoordError::LatitudeOutOfRange(95.0));
    }

    #[test]
    fn rebuilds_never_reuse_ids() {
        let mut b = GroupBuilder::default();
        let first = b.build(&incidents(), &[]);
        let second = b.build(&incidents(), &[]);

        let first_ids: Vec<_> = first.incidents.markers().iter().map(|m| m.drawable.id).collect();
        assert!(
            second
                .incidents
                .markers()
                .iter()
                .all(|m| !first_ids.contains(&m.drawable.id))
        );
        assert_ne!(first.heat.id(), second.heat.id());
    }

    #[test]
    fn markers_carry_their_records() {
        let mut b = GroupBuilder::default();
        let rebuild = b.build(&incidents(), &[]);
        let ids: Vec<_> = rebuild.incidents.markers().iter().map(|m| m.record.id()).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
