use incidents::SpatialRecord;
use map::adapter::MapAdapter;
use map::drawable::{Drawable, DrawableId};
use tracing::trace;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Incidents,
    FireDepartments,
    Heat,
}

impl Category {
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Incidents => "incidents",
            Category::FireDepartments => "fire_departments",
            Category::Heat => "heat",
        }
    }
}

/// A drawable tagged with the record it represents.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub drawable: Drawable,
    pub record: SpatialRecord,
}

/// Markers of one category, attached and detached as a unit.
///
/// Attach and detach are idempotent so a group can never be added to the map
/// twice. A group must be detached before it is dropped; [`DrawableGroup::dispose`]
/// does both.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawableGroup {
    category: Category,
    markers: Vec<Marker>,
    attached: bool,
}

impl DrawableGroup {
    pub fn new(category: Category, markers: Vec<Marker>) -> Self {
        Self {
            category,
            markers,
            attached: false,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn find(&self, id: DrawableId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.drawable.id == id)
    }

    pub fn attach(&mut self, map: &mut dyn MapAdapter) {
        if self.attached {
            return;
        }
        trace!(category = self.category.as_str(), count = self.markers.len(), "attach group");
        for marker in &self.markers {
            map.add_object(&marker.drawable);
        }
        self.attached = true;
    }

    pub fn detach(&mut self, map: &mut dyn MapAdapter) {
        if !self.attached {
            return;
        }
        trace!(category = self.category.as_str(), count = self.markers.len(), "detach group");
        for marker in &self.markers {
            map.remove_object(marker.drawable.id);
        }
        self.attached = false;
    }

    pub fn dispose(mut self, map: &mut dyn MapAdapter) {
        self.detach(map);
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, DrawableGroup, Marker};
    use foundation::geo::LatLng;
    use incidents::{IncidentRecord, IncidentType};
    use map::adapter::{ContainerHandle, MapAdapter};
    use map::drawable::{Drawable, DrawableId, MarkerStyle};
    use map::recording::RecordingMap;
    use map::viewport::ViewportState;

    fn ready_map() -> RecordingMap {
        let mut map = RecordingMap::new();
        map.initialize(
            &ContainerHandle::new("map"),
            ViewportState::new(7.0, LatLng::new(0.0, 0.0)),
        )
        .unwrap();
        map
    }

    fn group(ids: &[u64]) -> DrawableGroup {
        let markers = ids
            .iter()
            .map(|&id| Marker {
                drawable: Drawable::new(
                    DrawableId(id),
                    LatLng::new(1.0, 1.0),
                    MarkerStyle::default(),
                    "m",
                ),
                record: IncidentRecord::new(id, IncidentType::Flood, 1.0, 1.0).into(),
            })
            .collect();
        DrawableGroup::new(Category::Incidents, markers)
    }

    #[test]
    fn attach_twice_adds_once() {
        let mut map = ready_map();
        let mut g = group(&[1, 2, 3]);
        g.attach(&mut map);
        g.attach(&mut map);
        assert_eq!(map.object_count(), 3);
        assert!(map.violations().is_empty());
    }

    #[test]
    fn dispose_removes_everything() {
        let mut map = ready_map();
        let mut g = group(&[1, 2]);
        g.attach(&mut map);
        g.dispose(&mut map);
        assert_eq!(map.object_count(), 0);
        assert!(map.violations().is_empty());
    }

    #[test]
    fn detach_of_unattached_group_touches_nothing() {
        let mut map = ready_map();
        map.take_ops();
        let mut g = group(&[1]);
        g.detach(&mut map);
        assert!(map.ops().is_empty());
    }

    #[test]
    fn find_returns_tagged_record() {
        let g = group(&[7]);
        let m = g.find(DrawableId(7)).unwrap();
        assert_eq!(m.record.id(), 7);
        assert!(g.find(DrawableId(8)).is_none());
    }
}
