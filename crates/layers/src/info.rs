//! Popup text for a clicked marker.

use foundation::geo::{LatLng, haversine_km};
use incidents::{FireDepartmentRecord, IncidentRecord, SpatialRecord};

/// Closest fire department with a usable position, with its distance in km.
pub fn nearest_department<'a>(
    at: LatLng,
    departments: &'a [FireDepartmentRecord],
) -> Option<(&'a FireDepartmentRecord, f64)> {
    departments
        .iter()
        .filter_map(|fd| fd.position().ok().map(|p| (fd, haversine_km(at, p))))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

pub fn info_window(record: &SpatialRecord, departments: &[FireDepartmentRecord]) -> String {
    match record {
        SpatialRecord::Incident(r) => incident_info(r, departments),
        SpatialRecord::FireDepartment(r) => department_info(r),
    }
}

fn incident_info(r: &IncidentRecord, departments: &[FireDepartmentRecord]) -> String {
    let mut lines = vec![format!("{} #{}", r.kind.label(), r.id)];
    if let Some(s) = r.severity_score {
        lines.push(format!("Severity: {s}/5"));
    }
    if let Some(status) = r.status {
        lines.push(format!("Status: {}", status.as_str()));
    }
    if let Some(n) = r.dispatched_responders.filter(|n| *n > 0) {
        lines.push(format!("Responders dispatched: {n}"));
    }
    if let Some(desc) = r.description.as_deref().filter(|d| !d.trim().is_empty()) {
        lines.push(desc.trim().to_string());
    }
    if let Ok(at) = r.position() {
        if let Some((fd, km)) = nearest_department(at, departments) {
            lines.push(format!("Nearest station: {} ({km:.1} km)", fd.name));
        }
    }
    if !r.attachments.is_empty() {
        lines.push(format!("Attachments: {}", r.attachments.len()));
    }
    lines.join("\n")
}

fn department_info(r: &FireDepartmentRecord) -> String {
    let mut lines = vec![r.name.clone()];
    if let Some(city) = &r.city {
        lines.push(city.clone());
    }
    lines.push(format!("Available responders: {}", r.available_responders));
    if let Some(trucks) = r.available_trucks {
        lines.push(format!("Available trucks: {trucks}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::{info_window, nearest_department};
    use foundation::geo::LatLng;
    use incidents::{FireDepartmentRecord, IncidentRecord, IncidentStatus, IncidentType};
    use pretty_assertions::assert_eq;

    fn departments() -> Vec<FireDepartmentRecord> {
        vec![
            FireDepartmentRecord::new(1, "Athens", 37.9838, 23.7275),
            FireDepartmentRecord::new(2, "Broken", f64::NAN, 0.0),
            FireDepartmentRecord::new(3, "Thessaloniki", 40.632, 22.941),
        ]
    }

    #[test]
    fn nearest_skips_invalid_positions() {
        let fds = departments();
        let (fd, km) = nearest_department(LatLng::new(40.6, 22.9), &fds).unwrap();
        assert_eq!(fd.id, 3);
        assert!(km < 10.0);
    }

    #[test]
    fn nearest_of_empty_is_none() {
        assert!(nearest_department(LatLng::new(0.0, 0.0), &[]).is_none());
    }

    #[test]
    fn incident_popup_lists_known_fields() {
        let mut r = IncidentRecord::new(7, IncidentType::ForestFire, 37.99, 23.73)
            .with_severity(4.0)
            .with_description("  Smoke visible  ");
        r.status = Some(IncidentStatus::Open);
        let text = info_window(&r.into(), &departments());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Forest fire #7");
        assert_eq!(lines[1], "Severity: 4/5");
        assert_eq!(lines[2], "Status: open");
        assert_eq!(lines[3], "Smoke visible");
        assert!(lines[4].starts_with("Nearest station: Athens"));
    }

    #[test]
    fn department_popup() {
        let mut fd = FireDepartmentRecord::new(1, "Central", 0.0, 0.0).with_responders(12);
        fd.city = Some("Athens".into());
        fd.available_trucks = Some(3);
        assert_eq!(
            info_window(&fd.into(), &[]),
            "Central\nAthens\nAvailable responders: 12\nAvailable trucks: 3"
        );
    }
}
