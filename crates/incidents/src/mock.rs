//! Fixed data sets substituted when the incident API is unreachable.

use crate::record::{FireDepartmentRecord, IncidentRecord, IncidentStatus, IncidentType};

pub fn mock_incidents() -> Vec<IncidentRecord> {
    vec![
        IncidentRecord {
            status: Some(IncidentStatus::Open),
            ..IncidentRecord::new(1, IncidentType::ForestFire, 38.0765, 23.8157)
                .with_severity(5.0)
                .with_description("Wildfire spreading towards residential area")
        },
        IncidentRecord {
            status: Some(IncidentStatus::InProcess),
            dispatched_responders: Some(8),
            ..IncidentRecord::new(2, IncidentType::ForestFire, 37.9421, 23.6482)
                .with_severity(3.0)
                .with_description("Brush fire next to the ring road")
        },
        IncidentRecord {
            status: Some(IncidentStatus::Open),
            ..IncidentRecord::new(3, IncidentType::Flood, 40.6401, 22.9444)
                .with_severity(4.0)
                .with_description("Street flooding after heavy rain")
        },
        IncidentRecord {
            status: Some(IncidentStatus::Resolved),
            ..IncidentRecord::new(4, IncidentType::Blackout, 38.2466, 21.7346)
                .with_severity(2.0)
                .with_description("Power outage in city centre")
        },
        IncidentRecord {
            status: Some(IncidentStatus::Open),
            ..IncidentRecord::new(5, IncidentType::Flood, 39.6650, 20.8537).with_severity(1.0)
        },
    ]
}

pub fn mock_fire_departments() -> Vec<FireDepartmentRecord> {
    vec![
        FireDepartmentRecord {
            city: Some("Athens".to_string()),
            available_trucks: Some(12),
            ..FireDepartmentRecord::new(1, "Athens Central Fire Station", 37.9838, 23.7275)
                .with_responders(40)
        },
        FireDepartmentRecord {
            city: Some("Piraeus".to_string()),
            available_trucks: Some(6),
            ..FireDepartmentRecord::new(2, "Piraeus Fire Station", 37.9420, 23.6465)
                .with_responders(18)
        },
        FireDepartmentRecord {
            city: Some("Thessaloniki".to_string()),
            available_trucks: Some(9),
            ..FireDepartmentRecord::new(3, "Thessaloniki Fire Station", 40.6320, 22.9410)
                .with_responders(25)
        },
        FireDepartmentRecord {
            city: Some("Patras".to_string()),
            available_trucks: Some(4),
            ..FireDepartmentRecord::new(4, "Patras Fire Station", 38.2400, 21.7300)
                .with_responders(12)
        },
    ]
}
