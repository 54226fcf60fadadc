use incidents::{FireDepartmentRecord, IncidentRecord, IncidentType};
use map::drawable::{Glyph, MarkerStyle};

const FIRE_RED: [f32; 4] = [0.86, 0.16, 0.12, 1.0];
const FLOOD_BLUE: [f32; 4] = [0.13, 0.45, 0.85, 1.0];
const BLACKOUT_AMBER: [f32; 4] = [0.95, 0.71, 0.1, 1.0];
const NEUTRAL_GREY: [f32; 4] = [0.55, 0.55, 0.55, 1.0];
const STATION_GREEN: [f32; 4] = [0.1, 0.6, 0.3, 1.0];

/// Severity is 1..=5 on the wire; anything else renders at the default size.
fn severity_scale(severity: Option<f64>) -> f32 {
    match severity {
        Some(s) if s.is_finite() => (0.8 + 0.1 * s.clamp(1.0, 5.0)) as f32,
        _ => 0.9,
    }
}

pub fn incident_style(record: &IncidentRecord) -> MarkerStyle {
    let (glyph, color) = match record.kind {
        IncidentType::ForestFire => (Glyph::Flame, FIRE_RED),
        IncidentType::Flood => (Glyph::Droplet, FLOOD_BLUE),
        IncidentType::Blackout => (Glyph::Bolt, BLACKOUT_AMBER),
        IncidentType::Other => (Glyph::Dot, NEUTRAL_GREY),
    };
    MarkerStyle {
        glyph,
        color,
        scale: severity_scale(record.severity_score),
        z_index: 10,
    }
}

pub fn department_style(record: &FireDepartmentRecord) -> MarkerStyle {
    let mut color = STATION_GREEN;
    if record.available_responders == 0 {
        // Stations with nobody left to dispatch are drawn faded.
        color[3] = 0.45;
    }
    MarkerStyle {
        glyph: Glyph::Station,
        color,
        scale: 1.0,
        z_index: 0,
    }
}

pub fn incident_title(record: &IncidentRecord) -> String {
    format!("{} #{}", record.kind.label(), record.id)
}
