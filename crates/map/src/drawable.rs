use foundation::geo::LatLng;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DrawableId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Glyph {
    Flame,
    Droplet,
    Bolt,
    Station,
    Dot,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MarkerStyle {
    pub glyph: Glyph,
    pub color: [f32; 4],
    /// Relative marker size; 1.0 is the engine default.
    pub scale: f32,
    /// Draw order among markers; larger is on top.
    pub z_index: i32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            glyph: Glyph::Dot,
            color: [1.0, 1.0, 1.0, 1.0],
            scale: 1.0,
            z_index: 0,
        }
    }
}

/// A single object attached to the map (a marker pin).
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub id: DrawableId,
    pub position: LatLng,
    pub style: MarkerStyle,
    pub title: String,
}

impl Drawable {
    pub fn new(
        id: DrawableId,
        position: LatLng,
        style: MarkerStyle,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id,
            position,
            style,
            title: title.into(),
        }
    }
}
