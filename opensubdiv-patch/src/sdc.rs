//! Subdivision scheme definitions.
use num_enum::TryFromPrimitive;

/// The subdivision scheme of the mesh a patch was taken from.
#[repr(u32)]
#[derive(TryFromPrimitive, Display, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// *Bilinear* interpolation.
    Bilinear = 0,
    /// [*Catmull-Clark* subdivision](https://en.wikipedia.org/wiki/Catmull%E2%80%93Clark_subdivision_surface).
    #[display("Catmull-Clark")]
    CatmullClark,
    /// [*Loop* subdivision](https://en.wikipedia.org/wiki/Loop_subdivision_surface).
    Loop,
}

impl Scheme {
    /// Returns the number of vertices of a regular face: 4 for quad schemes,
    /// 3 for *Loop*.
    #[inline]
    pub fn regular_face_size(&self) -> usize {
        match self {
            Scheme::Loop => 3,
            _ => 4,
        }
    }

    /// Returns the valence of a regular interior vertex.
    #[inline]
    pub fn regular_vertex_valence(&self) -> usize {
        match self {
            Scheme::Loop => 6,
            _ => 4,
        }
    }
}
